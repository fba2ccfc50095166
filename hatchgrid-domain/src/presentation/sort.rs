//! 排序（Sort）与排序参数解析
//!
//! 请求中的排序项形如 `asc:name`、`desc:created_at`，省略方向时按升序处理；
//! 单个参数中也可用逗号分隔多个排序项。
//!
use crate::criteria::{FieldSource, Value};
use crate::presentation::InvalidRequestError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// 单个排序项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    property: String,
    direction: Direction,
}

impl Order {
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Asc)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Desc)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// 有序的排序项列表，前者优先
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn then(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// 按排序项比较两条记录；`Null` 小于任何值，不可比较的值视为相等
    pub fn compare<S: FieldSource + ?Sized>(&self, a: &S, b: &S) -> Ordering {
        for order in &self.orders {
            let left = a.field(&order.property).unwrap_or(Value::Null);
            let right = b.field(&order.property).unwrap_or(Value::Null);

            let ord = match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
            };
            let ord = match order.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.orders.is_empty() {
            return f.write_str("UNSORTED");
        }
        let parts: Vec<String> = self
            .orders
            .iter()
            .map(|o| format!("{}: {}", o.property, o.direction))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// 排序参数解析器：仅接受白名单内的属性
#[derive(Debug, Clone)]
pub struct SortParser {
    properties: HashSet<String>,
}

impl SortParser {
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    /// 解析排序参数列表；空列表得到未排序的 [`Sort`]
    pub fn parse<I, S>(&self, entries: I) -> Result<Sort, InvalidRequestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut orders = Vec::new();
        for entry in entries {
            for item in entry.as_ref().split(',') {
                orders.push(self.parse_order(item.trim())?);
            }
        }
        tracing::trace!(orders = orders.len(), "parsed sort parameters");
        Ok(Sort::by(orders))
    }

    fn parse_order(&self, item: &str) -> Result<Order, InvalidRequestError> {
        if item.is_empty() {
            return Err(InvalidRequestError::sort("empty sort entry"));
        }

        let (direction, property) = match item.split_once(':') {
            Some((dir, prop)) => {
                let direction = match dir.to_ascii_lowercase().as_str() {
                    "asc" => Direction::Asc,
                    "desc" => Direction::Desc,
                    other => {
                        return Err(InvalidRequestError::sort(format!(
                            "unknown sort direction '{other}' in '{item}'"
                        )));
                    }
                };
                (direction, prop.trim())
            }
            None => (Direction::Asc, item),
        };

        if !self.properties.contains(property) {
            return Err(InvalidRequestError::sort(format!(
                "unknown sort property '{property}'"
            )));
        }

        Ok(Order::new(property, direction))
    }
}
