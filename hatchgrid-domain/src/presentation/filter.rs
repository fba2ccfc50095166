//! RHS（right-hand side）过滤参数解析
//!
//! 过滤参数以"字段 → 条件列表"的形式给出，每个条件形如 `操作符:值`，例如
//! `name=eq:test`、`age=gte:18`、`status=in:ACTIVE,BLOCKED`。
//!
//! | 操作符 | 含义 |
//! |---|---|
//! | `eq` / `ne` | 等于 / 不等于 |
//! | `gt` / `gte` / `lt` / `lte` | 比较 |
//! | `lk` / `ilk` / `nlk` | LIKE / ILIKE / NOT LIKE（仅文本字段） |
//! | `in` / `nin` | 逗号分隔的取值列表 |
//! | `null` / `nnull` | 为空 / 不为空（忽略取值） |
//!
use crate::criteria::{Criteria, Value};
use crate::error::{DomainError, DomainResult};
use crate::presentation::InvalidRequestError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// 字段取值类型，决定条件值如何解析
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    Uuid,
    Timestamp,
}

impl FieldType {
    fn parse_value(self, raw: &str) -> DomainResult<Value> {
        Ok(match self {
            FieldType::Text => Value::Text(raw.to_string()),
            FieldType::Integer => Value::Int(raw.parse::<i64>()?),
            FieldType::Float => Value::Float(raw.parse::<f64>()?),
            FieldType::Boolean => Value::Bool(raw.parse::<bool>()?),
            FieldType::Uuid => Value::Uuid(Uuid::parse_str(raw)?),
            FieldType::Timestamp => {
                Value::Timestamp(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
            }
        })
    }
}

/// RHS 过滤解析器：只接受声明过的字段
#[derive(Debug, Clone)]
pub struct RhsFilterParser {
    fields: HashMap<String, FieldType>,
}

impl RhsFilterParser {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(k, t)| (k.into(), t)).collect(),
        }
    }

    /// 将过滤参数解析为单层条件分组
    ///
    /// - 所有条件按输入顺序以 AND（`use_or = true` 时为 OR）连接；
    /// - 空白条件被忽略，没有任何条件时返回 [`Criteria::Empty`]；
    /// - 未知字段、未知操作符、缺少 `:` 或值无法按字段类型解析时返回 `Filter` 类别错误。
    pub fn parse<I, K, V, S>(&self, query: I, use_or: bool) -> Result<Criteria, InvalidRequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut conditions = Vec::new();

        for (field, raw_conditions) in query {
            let field = field.as_ref();
            for raw in raw_conditions {
                let raw = raw.as_ref().trim();
                if raw.is_empty() {
                    continue;
                }
                conditions.push(self.parse_condition(field, raw)?);
            }
        }

        if conditions.is_empty() {
            return Ok(Criteria::Empty);
        }

        tracing::trace!(conditions = conditions.len(), use_or, "parsed filter parameters");
        Ok(if use_or {
            Criteria::Or(conditions)
        } else {
            Criteria::And(conditions)
        })
    }

    fn parse_condition(&self, field: &str, raw: &str) -> Result<Criteria, InvalidRequestError> {
        let field_type = *self
            .fields
            .get(field)
            .ok_or_else(|| InvalidRequestError::filter(format!("unknown filter field '{field}'")))?;

        let (op, rhs) = raw.split_once(':').ok_or_else(|| {
            InvalidRequestError::filter(format!("expected 'operator:value' for '{field}', got '{raw}'"))
        })?;

        let value = |raw_value: &str| -> Result<Value, InvalidRequestError> {
            field_type.parse_value(raw_value).map_err(|e: DomainError| {
                InvalidRequestError::filter(format!(
                    "invalid value '{raw_value}' for field '{field}'"
                ))
                .with_cause(e)
            })
        };
        let values = |list: &str| -> Result<Vec<Value>, InvalidRequestError> {
            list.split(',').map(|v| value(v.trim())).collect()
        };
        let text_only = |op: &str| -> Result<String, InvalidRequestError> {
            if field_type == FieldType::Text {
                Ok(rhs.to_string())
            } else {
                Err(InvalidRequestError::filter(format!(
                    "operator '{op}' requires a text field, '{field}' is {field_type:?}"
                )))
            }
        };

        let key = field.to_string();
        let criteria = match op {
            "eq" => Criteria::Equals { key, value: value(rhs)? },
            "ne" => Criteria::NotEquals { key, value: value(rhs)? },
            "gt" => Criteria::GreaterThan { key, value: value(rhs)? },
            "gte" => Criteria::GreaterThanEquals { key, value: value(rhs)? },
            "lt" => Criteria::LessThan { key, value: value(rhs)? },
            "lte" => Criteria::LessThanEquals { key, value: value(rhs)? },
            "lk" => Criteria::Like { key, pattern: text_only(op)? },
            "ilk" => Criteria::Ilike { key, pattern: text_only(op)? },
            "nlk" => Criteria::NotLike { key, pattern: text_only(op)? },
            "in" => Criteria::In { key, values: values(rhs)? },
            "nin" => Criteria::NotIn { key, values: values(rhs)? },
            "null" => Criteria::IsNull { key },
            "nnull" => Criteria::IsNotNull { key },
            other => {
                return Err(InvalidRequestError::filter(format!(
                    "unknown filter operator '{other}' for '{field}'"
                )));
            }
        };
        Ok(criteria)
    }
}
