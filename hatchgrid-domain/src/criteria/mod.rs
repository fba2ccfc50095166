//! 查询条件（Criteria）
//!
//! 与存储无关的过滤条件树：由表现层解析器（RHS 过滤）构造，
//! 由仓储实现翻译为具体查询，或通过 [`Criteria::matches`] 在内存中求值。
//!
mod value;

pub use value::Value;

use std::cmp::Ordering;
use std::fmt;

/// 可被条件求值的数据源（按字段名取值）
///
/// 未知字段返回 `None`，求值时按 `Null` 处理。
pub trait FieldSource {
    fn field(&self, key: &str) -> Option<Value>;
}

/// 过滤条件树
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Criteria {
    #[default]
    Empty,
    And(Vec<Criteria>),
    Or(Vec<Criteria>),
    Equals { key: String, value: Value },
    NotEquals { key: String, value: Value },
    Between { key: String, from: Value, to: Value },
    NotBetween { key: String, from: Value, to: Value },
    LessThan { key: String, value: Value },
    LessThanEquals { key: String, value: Value },
    GreaterThan { key: String, value: Value },
    GreaterThanEquals { key: String, value: Value },
    IsNull { key: String },
    IsNotNull { key: String },
    Like { key: String, pattern: String },
    Ilike { key: String, pattern: String },
    NotLike { key: String, pattern: String },
    In { key: String, values: Vec<Value> },
    NotIn { key: String, values: Vec<Value> },
    IsTrue { key: String },
    IsFalse { key: String },
}

impl Criteria {
    pub fn equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::NotEquals {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn between(key: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self::Between {
            key: key.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn like(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Like {
            key: key.into(),
            pattern: pattern.into(),
        }
    }

    pub fn ilike(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Ilike {
            key: key.into(),
            pattern: pattern.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Criteria::Empty)
    }

    /// 以 AND 合并两个条件：`Empty` 视为单位元，已有的 AND 分组会被展开
    pub fn and(self, other: Criteria) -> Criteria {
        match (self, other) {
            (Criteria::Empty, other) => other,
            (this, Criteria::Empty) => this,
            (Criteria::And(mut left), Criteria::And(right)) => {
                left.extend(right);
                Criteria::And(left)
            }
            (Criteria::And(mut left), other) => {
                left.push(other);
                Criteria::And(left)
            }
            (this, other) => Criteria::And(vec![this, other]),
        }
    }

    /// 以 OR 合并两个条件，规则同 [`Criteria::and`]
    pub fn or(self, other: Criteria) -> Criteria {
        match (self, other) {
            (Criteria::Empty, other) => other,
            (this, Criteria::Empty) => this,
            (Criteria::Or(mut left), Criteria::Or(right)) => {
                left.extend(right);
                Criteria::Or(left)
            }
            (Criteria::Or(mut left), other) => {
                left.push(other);
                Criteria::Or(left)
            }
            (this, other) => Criteria::Or(vec![this, other]),
        }
    }

    /// 在内存中对数据源求值
    pub fn matches<S: FieldSource + ?Sized>(&self, source: &S) -> bool {
        let get = |key: &str| source.field(key).unwrap_or(Value::Null);

        match self {
            Criteria::Empty => true,
            Criteria::And(items) => items.iter().all(|c| c.matches(source)),
            Criteria::Or(items) => items.is_empty() || items.iter().any(|c| c.matches(source)),
            Criteria::Equals { key, value } => get(key).compare(value) == Some(Ordering::Equal),
            Criteria::NotEquals { key, value } => {
                matches!(get(key).compare(value), Some(o) if o != Ordering::Equal)
            }
            Criteria::Between { key, from, to } => in_range(&get(key), from, to),
            Criteria::NotBetween { key, from, to } => {
                let v = get(key);
                !v.is_null() && !in_range(&v, from, to)
            }
            Criteria::LessThan { key, value } => get(key).compare(value) == Some(Ordering::Less),
            Criteria::LessThanEquals { key, value } => {
                matches!(get(key).compare(value), Some(Ordering::Less | Ordering::Equal))
            }
            Criteria::GreaterThan { key, value } => {
                get(key).compare(value) == Some(Ordering::Greater)
            }
            Criteria::GreaterThanEquals { key, value } => {
                matches!(get(key).compare(value), Some(Ordering::Greater | Ordering::Equal))
            }
            Criteria::IsNull { key } => get(key).is_null(),
            Criteria::IsNotNull { key } => !get(key).is_null(),
            Criteria::Like { key, pattern } => {
                get(key).as_text().is_some_and(|s| like_match(pattern, s, false))
            }
            Criteria::Ilike { key, pattern } => {
                get(key).as_text().is_some_and(|s| like_match(pattern, s, true))
            }
            Criteria::NotLike { key, pattern } => {
                get(key).as_text().is_some_and(|s| !like_match(pattern, s, false))
            }
            Criteria::In { key, values } => {
                let v = get(key);
                values.iter().any(|x| v.compare(x) == Some(Ordering::Equal))
            }
            Criteria::NotIn { key, values } => {
                let v = get(key);
                !v.is_null() && values.iter().all(|x| v.compare(x) != Some(Ordering::Equal))
            }
            Criteria::IsTrue { key } => get(key) == Value::Bool(true),
            Criteria::IsFalse { key } => get(key) == Value::Bool(false),
        }
    }
}

fn in_range(v: &Value, from: &Value, to: &Value) -> bool {
    matches!(v.compare(from), Some(Ordering::Greater | Ordering::Equal))
        && matches!(v.compare(to), Some(Ordering::Less | Ordering::Equal))
}

/// SQL `LIKE` 语义：`%` 匹配任意长度，`_` 匹配单个字符
fn like_match(pattern: &str, text: &str, ignore_case: bool) -> bool {
    let norm = |s: &str| -> Vec<char> {
        if ignore_case {
            s.to_lowercase().chars().collect()
        } else {
            s.chars().collect()
        }
    };
    let p = norm(pattern);
    let t = norm(text);

    // 贪婪回溯：记录最近一个 `%` 的位置
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;
    while ti < t.len() {
        if pi < p.len() && p[pi] == '%' {
            star = Some((pi, ti));
            pi += 1;
        } else if pi < p.len() && (p[pi] == '_' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '%')
}

fn join(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_group(f: &mut fmt::Formatter<'_>, items: &[Criteria], op: &str) -> fmt::Result {
    let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
    write!(f, "({})", parts.join(op))
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criteria::Empty => f.write_str("()"),
            Criteria::And(items) => join_group(f, items, " AND "),
            Criteria::Or(items) => join_group(f, items, " OR "),
            Criteria::Equals { key, value } => write!(f, "{key} = {value}"),
            Criteria::NotEquals { key, value } => write!(f, "{key} != {value}"),
            Criteria::Between { key, from, to } => write!(f, "({key} >= {from} && {key} <= {to})"),
            Criteria::NotBetween { key, from, to } => {
                write!(f, "({key} < {from} || {key} > {to})")
            }
            Criteria::LessThan { key, value } => write!(f, "{key} < {value}"),
            Criteria::LessThanEquals { key, value } => write!(f, "{key} <= {value}"),
            Criteria::GreaterThan { key, value } => write!(f, "{key} > {value}"),
            Criteria::GreaterThanEquals { key, value } => write!(f, "{key} >= {value}"),
            Criteria::IsNull { key } => write!(f, "{key} = null"),
            Criteria::IsNotNull { key } => write!(f, "{key} != null"),
            Criteria::Like { key, pattern } => write!(f, "{key} LIKE {pattern}"),
            Criteria::Ilike { key, pattern } => write!(f, "{key} ILIKE {pattern}"),
            Criteria::NotLike { key, pattern } => write!(f, "{key} NOT LIKE {pattern}"),
            Criteria::In { key, values } => write!(f, "{key} IN [{}]", join(values)),
            Criteria::NotIn { key, values } => write!(f, "{key} NOT IN [{}]", join(values)),
            Criteria::IsTrue { key } => write!(f, "{key} IS TRUE"),
            Criteria::IsFalse { key } => write!(f, "{key} IS FALSE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Row(HashMap<&'static str, Value>);

    impl FieldSource for Row {
        fn field(&self, key: &str) -> Option<Value> {
            self.0.get(key).cloned()
        }
    }

    fn person(name: &str, age: i64, active: bool) -> Row {
        Row(HashMap::from([
            ("name", Value::from(name)),
            ("age", Value::Int(age)),
            ("active", Value::Bool(active)),
        ]))
    }

    #[test]
    fn display_matches_textual_form() {
        let c = Criteria::equals("name", "test").and(Criteria::GreaterThanEquals {
            key: "age".into(),
            value: Value::Int(0),
        });
        assert_eq!(c.to_string(), "(name = test AND age >= 0)");
        assert_eq!(Criteria::Empty.to_string(), "()");
        assert_eq!(
            Criteria::In {
                key: "age".into(),
                values: vec![Value::Int(1), Value::Null]
            }
            .to_string(),
            "age IN [1, null]"
        );
        assert_eq!(
            Criteria::between("age", 1, 5).to_string(),
            "(age >= 1 && age <= 5)"
        );
    }

    #[test]
    fn and_or_treat_empty_as_identity_and_flatten() {
        assert_eq!(Criteria::Empty.and(Criteria::Empty), Criteria::Empty);

        let a = Criteria::equals("a", 1);
        assert_eq!(Criteria::Empty.and(a.clone()), a);

        let abc = a
            .clone()
            .or(Criteria::equals("b", 2))
            .or(Criteria::equals("c", 3));
        match abc {
            Criteria::Or(items) => assert_eq!(items.len(), 3),
            other => panic!("unexpected criteria: {other:?}"),
        }
    }

    #[test]
    fn evaluates_comparisons_and_groups() {
        let alice = person("Alice", 30, true);

        assert!(Criteria::equals("name", "Alice").matches(&alice));
        assert!(Criteria::not_equals("name", "Bob").matches(&alice));
        assert!(Criteria::between("age", 18, 30).matches(&alice));
        assert!(!Criteria::NotBetween {
            key: "age".into(),
            from: Value::Int(18),
            to: Value::Int(30)
        }
        .matches(&alice));
        assert!(Criteria::IsTrue { key: "active".into() }.matches(&alice));
        assert!(Criteria::IsNull { key: "missing".into() }.matches(&alice));

        let either = Criteria::equals("name", "Bob").or(Criteria::GreaterThan {
            key: "age".into(),
            value: Value::Int(29),
        });
        assert!(either.matches(&alice));
        assert!(!Criteria::equals("name", "Bob")
            .and(Criteria::equals("age", 30))
            .matches(&alice));
    }

    #[test]
    fn like_supports_wildcards_and_case_folding() {
        let row = person("Workspace Alpha", 1, true);
        assert!(Criteria::like("name", "Work%").matches(&row));
        assert!(Criteria::like("name", "%Alph_").matches(&row));
        assert!(!Criteria::like("name", "%alpha%").matches(&row));
        assert!(Criteria::ilike("name", "%alpha%").matches(&row));
        assert!(Criteria::NotLike {
            key: "name".into(),
            pattern: "Beta%".into()
        }
        .matches(&row));
    }

    #[test]
    fn in_and_not_in_ignore_nulls() {
        let row = person("x", 3, false);
        let in_c = Criteria::In {
            key: "age".into(),
            values: vec![Value::Int(1), Value::Int(3)],
        };
        assert!(in_c.matches(&row));

        let not_in_missing = Criteria::NotIn {
            key: "missing".into(),
            values: vec![Value::Int(1)],
        };
        assert!(!not_in_missing.matches(&row));
    }
}
