//! Item domain model
//!
//! An item is one row of a collection. Its data maps field names to
//! [`Value`]s; keys that are not fields, and fields with no key, are both
//! allowed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::id::ItemId;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Row data keyed by field name
pub type ItemData = BTreeMap<String, Value>;

/// One row of a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,

    pub data: ItemData,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Creates an item with a fresh ID
    pub fn new(data: ItemData) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(now),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Gets a value by field name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}

/// Builds [`ItemData`] from `(name, value)` pairs
pub fn item_data<I, K, V>(pairs: I) -> ItemData
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_creation() {
        let data = item_data([("title", "Test Song"), ("artist", "Test Artist")]);
        let item = Item::new(data.clone());

        assert_eq!(item.data, data);
        assert!(item.id.to_string().starts_with("i-"));
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn item_with_different_value_types() {
        let mut data = ItemData::new();
        data.insert("title".into(), "Test Song".into());
        data.insert("rating".into(), 5.into());
        data.insert("price".into(), 9.99.into());
        data.insert("is_favorite".into(), true.into());

        let item = Item::new(data);
        assert_eq!(item.get("title"), Some(&Value::Text("Test Song".into())));
        assert_eq!(item.get("rating"), Some(&Value::Integer(5)));
        assert_eq!(item.get("price"), Some(&Value::Real(9.99)));
        assert_eq!(item.get("is_favorite"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn items_get_distinct_ids() {
        let a = Item::new(ItemData::new());
        let b = Item::new(ItemData::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn value_serializes_as_plain_scalar() {
        let data = item_data([("n", Value::Integer(4)), ("ok", Value::Boolean(true))]);
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"n":4,"ok":true}"#);
    }
}
