//! Collection domain model
//!
//! A collection is a named, schematized list of items. The name is the
//! durable identity; the file it is stored in is derived from it by the
//! storage layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::field::Field;
use super::item::{Item, ItemData};

/// A named list of items sharing one schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub name: String,

    /// Free-form tag (e.g., "music", "todo")
    #[serde(rename = "type")]
    pub collection_type: String,

    /// Schema; order is column order
    pub fields: Vec<Field>,

    /// Rows in insertion order
    pub items: Vec<Item>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Creates an empty collection with no fields
    pub fn new(name: impl Into<String>, collection_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            collection_type: collection_type.into(),
            fields: Vec::new(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the schema
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Appends a new item and refreshes `updated_at`
    pub fn add_item(&mut self, data: ItemData) -> &Item {
        let item = Item::new(data);
        self.updated_at = item.created_at.max(self.updated_at);
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    /// Returns the field names in schema order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
