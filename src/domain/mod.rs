//! Domain models for listicles
//!
//! Contains the collection data model without any I/O concerns.

mod id;
mod field;
mod item;
mod collection;

pub use id::ItemId;
pub use field::{Field, FieldType};
pub use item::{item_data, Item, ItemData, Value};
pub use collection::Collection;
