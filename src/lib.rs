//! listicles - schematized lists stored as human-editable markdown files
//!
//! A collection is a named list of items with typed fields. Each collection
//! is saved as one `.md` file: YAML frontmatter for the schema, then a
//! markdown table for the items. The files are meant to be read and edited
//! by hand between runs.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Collection, Field, FieldType, Item, ItemId, Value};
pub use storage::{CollectionStore, ErrorKind, PersistenceError};
