//! # Storage Layer
//!
//! Persistence layer for listicles with human-editable file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Collection metadata + schema | YAML frontmatter | `{data_dir}/{sanitized name}.md` |
//! | Collection items | Markdown pipe table | same file, after the heading |
//! | Config | TOML | `~/.config/listicles/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - No locking: two processes saving the same collection race, last rename wins
//! - Writes are atomic per file (temp file + rename)
//!
//! ## Data Directory
//!
//! ```text
//! ~/listicles-data/
//! ├── Guitar Practice.md
//! ├── Reading List.md
//! └── Test_Collection______.md   # sanitized from "Test/Collection<>:|?*"
//! ```
//!
//! ## Key Types
//!
//! - [`CollectionStore`] - save / load / list / delete / exists
//! - [`PersistenceError`] - every store failure, with an [`ErrorKind`]
//! - [`Config`] - user configuration and data directory resolution

mod config;
mod error;
pub mod frontmatter;
pub mod path;
mod store;
pub mod table;

pub use config::{Config, ConfigError, OutputFormat, DATA_DIR_ENV};
pub use error::{ErrorKind, FormatError, Operation, PersistenceError, StoreCause};
pub use store::CollectionStore;
