//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `list` | Stored collections with item counts |
//! | `show <name>` | Schema and items of one collection |
//! | `new <name> -F title:text:required` | Create an empty collection |
//! | `add <name> title=Dune pages=412` | Append an item |
//! | `delete <name>` | Remove the collection file |
//! | `path <name>` | File a name maps to |
//! | `demo` | Save the Guitar Practice sample |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug events on stderr:
//! ```bash
//! listicles --verbose list
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod collection;
mod demo;
mod logging;
mod output;

pub use app::{run, Cli, Commands};
pub use demo::guitar_practice;
pub use output::{Output, OutputFormat};
