//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{collection, demo, logging};
use crate::storage::{CollectionStore, Config, DATA_DIR_ENV};

#[derive(Parser)]
#[command(name = "listicles")]
#[command(author, version, about = "Typed lists stored as human-editable markdown files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the config file's default_format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory holding collection files
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stored collections
    List,

    /// Show a collection's schema and items
    Show {
        /// Collection name
        name: String,
    },

    /// Create an empty collection
    New {
        /// Collection name
        name: String,

        /// Collection type label (defaults to the config file's default_type)
        #[arg(long = "type", short = 't')]
        collection_type: Option<String>,

        /// Field definition: name:type[:required][:opt1,opt2]
        #[arg(long = "field", short = 'F')]
        fields: Vec<String>,
    },

    /// Append an item to a collection
    Add {
        /// Collection name
        name: String,

        /// Field values as KEY=VALUE
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Delete a collection file
    Delete {
        /// Collection name
        name: String,
    },

    /// Print the file path a collection name maps to
    Path {
        /// Collection name
        name: String,
    },

    /// Create and save the Guitar Practice sample collection
    Demo,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::from(config.default_format));
    let output = Output::new(format);

    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref());
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");
    let store = CollectionStore::new(data_dir);

    match cli.command {
        Commands::List => collection::list(&output, &store)?,
        Commands::Show { name } => collection::show(&output, &store, &name)?,
        Commands::New {
            name,
            collection_type,
            fields,
        } => {
            let collection_type = collection_type.unwrap_or_else(|| config.default_type.clone());
            collection::new(&output, &store, &name, &collection_type, &fields)?
        }
        Commands::Add { name, values } => collection::add(&output, &store, &name, &values)?,
        Commands::Delete { name } => collection::delete(&output, &store, &name)?,
        Commands::Path { name } => collection::path(&output, &store, &name)?,
        Commands::Demo => demo::run(&output, &store)?,
    }

    Ok(())
}
