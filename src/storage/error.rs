//! Storage error types
//!
//! Every [`CollectionStore`](super::CollectionStore) operation fails with a
//! [`PersistenceError`]. A missing file is reported as
//! [`PersistenceError::NotFound`] on its own so callers can tell "absent"
//! from "unreadable" by matching on [`ErrorKind`].

use std::fmt;

use thiserror::Error;

/// Problems with the content of a collection file
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("missing frontmatter (file must start with ---)")]
    MissingFrontmatter,

    #[error("malformed frontmatter (no closing ---)")]
    MalformedFrontmatter,

    #[error("frontmatter is not a mapping")]
    NotAMapping,

    #[error("frontmatter is missing '{0}'")]
    MissingKey(&'static str),

    #[error("field #{index} is missing '{key}'")]
    MissingFieldKey { index: usize, key: &'static str },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("invalid frontmatter: {0}")]
    Yaml(serde_yaml::Error),
}

/// Store operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    Save,
    Load,
    List,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Open => "open",
            Operation::Save => "save",
            Operation::Load => "load",
            Operation::List => "list",
            Operation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Underlying cause of a failed operation
#[derive(Debug, Error)]
pub enum StoreCause {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Discriminates errors without inspecting messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Format,
    Io,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Collection '{name}' not found")]
    NotFound { name: String },

    /// `name` is the collection name, except for `open` and `list`, where
    /// it is the data directory path
    #[error("Failed to {operation} '{name}'")]
    Failed {
        operation: Operation,
        name: String,
        #[source]
        cause: StoreCause,
    },
}

impl PersistenceError {
    pub(crate) fn not_found(name: &str) -> Self {
        PersistenceError::NotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn failed(operation: Operation, name: &str, cause: impl Into<StoreCause>) -> Self {
        PersistenceError::Failed {
            operation,
            name: name.to_string(),
            cause: cause.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PersistenceError::NotFound { .. } => ErrorKind::NotFound,
            PersistenceError::Failed {
                cause: StoreCause::Format(_),
                ..
            } => ErrorKind::Format,
            PersistenceError::Failed {
                cause: StoreCause::Io(_),
                ..
            } => ErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// The operation that failed; `None` for [`PersistenceError::NotFound`]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            PersistenceError::NotFound { .. } => None,
            PersistenceError::Failed { operation, .. } => Some(*operation),
        }
    }

    /// The collection name (or directory, for `list`/`open`) the error refers to
    pub fn name(&self) -> &str {
        match self {
            PersistenceError::NotFound { name } | PersistenceError::Failed { name, .. } => name,
        }
    }
}
