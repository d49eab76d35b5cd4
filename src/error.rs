// src/error.rs
use std::path::PathBuf;

use crate::core::types::{EntryIndex, MetadataIndex};

/// The thing a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Lookup {
    #[error("no pokemon matches name '{0}'")]
    Name(String),
    #[error("category '{0}' does not exist")]
    Category(String),
    #[error("category '{0}' contains no entries")]
    EmptyCategory(String),
    #[error("no pokemon matching '{name}' in category '{category}'")]
    NameInCategory { name: String, category: String },
    #[error("metadata index {index} is out of range (total {total})")]
    Index { index: MetadataIndex, total: usize },
    #[error("entry {0} is not in the pokedex")]
    Entry(EntryIndex),
    #[error("the pokedex is empty")]
    EmptyPokedex,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(#[from] Lookup),

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("invalid insertion: {0}")]
    InvalidInsertion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse names file: {0}")]
    Names(#[from] serde_json::Error),

    #[error("failed to parse config file '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Error {
    /// True for the recoverable lookup failures a caller may answer with a random pick.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedSnapshot(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
