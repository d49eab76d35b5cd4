// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A unique identifier for one physical art variant.
/// Maps 1:1 to a stored art blob and to exactly one metadata entry.
pub type EntryIndex = usize;

/// Position of a record in the metadata store.
pub type MetadataIndex = usize;

/// An entry attached to a category trie node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRef {
    pub index: EntryIndex,
    /// Display name recorded at insertion time. Not unique.
    pub label: String,
}

impl EntryRef {
    pub fn new(index: EntryIndex, label: impl Into<String>) -> Self {
        Self { index, label: label.into() }
    }
}

/// One art variant of a pokemon (regular, shiny, mega...) with its category path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub entry_index: EntryIndex,
    pub categories: Vec<String>,
}

impl MetadataEntry {
    pub fn new<S: AsRef<str>>(entry_index: EntryIndex, categories: &[S]) -> Self {
        Self {
            entry_index,
            categories: categories.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }
}

/// Display information for a named pokemon plus every art variant that shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonMetadata {
    pub name: String,
    pub japanese_name: String,
    pub japanese_phonetic: String,
    pub entries: Vec<MetadataEntry>,
}

impl PokemonMetadata {
    pub fn new(name: impl Into<String>, japanese_name: impl Into<String>, japanese_phonetic: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            japanese_name: japanese_name.into(),
            japanese_phonetic: japanese_phonetic.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: MetadataEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

/// A row of the source names dictionary, keyed by slug in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonName {
    pub english: String,
    #[serde(default)]
    pub japanese: String,
    #[serde(default)]
    pub japanese_phonetic: String,
}
