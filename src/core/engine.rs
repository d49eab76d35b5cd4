use crate::assets::{ArtSource, ArtStore};
use crate::core::metadata::MetadataStore;
use crate::core::selector::{Request, Selection, Selector};
use crate::core::trie::{join_path, CategoryTrie};
use crate::core::types::EntryIndex;
use crate::error::{Error, Result};
use crate::persistence::{load_from_disk, save_to_disk, Snapshot, SNAPSHOT_VERSION};
use log::debug;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;

/// A fully loaded, validated pokedex. Read-only once constructed.
pub struct Pokedex {
    trie: CategoryTrie,
    store: MetadataStore,
    art: ArtStore,
    categories: Vec<String>,
}

impl Pokedex {
    /// Validates a decoded snapshot. A pokedex that fails any check is never
    /// handed out, so every query runs against a consistent index.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let Snapshot { version, categories, names, metadata, total, trie, art } = snapshot;

        if version != SNAPSHOT_VERSION {
            return Err(Error::malformed(format!(
                "snapshot version {} is not supported (expected {})",
                version, SNAPSHOT_VERSION
            )));
        }
        if total != metadata.len() {
            return Err(Error::malformed(format!(
                "total is {} but {} metadata records are stored",
                total,
                metadata.len()
            )));
        }

        trie.validate()?;
        let store = MetadataStore::new(metadata, names)?;

        if store.entry_count() != art.len() {
            return Err(Error::malformed(format!(
                "{} entries are listed but {} art blobs are stored",
                store.entry_count(),
                art.len()
            )));
        }
        if let Some(entry) = store
            .records()
            .iter()
            .flat_map(|m| m.entries.iter())
            .find(|e| e.entry_index >= art.len())
        {
            return Err(Error::malformed(format!(
                "entry {} has no art blob",
                entry.entry_index
            )));
        }

        // Trie and store must describe the same filing, entry for entry.
        let mut filed = HashSet::new();
        for (path, entry) in trie.entry_paths() {
            let (_, owned) = store.owner(entry.index).map_err(|_| {
                Error::malformed(format!("category trie references unknown entry {}", entry.index))
            })?;
            if owned.categories != path {
                return Err(Error::malformed(format!(
                    "entry {} is filed under '{}' but its record lists '{}'",
                    entry.index,
                    join_path(path.as_slice()),
                    join_path(owned.categories.as_slice())
                )));
            }
            filed.insert(entry.index);
        }
        if let Some(missing) = store
            .records()
            .iter()
            .flat_map(|m| m.entries.iter())
            .find(|e| !filed.contains(&e.entry_index))
        {
            return Err(Error::malformed(format!(
                "entry {} is missing from the category trie",
                missing.entry_index
            )));
        }

        if categories != trie.list_categories() {
            return Err(Error::malformed(
                "stored category list does not match the category trie",
            ));
        }

        debug!(
            "loaded pokedex: {} records, {} entries, {} categories",
            store.total(),
            store.entry_count(),
            categories.len()
        );
        Ok(Self { trie, store, art, categories })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_snapshot(load_from_disk(path)?)
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            categories: self.categories.clone(),
            names: self.store.name_dictionary().clone(),
            metadata: self.store.records().to_vec(),
            total: self.store.total(),
            trie: self.trie.clone(),
            art: self.art.clone(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_to_disk(&self.to_snapshot(), path)
    }

    pub fn selector(&self) -> Selector<'_> {
        Selector::new(&self.trie, &self.store)
    }

    pub fn select<R: Rng + ?Sized>(&self, request: &Request, rng: &mut R) -> Result<Selection<'_>> {
        self.selector().select(request, rng)
    }

    pub fn list_categories(&self) -> &[String] {
        &self.categories
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.store.names()
    }

    pub fn total(&self) -> usize {
        self.store.total()
    }

    pub fn trie(&self) -> &CategoryTrie {
        &self.trie
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }
}

impl ArtSource for Pokedex {
    fn art(&self, entry: EntryIndex) -> Result<Vec<u8>> {
        self.art.art(entry)
    }
}
