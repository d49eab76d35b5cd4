// File: src/persistence.rs
use crate::assets::ArtStore;
use crate::core::trie::CategoryTrie;
use crate::core::types::{MetadataIndex, PokemonMetadata};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Bumped whenever the layout of [`Snapshot`] changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The serialized form of a built pokedex.
///
/// Decoding only checks the wire format; consistency checks happen in
/// [`crate::Pokedex::from_snapshot`] before anything is queried.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Flattened category vocabulary, as returned by `CategoryTrie::list_categories`.
    pub categories: Vec<String>,
    /// Name slug -> metadata indices.
    pub names: BTreeMap<String, Vec<MetadataIndex>>,
    pub metadata: Vec<PokemonMetadata>,
    pub total: usize,
    pub trie: CategoryTrie,
    pub art: ArtStore,
}

pub fn save_to_disk(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, snapshot)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<Snapshot> {
    let file = File::open(path)?;
    read_snapshot(BufReader::new(file))
}

pub fn from_bytes(bytes: &[u8]) -> Result<Snapshot> {
    read_snapshot(bytes)
}

fn read_snapshot<R: Read>(reader: R) -> Result<Snapshot> {
    let snapshot: Snapshot = bincode::deserialize_from(reader)
        .map_err(|e| Error::malformed(format!("could not decode snapshot: {}", e)))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(Error::malformed(format!(
            "snapshot version {} is not supported (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntryRef, MetadataEntry};

    fn tiny_snapshot() -> Snapshot {
        let mut trie = CategoryTrie::new();
        trie.insert(&["small", "g1"], EntryRef::new(0, "pikachu")).unwrap();
        let mut art = ArtStore::new();
        art.push(b"(\\__/)\n").unwrap();
        Snapshot {
            version: SNAPSHOT_VERSION,
            categories: trie.list_categories(),
            names: BTreeMap::from([("pikachu".to_string(), vec![0])]),
            metadata: vec![PokemonMetadata::new("Pikachu", "ピカチュウ", "pikachuu")
                .with_entry(MetadataEntry::new(0, &["small", "g1"]))],
            total: 1,
            trie,
            art,
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pokedex.bin");
        save_to_disk(&tiny_snapshot(), &path).unwrap();

        let loaded = load_from_disk(&path).unwrap();
        assert_eq!(loaded.total, 1);
        assert_eq!(loaded.categories, vec!["g1", "small"]);
        assert_eq!(loaded.metadata[0].japanese_name, "ピカチュウ");
        assert_eq!(loaded.trie.list_categories(), loaded.categories);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = from_bytes(b"definitely not a pokedex").unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn test_truncated_is_malformed() {
        let bytes = bincode::serialize(&tiny_snapshot()).unwrap();
        let err = from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn test_version_mismatch_is_malformed() {
        let mut snapshot = tiny_snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;
        let bytes = bincode::serialize(&snapshot).unwrap();
        assert!(matches!(from_bytes(&bytes), Err(Error::MalformedSnapshot(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_disk(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
