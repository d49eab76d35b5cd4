// src/core/metadata.rs
use crate::core::types::{EntryIndex, MetadataEntry, MetadataIndex, PokemonMetadata};
use crate::error::{Error, Lookup, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Read-only lookup tables over the pokedex metadata records.
///
/// Records are addressed by their position; the name dictionary maps a name
/// slug to the records that carry it, and the owner table maps each art entry
/// back to the record listing it.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    records: Vec<PokemonMetadata>,
    names: BTreeMap<String, Vec<MetadataIndex>>,
    owners: HashMap<EntryIndex, (MetadataIndex, usize)>,
}

impl MetadataStore {
    /// Builds the store, rejecting records without entries, entries claimed
    /// by more than one record and name indices past the end.
    pub fn new(
        records: Vec<PokemonMetadata>,
        names: BTreeMap<String, Vec<MetadataIndex>>,
    ) -> Result<Self> {
        let mut owners = HashMap::new();
        for (meta_idx, record) in records.iter().enumerate() {
            if record.entries.is_empty() {
                return Err(Error::malformed(format!(
                    "metadata {} ('{}') has no entries",
                    meta_idx, record.name
                )));
            }
            for (pos, entry) in record.entries.iter().enumerate() {
                if let Some((other, _)) = owners.insert(entry.entry_index, (meta_idx, pos)) {
                    return Err(Error::malformed(format!(
                        "entry {} is claimed by metadata {} and {}",
                        entry.entry_index, other, meta_idx
                    )));
                }
            }
        }

        for (name, indices) in &names {
            if let Some(&bad) = indices.iter().find(|&&idx| idx >= records.len()) {
                return Err(Error::malformed(format!(
                    "name '{}' points at metadata {} but only {} exist",
                    name,
                    bad,
                    records.len()
                )));
            }
        }

        Ok(Self { records, names, owners })
    }

    /// Number of metadata records; the bound for a uniform random pick.
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Number of art entries across all records.
    pub fn entry_count(&self) -> usize {
        self.owners.len()
    }

    pub fn by_index(&self, idx: MetadataIndex) -> Result<&PokemonMetadata> {
        self.records.get(idx).ok_or_else(|| {
            Lookup::Index { index: idx, total: self.records.len() }.into()
        })
    }

    /// Candidate record indices for `token`, sorted and deduplicated.
    ///
    /// An exact key wins outright; otherwise every key containing `token`
    /// contributes. Matching is case-sensitive. An empty result is not an
    /// error here, the caller decides.
    pub fn by_name(&self, token: &str) -> Vec<MetadataIndex> {
        if let Some(exact) = self.names.get(token) {
            let unique: BTreeSet<MetadataIndex> = exact.iter().copied().collect();
            return unique.into_iter().collect();
        }
        if token.is_empty() {
            return Vec::new();
        }

        let unique: BTreeSet<MetadataIndex> = self
            .names
            .iter()
            .filter(|(name, _)| name.contains(token))
            .flat_map(|(_, indices)| indices.iter().copied())
            .collect();
        unique.into_iter().collect()
    }

    /// The record listing `entry` and that record's variant for it.
    pub fn owner(&self, entry: EntryIndex) -> Result<(MetadataIndex, &MetadataEntry)> {
        let &(meta_idx, pos) = self.owners.get(&entry).ok_or(Lookup::Entry(entry))?;
        Ok((meta_idx, &self.records[meta_idx].entries[pos]))
    }

    /// All name dictionary keys, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.names.keys().map(String::as_str).collect()
    }

    pub fn records(&self) -> &[PokemonMetadata] {
        &self.records
    }

    pub fn name_dictionary(&self) -> &BTreeMap<String, Vec<MetadataIndex>> {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, idx: EntryIndex, cats: &[&str]) -> PokemonMetadata {
        PokemonMetadata::new(name, "", "").with_entry(MetadataEntry::new(idx, cats))
    }

    fn sample_store() -> MetadataStore {
        let records = vec![
            record("Pikachu", 0, &["small", "g1"]),
            record("Bulbasaur", 1, &["small", "g1"])
                .with_entry(MetadataEntry::new(2, &["medium", "g1"])),
            record("Charmander", 3, &["small", "g1"]),
            record("Charmeleon", 4, &["medium", "g1"]),
        ];
        let names = BTreeMap::from([
            ("pikachu".to_string(), vec![0]),
            ("bulbasaur".to_string(), vec![1]),
            ("charmander".to_string(), vec![2]),
            ("charmeleon".to_string(), vec![3]),
        ]);
        MetadataStore::new(records, names).unwrap()
    }

    #[test]
    fn test_by_index() {
        let store = sample_store();
        assert_eq!(store.total(), 4);
        assert_eq!(store.entry_count(), 5);
        assert_eq!(store.by_index(1).unwrap().name, "Bulbasaur");
        // Read-only: repeated lookups agree.
        assert_eq!(store.by_index(1).unwrap(), store.by_index(1).unwrap());
    }

    #[test]
    fn test_by_index_out_of_range() {
        let store = sample_store();
        let err = store.by_index(4).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound(Lookup::Index { index: 4, total: 4 })
        ));
    }

    #[test]
    fn test_by_name_exact_and_substring() {
        let store = sample_store();
        assert_eq!(store.by_name("bulbasaur"), vec![1]);
        assert_eq!(store.by_name("charm"), vec![2, 3]);
        assert_eq!(store.by_name("saur"), vec![1]);
    }

    #[test]
    fn test_by_name_is_case_sensitive() {
        let store = sample_store();
        assert!(store.by_name("Pikachu").is_empty());
        assert!(store.by_name("").is_empty());
        assert!(store.by_name("mewtwo").is_empty());
    }

    #[test]
    fn test_owner() {
        let store = sample_store();
        let (meta_idx, entry) = store.owner(2).unwrap();
        assert_eq!(meta_idx, 1);
        assert_eq!(entry.categories, vec!["medium", "g1"]);
        assert!(matches!(store.owner(9), Err(Error::NotFound(Lookup::Entry(9)))));
    }

    #[test]
    fn test_names_are_sorted() {
        let store = sample_store();
        assert_eq!(
            store.names(),
            vec!["bulbasaur", "charmander", "charmeleon", "pikachu"]
        );
    }

    #[test]
    fn test_rejects_record_without_entries() {
        let records = vec![PokemonMetadata::new("Missingno", "", "")];
        let err = MetadataStore::new(records, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn test_rejects_shared_entry() {
        let records = vec![
            record("Pikachu", 0, &["small"]),
            record("Raichu", 0, &["medium"]),
        ];
        let err = MetadataStore::new(records, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn test_rejects_name_past_end() {
        let records = vec![record("Pikachu", 0, &["small"])];
        let names = BTreeMap::from([("pikachu".to_string(), vec![1])]);
        let err = MetadataStore::new(records, names).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }
}
