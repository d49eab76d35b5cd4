// src/core/selector.rs
use crate::core::metadata::MetadataStore;
use crate::core::trie::{join_path, CategoryTrie};
use crate::core::types::{EntryIndex, MetadataIndex, PokemonMetadata};
use crate::error::{Lookup, Result};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Random,
    Name(String),
    Category(Vec<String>),
    NameAndCategory { name: String, category: Vec<String> },
}

impl Request {
    /// Picks the request shape from optional filters. Name and category
    /// together win over either alone; nothing at all means random.
    pub fn from_filters(name: Option<&str>, category: Option<&[String]>) -> Self {
        let name = name.filter(|n| !n.is_empty());
        let category = category.filter(|c| !c.is_empty());
        match (name, category) {
            (Some(name), Some(category)) => Request::NameAndCategory {
                name: name.to_string(),
                category: category.to_vec(),
            },
            (Some(name), None) => Request::Name(name.to_string()),
            (None, Some(category)) => Request::Category(category.to_vec()),
            (None, None) => Request::Random,
        }
    }
}

/// Splits a `small/gen7x/shiny` style argument into path segments.
pub fn parse_category_path(raw: &str) -> Vec<String> {
    raw.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A resolved request: the record, the chosen art entry and its category path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub metadata_index: MetadataIndex,
    pub metadata: &'a PokemonMetadata,
    pub entry_index: EntryIndex,
    pub categories: &'a [String],
}

/// Resolves requests against a loaded trie and metadata store.
/// Holds no state of its own; randomness is supplied per call.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    trie: &'a CategoryTrie,
    store: &'a MetadataStore,
}

impl<'a> Selector<'a> {
    pub fn new(trie: &'a CategoryTrie, store: &'a MetadataStore) -> Self {
        Self { trie, store }
    }

    pub fn select<R: Rng + ?Sized>(&self, request: &Request, rng: &mut R) -> Result<Selection<'a>> {
        match request {
            Request::Random => self.random(rng),
            Request::Name(name) => self.by_name(name, rng),
            Request::Category(category) => self.by_category(category, rng),
            Request::NameAndCategory { name, category } => {
                self.by_name_and_category(name, category, rng)
            }
        }
    }

    /// Uniform over records, then uniform over the record's entries.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Selection<'a>> {
        let total = self.store.total();
        if total == 0 {
            return Err(Lookup::EmptyPokedex.into());
        }
        let choice = rng.gen_range(0..total);
        debug!("random choice {} of {}", choice, total);
        self.pick_variant(choice, rng)
    }

    pub fn by_name<R: Rng + ?Sized>(&self, token: &str, rng: &mut R) -> Result<Selection<'a>> {
        let candidates = self.store.by_name(token);
        debug!("name '{}' matched {} records", token, candidates.len());
        let &choice = candidates
            .choose(rng)
            .ok_or_else(|| Lookup::Name(token.to_string()))?;
        self.pick_variant(choice, rng)
    }

    pub fn by_category<R: Rng + ?Sized, S: AsRef<str>>(
        &self,
        category: &[S],
        rng: &mut R,
    ) -> Result<Selection<'a>> {
        let node = self.trie.lookup(category)?;
        let entries = self.trie.collect_entries(node);
        debug!("category '{}' holds {} entries", join_path(category), entries.len());
        let entry = entries
            .choose(rng)
            .ok_or_else(|| Lookup::EmptyCategory(join_path(category)))?;
        self.resolve_entry(entry.index)
    }

    /// Entries under `category` whose owning record matches `token`.
    pub fn by_name_and_category<R: Rng + ?Sized, S: AsRef<str>>(
        &self,
        token: &str,
        category: &[S],
        rng: &mut R,
    ) -> Result<Selection<'a>> {
        let not_found = || Lookup::NameInCategory {
            name: token.to_string(),
            category: join_path(category),
        };

        let candidates: BTreeSet<MetadataIndex> = self.store.by_name(token).into_iter().collect();
        if candidates.is_empty() {
            return Err(not_found().into());
        }
        let node = self.trie.lookup(category).map_err(|_| not_found())?;

        let matching: Vec<EntryIndex> = self
            .trie
            .collect_entries(node)
            .into_iter()
            .map(|entry| entry.index)
            .filter(|&idx| {
                self.store
                    .owner(idx)
                    .map(|(owner, _)| candidates.contains(&owner))
                    .unwrap_or(false)
            })
            .collect();
        debug!(
            "name '{}' in category '{}' matched {} entries",
            token,
            join_path(category),
            matching.len()
        );

        let &choice = matching.choose(rng).ok_or_else(not_found)?;
        self.resolve_entry(choice)
    }

    fn pick_variant<R: Rng + ?Sized>(&self, meta_idx: MetadataIndex, rng: &mut R) -> Result<Selection<'a>> {
        let metadata = self.store.by_index(meta_idx)?;
        let entry = metadata
            .entries
            .choose(rng)
            .ok_or(Lookup::Index { index: meta_idx, total: self.store.total() })?;
        Ok(Selection {
            metadata_index: meta_idx,
            metadata,
            entry_index: entry.entry_index,
            categories: &entry.categories,
        })
    }

    fn resolve_entry(&self, entry_index: EntryIndex) -> Result<Selection<'a>> {
        let (metadata_index, entry) = self.store.owner(entry_index)?;
        Ok(Selection {
            metadata_index,
            metadata: self.store.by_index(metadata_index)?,
            entry_index,
            categories: &entry.categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntryRef, MetadataEntry};
    use crate::error::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeMap, HashSet};

    struct Fixture {
        trie: CategoryTrie,
        store: MetadataStore,
    }

    impl Fixture {
        fn selector(&self) -> Selector<'_> {
            Selector::new(&self.trie, &self.store)
        }
    }

    /// pikachu: entry 0 [small, g1]
    /// bulbasaur: entry 1 [small, g1], entry 2 [medium, g1]
    fn fixture() -> Fixture {
        let records = vec![
            PokemonMetadata::new("Pikachu", "ピカチュウ", "pikachuu")
                .with_entry(MetadataEntry::new(0, &["small", "g1"])),
            PokemonMetadata::new("Bulbasaur", "フシギダネ", "fushigidane")
                .with_entry(MetadataEntry::new(1, &["small", "g1"]))
                .with_entry(MetadataEntry::new(2, &["medium", "g1"])),
        ];
        let mut trie = CategoryTrie::new();
        for record in &records {
            for entry in &record.entries {
                trie.insert(&entry.categories, EntryRef::new(entry.entry_index, record.name.to_lowercase()))
                    .unwrap();
            }
        }
        let names = BTreeMap::from([
            ("pikachu".to_string(), vec![0]),
            ("bulbasaur".to_string(), vec![1]),
        ]);
        Fixture { trie, store: MetadataStore::new(records, names).unwrap() }
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_request_precedence() {
        let cat = path(&["small"]);
        let none: Vec<String> = Vec::new();
        assert_eq!(
            Request::from_filters(Some("pikachu"), Some(cat.as_slice())),
            Request::NameAndCategory { name: "pikachu".into(), category: cat.clone() }
        );
        assert_eq!(Request::from_filters(Some("pikachu"), None), Request::Name("pikachu".into()));
        assert_eq!(Request::from_filters(None, Some(cat.as_slice())), Request::Category(cat.clone()));
        assert_eq!(Request::from_filters(Some(""), Some(none.as_slice())), Request::Random);
        assert_eq!(Request::from_filters(None, None), Request::Random);
    }

    #[test]
    fn test_parse_category_path() {
        assert_eq!(parse_category_path("small/g1"), path(&["small", "g1"]));
        assert_eq!(parse_category_path("/small//shiny/"), path(&["small", "shiny"]));
        assert!(parse_category_path("").is_empty());
    }

    #[test]
    fn test_random_stays_in_bounds() {
        let fx = fixture();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let sel = fx.selector().select(&Request::Random, &mut rng).unwrap();
            assert!(sel.metadata_index < fx.store.total());
            assert!(sel.entry_index <= 2);
            assert!(sel.metadata.entries.iter().any(|e| e.entry_index == sel.entry_index));
        }
    }

    #[test]
    fn test_random_single_record_is_always_zero() {
        let records = vec![PokemonMetadata::new("Mew", "", "").with_entry(MetadataEntry::new(0, &["small"]))];
        let mut trie = CategoryTrie::new();
        trie.insert(&["small"], EntryRef::new(0, "mew")).unwrap();
        let store = MetadataStore::new(records, BTreeMap::new()).unwrap();
        let selector = Selector::new(&trie, &store);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(selector.random(&mut rng).unwrap().metadata_index, 0);
        }
    }

    #[test]
    fn test_random_on_empty_pokedex() {
        let trie = CategoryTrie::new();
        let store = MetadataStore::new(Vec::new(), BTreeMap::new()).unwrap();
        let err = Selector::new(&trie, &store)
            .random(&mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Lookup::EmptyPokedex)));
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let fx = fixture();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| fx.selector().random(&mut rng).unwrap().entry_index)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_by_name_picks_among_variants() {
        let fx = fixture();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let sel = fx.selector().by_name("bulbasaur", &mut rng).unwrap();
            assert_eq!(sel.metadata.name, "Bulbasaur");
            seen.insert(sel.entry_index);
        }
        assert_eq!(seen, HashSet::from([1, 2]));
    }

    #[test]
    fn test_by_name_draws_among_matching_records() {
        let records = vec![
            PokemonMetadata::new("Charmander", "ヒトカゲ", "hitokage")
                .with_entry(MetadataEntry::new(0, &["small", "g1"]))
                .with_entry(MetadataEntry::new(1, &["small", "g1", "shiny"])),
            PokemonMetadata::new("Charmeleon", "リザード", "rizaado")
                .with_entry(MetadataEntry::new(2, &["medium", "g1"])),
        ];
        let mut trie = CategoryTrie::new();
        for record in &records {
            for entry in &record.entries {
                trie.insert(&entry.categories, EntryRef::new(entry.entry_index, record.name.to_lowercase()))
                    .unwrap();
            }
        }
        let names = BTreeMap::from([
            ("charmander".to_string(), vec![0]),
            ("charmeleon".to_string(), vec![1]),
        ]);
        let fx = Fixture { trie, store: MetadataStore::new(records, names).unwrap() };

        let mut drawn = HashSet::new();
        for seed in 0..100 {
            let sel = fx.selector().by_name("charm", &mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(sel.metadata.entries.iter().any(|e| e.entry_index == sel.entry_index));
            drawn.insert(sel.metadata.name.clone());
        }
        assert_eq!(drawn, HashSet::from(["Charmander".to_string(), "Charmeleon".to_string()]));
    }

    #[test]
    fn test_by_name_unknown_is_not_found() {
        let fx = fixture();
        let err = fx
            .selector()
            .select(&Request::Name("mewtwo".into()), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, Error::NotFound(Lookup::Name(ref n)) if n == "mewtwo"));
    }

    #[test]
    fn test_by_category_draws_only_from_subtree() {
        let fx = fixture();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let sel = fx
                .selector()
                .select(&Request::Category(path(&["small"])), &mut rng)
                .unwrap();
            assert_eq!(sel.categories[0], "small");
            seen.insert(sel.entry_index);
        }
        assert_eq!(seen, HashSet::from([0, 1]));
    }

    #[test]
    fn test_by_category_exact_path() {
        let fx = fixture();
        let sel = fx
            .selector()
            .by_category(&["medium", "g1"], &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(sel.entry_index, 2);
        assert_eq!(sel.metadata_index, 1);
        assert_eq!(sel.categories, &["medium".to_string(), "g1".to_string()]);
    }

    #[test]
    fn test_by_category_missing_path() {
        let fx = fixture();
        let err = fx
            .selector()
            .by_category(&["big"], &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Lookup::Category(_))));
    }

    #[test]
    fn test_by_category_empty_subtree() {
        let mut fx = fixture();
        // The root carries children but no entries of its own.
        let empty: [&str; 0] = [];
        assert!(fx.selector().by_category(&empty, &mut StdRng::seed_from_u64(0)).is_ok());

        fx.trie = CategoryTrie::new();
        let err = fx
            .selector()
            .by_category(&empty, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Lookup::EmptyCategory(_))));
    }

    #[test]
    fn test_by_name_and_category_single_candidate() {
        let fx = fixture();
        for seed in 0..20 {
            let sel = fx
                .selector()
                .select(
                    &Request::NameAndCategory { name: "bulbasaur".into(), category: path(&["medium"]) },
                    &mut StdRng::seed_from_u64(seed),
                )
                .unwrap();
            assert_eq!(sel.entry_index, 2);
            assert_eq!(sel.metadata.name, "Bulbasaur");
        }
    }

    #[test]
    fn test_by_name_and_category_intersection() {
        let fx = fixture();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let sel = fx.selector().by_name_and_category("saur", &["small"], &mut rng).unwrap();
            seen.insert(sel.entry_index);
        }
        assert_eq!(seen, HashSet::from([1]));
    }

    #[test]
    fn test_by_name_and_category_empty_intersection() {
        let fx = fixture();
        let mut rng = StdRng::seed_from_u64(0);
        let err = fx.selector().by_name_and_category("pikachu", &["medium"], &mut rng).unwrap_err();
        assert!(matches!(err, Error::NotFound(Lookup::NameInCategory { .. })));

        let err = fx.selector().by_name_and_category("pikachu", &["big"], &mut rng).unwrap_err();
        assert!(matches!(err, Error::NotFound(Lookup::NameInCategory { .. })));

        let err = fx.selector().by_name_and_category("eevee", &["small"], &mut rng).unwrap_err();
        assert!(matches!(err, Error::NotFound(Lookup::NameInCategory { .. })));
    }
}
