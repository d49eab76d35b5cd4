// File: src/builder.rs
use crate::assets::ArtStore;
use crate::core::engine::Pokedex;
use crate::core::trie::CategoryTrie;
use crate::core::types::{EntryRef, MetadataEntry, MetadataIndex, PokemonMetadata, PokemonName};
use crate::error::{Error, Result};
use crate::persistence::{Snapshot, SNAPSHOT_VERSION};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const ART_EXTENSION: &str = "cow";
const SMALL_MAX_LINES: usize = 13;
const MEDIUM_MAX_LINES: usize = 19;

/// One source art file, read and classified.
#[derive(Debug, Clone)]
pub struct SourceArt {
    pub categories: Vec<String>,
    pub data: Vec<u8>,
}

/// Accumulates pokemon and their art variants, then validates the result
/// into a [`Pokedex`].
pub struct PokedexBuilder {
    trie: CategoryTrie,
    records: Vec<PokemonMetadata>,
    names: BTreeMap<String, Vec<MetadataIndex>>,
    art: ArtStore,
}

impl Default for PokedexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PokedexBuilder {
    pub fn new() -> Self {
        Self {
            trie: CategoryTrie::new(),
            records: Vec::new(),
            names: BTreeMap::new(),
            art: ArtStore::new(),
        }
    }

    /// Adds one named pokemon with all of its variants. Each variant gets
    /// the next entry index and is filed in the trie under its categories.
    pub fn add_pokemon(&mut self, slug: &str, name: &PokemonName, variants: Vec<SourceArt>) -> Result<MetadataIndex> {
        if variants.is_empty() {
            return Err(Error::InvalidInsertion(format!("'{}' has no art", slug)));
        }
        // Reject up front so a bad variant leaves the builder untouched.
        if variants
            .iter()
            .any(|v| v.categories.is_empty() || v.categories.iter().any(String::is_empty))
        {
            return Err(Error::InvalidInsertion(format!(
                "'{}' has a variant with an empty category",
                slug
            )));
        }

        let meta_idx = self.records.len();
        let mut metadata = PokemonMetadata::new(&name.english, &name.japanese, &name.japanese_phonetic);
        for variant in variants {
            let entry_index = self.art.len();
            self.trie.insert(&variant.categories, EntryRef::new(entry_index, slug))?;
            self.art.push(&variant.data)?;
            debug!("entry {}: {} {:?}", entry_index, slug, variant.categories);
            metadata.entries.push(MetadataEntry {
                entry_index,
                categories: variant.categories,
            });
        }

        self.records.push(metadata);
        self.names.entry(slug.to_string()).or_default().push(meta_idx);
        Ok(meta_idx)
    }

    pub fn finish(self) -> Result<Pokedex> {
        Pokedex::from_snapshot(Snapshot {
            version: SNAPSHOT_VERSION,
            categories: self.trie.list_categories(),
            names: self.names,
            total: self.records.len(),
            metadata: self.records,
            trie: self.trie,
            art: self.art,
        })
    }
}

/// Builds a pokedex from a directory of `.cow` files and a names dictionary.
pub fn build_from_dir(art_root: &Path, names_path: &Path) -> Result<Pokedex> {
    let files = find_art_files(art_root)?;
    info!("found {} art files under {}", files.len(), art_root.display());
    let names = read_names(names_path)?;
    info!("read {} names from {}", names.len(), names_path.display());

    let mut claimed: BTreeMap<&str, Vec<&PathBuf>> = BTreeMap::new();
    for file in &files {
        match owning_slug(file, names.keys().map(String::as_str)) {
            Some(slug) => claimed.entry(slug).or_default().push(file),
            None => warn!("no name matches {}, skipping", file.display()),
        }
    }

    let mut builder = PokedexBuilder::new();
    for (slug, paths) in claimed {
        let name = &names[slug];
        let mut variants = Vec::with_capacity(paths.len());
        for path in paths {
            let data = fs::read(art_root.join(path))?;
            variants.push(SourceArt { categories: categorize(path, &data), data });
        }
        builder.add_pokemon(slug, name, variants)?;
    }

    let pokedex = builder.finish()?;
    info!(
        "indexed {} pokemon, {} categories",
        pokedex.total(),
        pokedex.list_categories().len()
    );
    Ok(pokedex)
}

/// Every `.cow` file under `root`, as paths relative to it, sorted.
pub fn find_art_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(ART_EXTENSION)
        {
            if let Ok(relative) = path.strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Reads the `{"slug": {"english": ..., "japanese": ..., "japanese_phonetic": ...}}` dictionary.
pub fn read_names(path: &Path) -> Result<BTreeMap<String, PokemonName>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// The longest slug the file stem belongs to: the stem equals it or starts with `slug-`.
fn owning_slug<'a>(path: &Path, slugs: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let stem = path.file_stem()?.to_str()?;
    slugs
        .filter(|slug| {
            stem == *slug
                || stem
                    .strip_prefix(*slug)
                    .map_or(false, |rest| rest.starts_with('-'))
        })
        .max_by_key(|slug| slug.len())
}

/// `[size, variant suffix, directories...]`, e.g. `gen7x/shiny/charizard-mega-y.cow`
/// of 20 lines gives `[big, mega-y, gen7x, shiny]`.
pub fn categorize(relative: &Path, data: &[u8]) -> Vec<String> {
    let lines = data.split(|&b| b == b'\n').count();
    let mut categories = vec![size_category(lines).to_string()];

    if let Some(stem) = relative.file_stem().and_then(|s| s.to_str()) {
        if let Some((_, suffix)) = stem.split_once('-') {
            if !suffix.is_empty() {
                categories.push(suffix.to_string());
            }
        }
    }
    if let Some(parent) = relative.parent() {
        categories.extend(
            parent
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .filter(|c| !c.is_empty() && *c != "." && *c != "..")
                .map(str::to_string),
        );
    }
    categories
}

pub fn size_category(lines: usize) -> &'static str {
    if lines <= SMALL_MAX_LINES {
        "small"
    } else if lines <= MEDIUM_MAX_LINES {
        "medium"
    } else {
        "big"
    }
}
