// File: src/assets.rs
use crate::core::types::EntryIndex;
use crate::error::{Lookup, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Anything that can hand back the raw art for an entry.
pub trait ArtSource {
    fn art(&self, entry: EntryIndex) -> Result<Vec<u8>>;
}

/// Gzip-compressed art blobs addressed by entry index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtStore {
    blobs: Vec<Vec<u8>>,
}

impl ArtStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compresses `raw` and stores it under the next entry index.
    pub fn push(&mut self, raw: &[u8]) -> Result<EntryIndex> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(raw)?;
        self.blobs.push(encoder.finish()?);
        Ok(self.blobs.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl ArtSource for ArtStore {
    fn art(&self, entry: EntryIndex) -> Result<Vec<u8>> {
        let blob = self.blobs.get(entry).ok_or(Lookup::Entry(entry))?;
        let mut raw = Vec::new();
        GzDecoder::new(blob.as_slice()).read_to_end(&mut raw)?;
        Ok(raw)
    }
}
