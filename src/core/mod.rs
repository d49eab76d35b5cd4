// src/core/mod.rs

pub mod engine;
pub mod metadata;
pub mod selector;
pub mod trie;
pub mod types;
