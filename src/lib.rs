// src/lib.rs

pub mod assets;
pub mod builder;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod render;

pub use crate::core::engine::Pokedex;
pub use crate::core::selector::{Request, Selection};
pub use crate::error::{Error, Lookup, Result};
