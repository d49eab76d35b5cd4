//! User configuration, loaded from `~/.config/pokesay/config.toml` or a custom path.

use crate::error::{Error, Result};
use crate::render::{BoxChars, RenderOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "pokesay";

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub pokedex: PokedexConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub tab_width: usize,
    pub wrap: bool,
    pub unicode_borders: bool,
    pub info_border: bool,
    pub japanese_name: bool,
    pub category_info: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 80,
            tab_width: 4,
            wrap: true,
            unicode_borders: false,
            info_border: false,
            japanese_name: false,
            category_info: true,
        }
    }
}

impl DisplayConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            wrap: self.wrap,
            tab_spaces: Some(" ".repeat(self.tab_width)),
            japanese_name: self.japanese_name,
            category_info: self.category_info,
            info_border: self.info_border,
            box_chars: BoxChars::for_unicode(self.unicode_borders),
            ..RenderOptions::default()
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct PokedexConfig {
    /// Snapshot to load instead of the default location.
    pub snapshot: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };

        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|source| Error::Config { path, source })
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.pokedex.snapshot.clone().or_else(default_snapshot_path)
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

pub fn default_snapshot_path() -> Option<PathBuf> {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(APP_DIR).join("pokedex.bin"))
}
