//! CLI argument parsing with clap.

use crate::config::DisplayConfig;
use crate::core::selector::{parse_category_path, Request};
use crate::render::{BoxChars, RenderOptions};
use clap::Parser;
use std::path::PathBuf;

/// Print a pokemon in a speech bubble around text read from stdin
#[derive(Parser, Debug)]
#[command(name = "pokesay")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Choose a pokemon whose name contains this token
    #[arg(short, long)]
    pub name: Option<String>,

    /// Choose a pokemon from a category path starting at its size tag
    /// (small, medium or big), e.g. small/gen7x
    #[arg(short, long)]
    pub category: Option<String>,

    /// List all available names
    #[arg(short = 'l', long)]
    pub list_names: bool,

    /// List all available categories
    #[arg(short = 'L', long)]
    pub list_categories: bool,

    /// Maximum speech bubble width
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Replace tab characters with N spaces
    #[arg(short, long)]
    pub tab_width: Option<usize>,

    /// Disable text wrapping
    #[arg(short = 'W', long)]
    pub no_wrap: bool,

    /// Do not replace tab characters
    #[arg(short = 's', long)]
    pub no_tab_spaces: bool,

    /// Fastest configuration (--no-wrap --no-tab-spaces)
    #[arg(short, long)]
    pub fastest: bool,

    /// Print the japanese name in the info box
    #[arg(short, long)]
    pub japanese_name: bool,

    /// Do not print category information in the info box
    #[arg(short = 'C', long)]
    pub no_category_info: bool,

    /// Draw a border around the info box
    #[arg(short = 'b', long)]
    pub info_border: bool,

    /// Use unicode characters for borders
    #[arg(short, long)]
    pub unicode_borders: bool,

    /// Print the text without a bubble border
    #[arg(long)]
    pub no_bubble: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Seed for a reproducible pick
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pokedex snapshot to load
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn request(&self) -> Request {
        let category = self.category.as_deref().map(parse_category_path);
        Request::from_filters(self.name.as_deref(), category.as_deref())
    }

    /// Config values with any flags given on the command line layered on top.
    pub fn render_options(&self, display: &DisplayConfig) -> RenderOptions {
        let mut opts = display.render_options();
        if let Some(width) = self.width {
            opts.width = width;
        }
        if let Some(tab_width) = self.tab_width {
            opts.tab_spaces = Some(" ".repeat(tab_width));
        }
        if self.no_wrap || self.fastest {
            opts.wrap = false;
        }
        if self.no_tab_spaces || self.fastest {
            opts.tab_spaces = None;
        }
        if self.japanese_name {
            opts.japanese_name = true;
        }
        if self.no_category_info {
            opts.category_info = false;
        }
        if self.info_border {
            opts.info_border = true;
        }
        if self.unicode_borders {
            opts.box_chars = BoxChars::for_unicode(true);
        }
        if self.no_bubble {
            opts.draw_bubble = false;
        }
        opts
    }
}

/// Build a pokesay snapshot from a directory of cowfiles
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(version, about, long_about = None)]
pub struct PokedexArgs {
    /// Directory searched recursively for .cow files
    #[arg(long, default_value = "/tmp/cows")]
    pub from: PathBuf,

    /// Names dictionary (JSON keyed by slug)
    #[arg(long, default_value = "/tmp/cows/pokemon.json")]
    pub names: PathBuf,

    /// Snapshot file to write
    #[arg(long, default_value = "build/pokedex.bin")]
    pub to: PathBuf,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
