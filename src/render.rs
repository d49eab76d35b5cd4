// File: src/render.rs
//! Speech bubble and info line drawing around a chosen pokemon.

use crate::core::types::PokemonMetadata;
use crossterm::style::Stylize;
use std::io::{self, BufRead};
use unicode_width::UnicodeWidthChar;

const RESET: &str = "\x1b[0m";
const TAIL_LINES: usize = 4;
const TAIL_INDENT: usize = 8;
const TETHER_OFFSET: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxChars {
    pub horizontal_edge: &'static str,
    pub vertical_edge: &'static str,
    pub top_right_corner: &'static str,
    pub top_left_corner: &'static str,
    pub bottom_right_corner: &'static str,
    pub bottom_left_corner: &'static str,
    pub balloon_string: &'static str,
    pub balloon_tether: &'static str,
    pub separator: &'static str,
    pub right_arrow: &'static str,
    pub category_separator: &'static str,
}

pub const ASCII_BOX_CHARS: BoxChars = BoxChars {
    horizontal_edge: "-",
    vertical_edge: "|",
    top_right_corner: "\\",
    top_left_corner: "/",
    bottom_right_corner: "/",
    bottom_left_corner: "\\",
    balloon_string: "\\",
    balloon_tether: "¡",
    separator: "|",
    right_arrow: ">",
    category_separator: "/",
};

pub const UNICODE_BOX_CHARS: BoxChars = BoxChars {
    horizontal_edge: "─",
    vertical_edge: "│",
    top_right_corner: "╮",
    top_left_corner: "╭",
    bottom_right_corner: "╯",
    bottom_left_corner: "╰",
    balloon_string: "╲",
    balloon_tether: "╲",
    separator: "│",
    right_arrow: "→",
    category_separator: "/",
};

impl BoxChars {
    pub fn for_unicode(unicode: bool) -> &'static BoxChars {
        if unicode {
            &UNICODE_BOX_CHARS
        } else {
            &ASCII_BOX_CHARS
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: usize,
    pub wrap: bool,
    /// Replacement for tab characters; `None` leaves tabs alone.
    pub tab_spaces: Option<String>,
    pub draw_bubble: bool,
    pub japanese_name: bool,
    pub category_info: bool,
    pub info_border: bool,
    /// Bold names and italic categories.
    pub styled: bool,
    pub box_chars: &'static BoxChars,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            wrap: true,
            tab_spaces: Some(" ".repeat(4)),
            draw_bubble: true,
            japanese_name: false,
            category_info: true,
            info_border: false,
            styled: true,
            box_chars: &ASCII_BOX_CHARS,
        }
    }
}

/// Bubble around `input`, the art, then the info line.
pub fn render<R: BufRead>(
    input: R,
    art: &[u8],
    metadata: &PokemonMetadata,
    categories: &[String],
    opts: &RenderOptions,
) -> io::Result<String> {
    let mut out = speech_bubble(input, opts)?;
    out.push_str(&String::from_utf8_lossy(art));
    out.push_str(&info_line(&display_names(metadata, opts.japanese_name), categories, opts));
    Ok(out)
}

pub fn speech_bubble<R: BufRead>(input: R, opts: &RenderOptions) -> io::Result<String> {
    let chars = opts.box_chars;
    let mut out = String::new();

    if opts.draw_bubble {
        out.push_str(chars.top_left_corner);
        out.push_str(&chars.horizontal_edge.repeat(opts.width + 2));
        out.push_str(chars.top_right_corner);
        out.push('\n');
    }

    for line in input.lines() {
        let mut line = line?;
        if let Some(spaces) = &opts.tab_spaces {
            line = line.replace('\t', spaces);
        }
        if opts.wrap {
            for wrapped in wrap_line(&line, opts.width) {
                bubble_line(&wrapped, opts, &mut out);
            }
        } else {
            bubble_line(&line, opts, &mut out);
        }
    }

    let bottom = format!(
        "{}{}{}",
        chars.horizontal_edge.repeat(TETHER_OFFSET),
        chars.balloon_tether,
        chars.horizontal_edge.repeat((opts.width + 2).saturating_sub(TETHER_OFFSET + 1)),
    );
    if opts.draw_bubble {
        out.push_str(chars.bottom_left_corner);
        out.push_str(&bottom);
        out.push_str(chars.bottom_right_corner);
    } else {
        out.push(' ');
        out.push_str(&bottom);
        out.push(' ');
    }
    out.push('\n');

    for i in 0..TAIL_LINES {
        out.push_str(&" ".repeat(i + TAIL_INDENT));
        out.push_str(chars.balloon_string);
        out.push('\n');
    }
    Ok(out)
}

fn bubble_line(line: &str, opts: &RenderOptions, out: &mut String) {
    if !opts.draw_bubble {
        out.push_str(line);
        out.push('\n');
        return;
    }

    let edge = opts.box_chars.vertical_edge;
    let len = display_width(line);
    out.push_str(edge);
    out.push(' ');
    out.push_str(line);
    out.push_str(RESET);
    // Overlong lines lose their right-hand edge instead of breaking the box.
    if len <= opts.width {
        out.push_str(&" ".repeat(opts.width - len));
        out.push(' ');
        out.push_str(edge);
    }
    out.push('\n');
}

/// Greedy word wrap on spaces. Words wider than `width` stay whole on their own line.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for (i, word) in line.split(' ').enumerate() {
        let word_width = display_width(word);
        if i == 0 {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }
    lines.push(current);
    lines
}

/// Terminal column width of `s`, skipping ANSI escape sequences.
pub fn display_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            // CSI sequences end at the first byte in '@'..='~'.
            chars.next();
            for end in chars.by_ref() {
                if ('@'..='~').contains(&end) {
                    break;
                }
            }
            continue;
        }
        width += c.width().unwrap_or(0);
    }
    width
}

/// The English name, plus `Japanese (phonetic)` when asked for.
pub fn display_names(metadata: &PokemonMetadata, japanese: bool) -> Vec<String> {
    let mut names = vec![metadata.name.clone()];
    if japanese {
        names.push(format!("{} ({})", metadata.japanese_name, metadata.japanese_phonetic));
    }
    names
}

/// `> Name | Other Name | cat/ego/ries`, optionally framed.
pub fn info_line(names: &[String], categories: &[String], opts: &RenderOptions) -> String {
    let chars = opts.box_chars;
    let name_sep = format!(" {} ", chars.separator);

    let mut plain = format!("{} {}", chars.right_arrow, names.join(name_sep.as_str()));
    let mut styled = format!(
        "{} {}",
        chars.right_arrow,
        names
            .iter()
            .map(|n| if opts.styled { n.as_str().bold().to_string() } else { n.clone() })
            .collect::<Vec<_>>()
            .join(name_sep.as_str())
    );

    if opts.category_info && !categories.is_empty() {
        let joined = categories.join(chars.category_separator);
        plain.push_str(&name_sep);
        plain.push_str(&joined);
        styled.push_str(&name_sep);
        if opts.styled {
            styled.push_str(&joined.as_str().italic().to_string());
        } else {
            styled.push_str(&joined);
        }
    }

    if !opts.info_border {
        return format!("{}\n", styled);
    }

    let horizontal = chars.horizontal_edge.repeat(display_width(&plain) + 2);
    format!(
        "{}{}{}\n{} {} {}\n{}{}{}\n",
        chars.top_left_corner,
        horizontal,
        chars.top_right_corner,
        chars.vertical_edge,
        styled,
        chars.vertical_edge,
        chars.bottom_left_corner,
        horizontal,
        chars.bottom_right_corner,
    )
}
