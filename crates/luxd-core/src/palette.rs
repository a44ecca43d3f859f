//! Named color palette
//!
//! Loaded from a line-oriented text file with `name #RRGGBB` pairs, one
//! per line. Lookups are case-insensitive; malformed lines are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::color::Color;
use crate::error::Result;

/// Case-insensitive name-to-color lookup table.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<String, Color>,
}

impl Palette {
    /// Create an empty palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a palette file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let palette = Self::parse(&text);
        tracing::info!(path = %path.display(), colors = palette.len(), "palette loaded");
        Ok(palette)
    }

    /// Parse `name #RRGGBB` lines, skipping anything that does not match
    pub fn parse(text: &str) -> Self {
        let mut palette = Self::new();
        for line in text.lines() {
            let mut parts = line.split_whitespace();
            let (Some(name), Some(hex)) = (parts.next(), parts.next()) else {
                continue;
            };
            match Color::parse_hex(hex) {
                Some(color) => palette.insert(name, color),
                None => tracing::debug!(line, "skipping malformed palette line"),
            }
        }
        palette
    }

    /// Add a named color
    pub fn insert(&mut self, name: &str, color: Color) {
        self.colors.insert(name.to_ascii_lowercase(), color);
    }

    /// Look up a color by name, ignoring case
    pub fn get(&self, name: &str) -> Option<Color> {
        self.colors.get(&name.to_ascii_lowercase()).copied()
    }

    /// Number of named colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no entries
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lookup() {
        let palette = Palette::parse("red #ff0000\nWarmWhite #ffd890\n");
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get("RED"), Some(Color::new(255, 0, 0)));
        assert_eq!(palette.get("warmwhite"), Some(Color::new(255, 216, 144)));
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let palette = Palette::parse("red #ff0000\n\njunk\nblue not-a-color\ngreen #00ff00\n");
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get("blue"), None);
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert_eq!(Palette::new().get("mauve"), None);
    }
}
