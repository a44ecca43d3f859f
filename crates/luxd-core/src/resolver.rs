//! Textual color/program spec resolution
//!
//! Resolution order, first match wins:
//! 1. `"r,g,b"` decimal triple
//! 2. `#RRGGBB` hex color
//! 3. palette name (case-insensitive)
//! 4. JSON array whose first three elements coerce to integers (lenient)
//! 5. builtin generator name (see [`crate::generators`])
//! 6. sequence file on the program search path, one color spec per line

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::error::{EngineError, Result};
use crate::generators;
use crate::palette::Palette;
use crate::program::{Program, Sequence};

/// Resolves spec strings into playable [`Program`]s.
#[derive(Debug)]
pub struct ProgramResolver {
    palette: Palette,
    program_dir: Option<PathBuf>,
    builtins: HashMap<&'static str, fn() -> Program>,
}

impl ProgramResolver {
    /// Create a resolver over a palette, without a program search path
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            program_dir: None,
            builtins: generators::builtins(),
        }
    }

    /// Set the directory searched for sequence program files
    pub fn with_program_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.program_dir = Some(dir.into());
        self
    }

    /// Resolve a spec string into a program
    pub fn resolve(&self, spec: &str) -> Result<Program> {
        let spec = spec.trim();
        if let Some(color) = self.resolve_color(spec) {
            return Ok(Program::Constant(color));
        }
        if let Some(build) = self.builtins.get(spec.to_ascii_lowercase().as_str()) {
            return Ok(build());
        }
        if let Some(dir) = self.program_dir.clone() {
            if let Some(program) = self.resolve_sequence_file(&dir, spec)? {
                return Ok(program);
            }
        }
        Err(EngineError::InvalidColorSpec(spec.to_string()))
    }

    /// Resolve a spec for a stripe: non-per-pixel results get wrapped so
    /// they answer per-pixel queries
    pub fn resolve_for_stripe(&self, spec: &str) -> Result<Program> {
        Ok(self.resolve(spec)?.into_stripe())
    }

    /// The single-color spec forms (decimal triple, hex, palette, JSON)
    pub fn resolve_color(&self, spec: &str) -> Option<Color> {
        parse_decimal_triple(spec)
            .or_else(|| Color::parse_hex(spec))
            .or_else(|| self.palette.get(spec))
            .or_else(|| parse_json_triple(spec))
    }

    fn resolve_sequence_file(&self, dir: &Path, name: &str) -> Result<Option<Program>> {
        let candidate = dir.join(name);
        if !candidate.exists() {
            return Ok(None);
        }
        let resolved = candidate.canonicalize()?;
        let root = dir.canonicalize()?;
        if !resolved.starts_with(&root) {
            return Err(EngineError::PathTraversal(candidate));
        }
        let text = fs::read_to_string(&resolved)?;
        let colors: Vec<Color> = text
            .lines()
            .filter_map(|line| self.resolve_color(line.trim()))
            .collect();
        if colors.is_empty() {
            return Err(EngineError::EmptyProgram(name.to_string()));
        }
        tracing::info!(program = name, colors = colors.len(), "loaded sequence program");
        Ok(Some(Program::Sequence(Sequence::new(colors)?)))
    }
}

fn parse_decimal_triple(spec: &str) -> Option<Color> {
    let mut components = [0i64; 3];
    let mut parts = spec.split(',');
    for slot in &mut components {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Color::from_components(
        components[0],
        components[1],
        components[2],
    ))
}

fn parse_json_triple(spec: &str) -> Option<Color> {
    let value: serde_json::Value = serde_json::from_str(spec).ok()?;
    let array = value.as_array()?;
    if array.len() < 3 {
        return None;
    }
    let mut components = [0i64; 3];
    for (slot, element) in components.iter_mut().zip(array) {
        *slot = element
            .as_i64()
            .or_else(|| element.as_f64().map(|f| f as i64))?;
    }
    Some(Color::from_components(
        components[0],
        components[1],
        components[2],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_triple_needs_exactly_three() {
        assert_eq!(parse_decimal_triple("1,2"), None);
        assert_eq!(parse_decimal_triple("1,2,3,4"), None);
        assert_eq!(parse_decimal_triple("1,2,3"), Some(Color::new(1, 2, 3)));
    }

    #[test]
    fn test_json_triple_coerces_and_clamps() {
        assert_eq!(parse_json_triple("[1, 2, 3]"), Some(Color::new(1, 2, 3)));
        assert_eq!(
            parse_json_triple("[300, -5, 2.9]"),
            Some(Color::new(255, 0, 2))
        );
        assert_eq!(parse_json_triple("[1, 2]"), None);
        assert_eq!(parse_json_triple("{\"r\": 1}"), None);
        assert_eq!(parse_json_triple("not json"), None);
    }
}
