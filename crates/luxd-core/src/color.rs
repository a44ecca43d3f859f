//! RGB color values as written into DMX channel buffers

use serde::{Deserialize, Serialize};

/// An RGB color with 8-bit channel intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// All channels off
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Create a color from 8-bit channel values
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from wider integers, clamping each channel to 0-255.
    ///
    /// Out-of-range values saturate, they never wrap.
    pub fn from_components(r: i64, g: i64, b: i64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Parse a `#RRGGBB` hex color (case-insensitive)
    pub fn parse_hex(spec: &str) -> Option<Self> {
        let digits = spec.strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Format as a `#rrggbb` hex string
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// The three channel bytes in DMX order
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}
