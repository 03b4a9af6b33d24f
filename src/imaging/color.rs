//! Canonical color representation.
//!
//! A [`Color`] carries 8-bit red, green and blue channels plus a
//! *transparency* channel on the legacy 0–127 scale: `0` is fully opaque and
//! `127` (or anything above) is fully transparent. This is the scale hex
//! strings, channel records and the `-1` sentinel are normalized into, and it
//! is what [`colorize`](super::filters::colorize) adds onto pixels.
//!
//! Pixel buffers store conventional RGBA (`255` = opaque); [`Color::to_rgba`]
//! converts between the two.

use crate::error::{Error, Result};
use image::Rgba;

/// Maximum transparency on the legacy scale.
pub const MAX_TRANSPARENCY: u8 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// The legacy `-1` sentinel: fully transparent.
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, MAX_TRANSPARENCY);
    pub const WHITE: Color = Color::new(255, 255, 255, 0);
    pub const BLACK: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid(format!("Invalid hex color \"{hex}\"")));
        }
        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => {
                return Err(Error::invalid(format!(
                    "Invalid hex color \"{hex}\": expected 3, 4, 6 or 8 digits"
                )));
            }
        };
        let byte = |i: usize| u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16);
        let parse = || -> std::result::Result<Color, std::num::ParseIntError> {
            Ok(Color::new(
                byte(0)?,
                byte(1)?,
                byte(2)?,
                if expanded.len() == 8 { byte(3)? } else { 0 },
            ))
        };
        parse().map_err(|_| Error::invalid(format!("Invalid hex color \"{hex}\"")))
    }

    /// Conventional alpha (255 = opaque) for this color's transparency.
    pub fn alpha(self) -> u8 {
        transparency_to_alpha(self.a)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.alpha()])
    }

    pub fn is_opaque(self) -> bool {
        self.a == 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Legacy transparency (0 opaque … 127 transparent) to conventional alpha.
pub fn transparency_to_alpha(transparency: u8) -> u8 {
    let t = transparency.min(MAX_TRANSPARENCY) as u32;
    (255 - (t * 255 + 63) / 127) as u8
}

/// Conventional alpha to legacy transparency.
pub fn alpha_to_transparency(alpha: u8) -> u8 {
    let a = alpha as u32;
    (127 - (a * 127 + 127) / 255) as u8
}
