//! Data models for sprite assets (cells, directions, sprites, palettes).
//!
//! `SpriteData` is the canonical representation exchanged with storage: a
//! flat row-major grid of hex-or-transparent cells plus a compass direction
//! label. Serde round-trips it without additional framing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{self, ColorError, Rgb};

/// Error type for sprite construction and validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    /// Pixel array length disagrees with the declared grid dimensions.
    #[error("pixel array has {actual} entries, expected {width}x{height}")]
    DimensionMismatch { width: u32, height: u32, actual: usize },
    /// Normal map length disagrees with the declared grid dimensions.
    #[error("normal map has {actual} entries, expected {width}x{height}")]
    NormalMapMismatch { width: u32, height: u32, actual: usize },
    /// Grid dimensions must be positive.
    #[error("sprite dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    /// A cell carried a malformed color string.
    #[error("invalid cell color: {0}")]
    InvalidColor(#[from] ColorError),
}

/// One grid cell: the `transparent` sentinel or a normalized `#RRGGBB` color.
///
/// Serializes as the literal string `"transparent"` or the hex string, the
/// same hex-or-transparent domain the persisted format and the localized
/// edit protocol use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Transparent,
    Color(String),
}

impl Cell {
    /// Build a color cell from a hex string, normalizing to uppercase `#RRGGBB`.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        Ok(Cell::Color(color::normalize_hex(s)?))
    }

    /// The cell's RGB triple, or `None` for transparent.
    pub fn rgb(&self) -> Option<Rgb> {
        match self {
            Cell::Transparent => None,
            Cell::Color(hex) => color::parse_hex(hex).ok(),
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Cell::Transparent)
    }
}

impl Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Transparent => serializer.serialize_str("transparent"),
            Cell::Color(hex) => serializer.serialize_str(hex),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "transparent" {
            return Ok(Cell::Transparent);
        }
        Cell::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// One of the 8 compass views a character sprite set covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    S,
    N,
    E,
    W,
    SE,
    SW,
    NE,
    NW,
}

impl Direction {
    /// The direction a horizontal mirror of this view depicts.
    ///
    /// N and S are their own mirrors for a bilaterally symmetric character.
    pub fn mirrored(self) -> Direction {
        match self {
            Direction::S => Direction::S,
            Direction::N => Direction::N,
            Direction::E => Direction::W,
            Direction::W => Direction::E,
            Direction::SE => Direction::SW,
            Direction::SW => Direction::SE,
            Direction::NE => Direction::NW,
            Direction::NW => Direction::NE,
        }
    }
}

/// The canonical sprite representation: a row-major hex-or-transparent grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    /// Row-major cells, `index = y * width + x`, length `width * height`.
    pub pixels: Vec<Cell>,
    /// Optional surface-normal encoding, same layout and length as `pixels`.
    #[serde(rename = "normalMap", skip_serializing_if = "Option::is_none", default)]
    pub normal_map: Option<Vec<Cell>>,
    pub direction: Direction,
}

impl SpriteData {
    /// Create a sprite, enforcing the `pixels.len() == width * height` invariant.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<Cell>,
        direction: Direction,
    ) -> Result<Self, SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::ZeroDimension { width, height });
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(SpriteError::DimensionMismatch { width, height, actual: pixels.len() });
        }
        Ok(SpriteData { width, height, pixels, normal_map: None, direction })
    }

    /// Attach a normal map, enforcing the same length invariant.
    pub fn with_normal_map(mut self, normal_map: Vec<Cell>) -> Result<Self, SpriteError> {
        if normal_map.len() != self.pixels.len() {
            return Err(SpriteError::NormalMapMismatch {
                width: self.width,
                height: self.height,
                actual: normal_map.len(),
            });
        }
        self.normal_map = Some(normal_map);
        Ok(self)
    }

    /// Re-check the length invariants (useful after deserialization).
    pub fn validate(&self) -> Result<(), SpriteError> {
        if self.width == 0 || self.height == 0 {
            return Err(SpriteError::ZeroDimension { width: self.width, height: self.height });
        }
        let expected = (self.width as usize) * (self.height as usize);
        if self.pixels.len() != expected {
            return Err(SpriteError::DimensionMismatch {
                width: self.width,
                height: self.height,
                actual: self.pixels.len(),
            });
        }
        if let Some(ref nm) = self.normal_map {
            if nm.len() != expected {
                return Err(SpriteError::NormalMapMismatch {
                    width: self.width,
                    height: self.height,
                    actual: nm.len(),
                });
            }
        }
        Ok(())
    }

    /// Flat index for `(x, y)`, unchecked against bounds.
    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.pixels.get(self.idx(x, y))
        } else {
            None
        }
    }

    /// Distinct colors present among non-transparent cells, in first-seen order.
    pub fn palette(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut colors = Vec::new();
        for cell in &self.pixels {
            if let Cell::Color(hex) = cell {
                if seen.insert(hex.clone()) {
                    colors.push(hex.clone());
                }
            }
        }
        colors
    }
}

/// A fixed, ordered set of unique hex colors a character's sprites conform to.
///
/// Chosen once per character and held across all directional views and
/// edits; never mutated in place, only replaced wholesale. Entries are
/// normalized and pre-parsed at construction so snapping never re-parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LockedPalette {
    colors: Vec<String>,
    rgb: Vec<Rgb>,
}

impl LockedPalette {
    /// Build a palette from hex strings: normalizes entries, drops
    /// duplicates (keeping first occurrence), rejects empty input.
    pub fn new<I, S>(colors: I) -> Result<Self, ColorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        let mut rgb = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for entry in colors {
            let triple = color::parse_hex(entry.as_ref())?;
            let hex = color::format_hex(triple.0, triple.1, triple.2);
            if seen.insert(hex.clone()) {
                normalized.push(hex);
                rgb.push(triple);
            }
        }
        if normalized.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        Ok(LockedPalette { colors: normalized, rgb })
    }

    /// The normalized hex entries, in locked order.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        // Construction rejects empty palettes, so this is always false.
        self.colors.is_empty()
    }

    pub fn contains(&self, hex: &str) -> bool {
        self.colors.iter().any(|c| c == hex)
    }

    /// Nearest palette entry to an RGB triple, ties to the earliest entry.
    pub fn snap_rgb(&self, rgb: Rgb) -> &str {
        // Non-empty by construction, so nearest cannot fail.
        let idx = color::nearest(rgb, &self.rgb).unwrap_or(0);
        &self.colors[idx]
    }

    /// Snap a cell onto the palette; transparent passes through verbatim.
    pub fn snap_cell(&self, cell: &Cell) -> Cell {
        match cell.rgb() {
            Some(rgb) => Cell::Color(self.snap_rgb(rgb).to_string()),
            None => Cell::Transparent,
        }
    }
}

impl TryFrom<Vec<String>> for LockedPalette {
    type Error = ColorError;

    fn try_from(colors: Vec<String>) -> Result<Self, ColorError> {
        LockedPalette::new(colors)
    }
}

impl From<LockedPalette> for Vec<String> {
    fn from(palette: LockedPalette) -> Vec<String> {
        palette.colors
    }
}

/// A transient user selection scoping a localized edit: a square region
/// centered on a cell. Consumed immediately by region extraction, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: u32,
    pub y: u32,
    /// Selection radius in cells, at least 1.
    pub radius: u32,
}

impl Hotspot {
    pub fn new(x: u32, y: u32, radius: u32) -> Self {
        Hotspot { x, y, radius: radius.max(1) }
    }
}
