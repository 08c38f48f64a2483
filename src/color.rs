//! Hex color parsing, formatting, and nearest-palette-color lookup.
//!
//! Sprite cells live in a hex-or-transparent domain; this module owns the
//! hex side of it. Supported parse forms: `RGB`, `RGBA`, `RRGGBB`,
//! `RRGGBBAA`, each with or without a leading `#`. Alpha digits are
//! accepted and discarded - transparency is represented by the cell
//! sentinel, never by an alpha channel.

use thiserror::Error;

/// An 8-bit RGB triple.
pub type Rgb = (u8, u8, u8);

/// Error type for color parsing and palette lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty.
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after the optional #).
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters.
    #[error("invalid hex character '{0}'")]
    InvalidDigit(char),
    /// Nearest-color lookup attempted against zero colors.
    #[error("nearest-color lookup against an empty palette")]
    EmptyPalette,
}

/// Format an 8-bit RGB triple as uppercase `#RRGGBB`.
pub fn format_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Parse a hex color string into an 8-bit RGB triple.
///
/// Shorthand 3/4-digit forms expand by digit duplication (`#F00` -> red);
/// 4/8-digit forms carry an alpha channel which is dropped.
pub fn parse_hex(s: &str) -> Result<Rgb, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.is_empty() {
        return Err(ColorError::Empty);
    }

    for c in hex.chars() {
        if !c.is_ascii_hexdigit() {
            return Err(ColorError::InvalidDigit(c));
        }
    }

    match hex.len() {
        3 | 4 => {
            // Shorthand: each digit doubled. The 4th digit, if present, is alpha.
            let digits: Vec<char> = hex.chars().collect();
            let r = parse_hex_digit(digits[0])? * 17;
            let g = parse_hex_digit(digits[1])? * 17;
            let b = parse_hex_digit(digits[2])? * 17;
            Ok((r, g, b))
        }
        6 | 8 => {
            let r = parse_hex_pair(&hex[0..2])?;
            let g = parse_hex_pair(&hex[2..4])?;
            let b = parse_hex_pair(&hex[4..6])?;
            Ok((r, g, b))
        }
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Parse a hex string and re-format it as canonical uppercase `#RRGGBB`.
pub fn normalize_hex(s: &str) -> Result<String, ColorError> {
    let (r, g, b) = parse_hex(s)?;
    Ok(format_hex(r, g, b))
}

/// Squared Euclidean distance between two RGB triples.
pub fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Index of the candidate minimizing squared RGB distance to `color`.
///
/// Ties break toward the first occurrence in candidate order, so a locked
/// palette's ordering is part of the snapping contract. Fails with
/// [`ColorError::EmptyPalette`] on zero candidates rather than silently
/// substituting a default color.
pub fn nearest(color: Rgb, candidates: &[Rgb]) -> Result<usize, ColorError> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &candidate) in candidates.iter().enumerate() {
        let d = distance_sq(color, candidate);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i).ok_or(ColorError::EmptyPalette)
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15).
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidDigit(c)),
    }
}

/// Parse a two-character hex string to u8 (0-255).
fn parse_hex_pair(s: &str) -> Result<u8, ColorError> {
    let mut chars = s.chars();
    let high = parse_hex_digit(chars.next().unwrap_or('!'))?;
    let low = parse_hex_digit(chars.next().unwrap_or('!'))?;
    Ok(high * 16 + low)
}
