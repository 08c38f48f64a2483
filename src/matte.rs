//! Background classification: near-white matting and checkerboard
//! placeholder removal.
//!
//! The image model never emits true transparency. Backgrounds arrive as
//! solid white, near-white halos, or a checkerboard placeholder pattern,
//! and this module converts those cells to transparency (alpha 0) on the
//! sampled grid. Two independent signals drive white removal: a tight
//! color-distance test against pure white, and an optional subject
//! probability mask. Color alone cannot tell a white background from a
//! white highlight inside the subject, and the mask alone is too coarse at
//! single-pixel granularity, so when both are present a cell is removed
//! only when both agree.
//!
//! Checkerboard detection is a heuristic over a configurable color table;
//! ambiguous cases resolve to "not detected" because erasing subject
//! content is a worse outcome than leaving placeholder artifacts.

use std::collections::{HashMap, HashSet};

use image::Rgba;
use thiserror::Error;

use crate::color::{distance_sq, Rgb};
use crate::sampler::SampledGrid;

/// Error type for matting inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatteError {
    /// Subject mask cell count disagrees with the grid.
    #[error("subject mask has {actual} entries, expected {expected}")]
    MaskSizeMismatch { expected: usize, actual: usize },
}

/// Thresholds for near-white background removal.
///
/// Empirically chosen; kept as named, overridable configuration rather
/// than inlined constants.
#[derive(Debug, Clone, PartialEq)]
pub struct MatteConfig {
    /// Maximum Euclidean RGB distance from pure white for a cell to count
    /// as white background. The default sits below the distance of
    /// `#FEFEFE` (~1.73), so that deliberate near-white highlight color is
    /// never matted out.
    pub white_distance_max: f64,
    /// Confidence at or above this value (8-bit range) marks a mask cell
    /// as subject.
    pub mask_confidence_min: u8,
}

impl Default for MatteConfig {
    fn default() -> Self {
        MatteConfig { white_distance_max: 1.5, mask_confidence_min: 128 }
    }
}

/// A per-cell boolean subject map derived from an external segmentation
/// collaborator's confidence raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectMask {
    size: u32,
    subject: Vec<bool>,
}

impl SubjectMask {
    /// Threshold an 8-bit confidence map into a subject mask.
    ///
    /// `values` must hold exactly `size * size` entries in the same
    /// row-major convention as the sampled grid.
    pub fn from_confidence(
        values: &[u8],
        size: u32,
        confidence_min: u8,
    ) -> Result<Self, MatteError> {
        let expected = (size as usize) * (size as usize);
        if values.len() != expected {
            return Err(MatteError::MaskSizeMismatch { expected, actual: values.len() });
        }
        let subject = values.iter().map(|&v| v >= confidence_min).collect();
        Ok(SubjectMask { size, subject })
    }

    pub fn is_subject(&self, x: u32, y: u32) -> bool {
        self.subject[(y as usize) * (self.size as usize) + (x as usize)]
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

/// Zero the alpha of white-background cells.
///
/// A cell is removed only when the near-white test passes AND the mask
/// (when supplied) says not-subject; without a mask the color test alone
/// decides.
pub fn remove_background(
    grid: &mut SampledGrid,
    mask: Option<&SubjectMask>,
    cfg: &MatteConfig,
) -> Result<(), MatteError> {
    if let Some(m) = mask {
        let expected = (grid.size as usize) * (grid.size as usize);
        if m.subject.len() != expected {
            return Err(MatteError::MaskSizeMismatch { expected, actual: m.subject.len() });
        }
    }

    let white: Rgb = (255, 255, 255);
    let max_sq = cfg.white_distance_max * cfg.white_distance_max;

    for y in 0..grid.size {
        for x in 0..grid.size {
            let idx = grid.idx(x, y);
            let Rgba([r, g, b, a]) = grid.pixels[idx];
            if a == 0 {
                continue;
            }
            let near_white = (distance_sq((r, g, b), white) as f64) < max_sq;
            let masked_out = mask.map_or(true, |m| !m.is_subject(x, y));
            if near_white && masked_out {
                grid.pixels[idx] = Rgba([r, g, b, 0]);
            }
        }
    }
    Ok(())
}

/// Thresholds and the placeholder color table for checkerboard detection.
///
/// The color table is a heuristic list of checker colors observed in model
/// output (pinks and grays), not a closed-form rule; it is configurable
/// and should not be assumed exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerboardConfig {
    /// Corner sample block size as a fraction of the grid size.
    pub corner_fraction: f64,
    /// Minimum corner block size in cells.
    pub min_band: u32,
    /// Thickness of the top/bottom edge sample strips in cells.
    pub strip_rows: u32,
    /// Match fraction that flags a checkerboard on small grids. Small
    /// sprites have less safe sampling area, so the bar is lower.
    pub match_fraction_small: f64,
    /// Match fraction that flags a checkerboard on larger grids.
    pub match_fraction_large: f64,
    /// Grid size at or below which the small-sprite threshold applies.
    pub small_size_max: u32,
    /// Maximum Euclidean RGB distance for a cell to match a placeholder color.
    pub color_tolerance: f64,
    /// Known placeholder checker colors.
    pub placeholder_colors: Vec<Rgb>,
    /// How many dominant background colors to carry into removal (1-3).
    pub max_dominant: usize,
}

impl Default for CheckerboardConfig {
    fn default() -> Self {
        CheckerboardConfig {
            corner_fraction: 0.125,
            min_band: 4,
            strip_rows: 2,
            match_fraction_small: 0.45,
            match_fraction_large: 0.6,
            small_size_max: 64,
            color_tolerance: 32.0,
            placeholder_colors: vec![
                // Pinks seen in placeholder checkers
                (255, 0, 255),
                (255, 192, 203),
                (255, 174, 201),
                (244, 194, 254),
                // Grays of the classic transparency checker. Pure and
                // near white stay out of this table: solid white is the
                // matte's job, and listing it here would route white
                // backgrounds around the subject-mask conjunction.
                (204, 204, 204),
                (192, 192, 192),
                (153, 153, 153),
            ],
            max_dominant: 3,
        }
    }
}

impl CheckerboardConfig {
    fn matches_placeholder(&self, rgb: Rgb) -> bool {
        let tol_sq = self.color_tolerance * self.color_tolerance;
        self.placeholder_colors.iter().any(|&p| (distance_sq(rgb, p) as f64) <= tol_sq)
    }
}

/// Sample the border region and decide whether the grid carries a
/// checkerboard placeholder background.
///
/// Returns the dominant matched background colors (most frequent first,
/// at most `max_dominant`) when flagged, or `None` when detection is
/// ambiguous or negative. Borderline match fractions deliberately resolve
/// to `None`.
pub fn detect_checkerboard(grid: &SampledGrid, cfg: &CheckerboardConfig) -> Option<Vec<Rgb>> {
    let size = grid.size;
    if size == 0 {
        return None;
    }

    let corner = ((size as f64 * cfg.corner_fraction) as u32).max(cfg.min_band).min(size);
    let strip = cfg.strip_rows.min(size);

    let mut coords: HashSet<(u32, u32)> = HashSet::new();
    for dy in 0..corner {
        for dx in 0..corner {
            coords.insert((dx, dy));
            coords.insert((size - 1 - dx, dy));
            coords.insert((dx, size - 1 - dy));
            coords.insert((size - 1 - dx, size - 1 - dy));
        }
    }
    for y in 0..strip {
        for x in 0..size {
            coords.insert((x, y));
            coords.insert((x, size - 1 - y));
        }
    }

    let mut matched: HashMap<Rgb, usize> = HashMap::new();
    let mut match_count = 0usize;
    for &(x, y) in &coords {
        let Rgba([r, g, b, a]) = grid.get(x, y);
        if a == 0 {
            continue;
        }
        if cfg.matches_placeholder((r, g, b)) {
            match_count += 1;
            *matched.entry((r, g, b)).or_insert(0) += 1;
        }
    }

    if coords.is_empty() {
        return None;
    }
    let fraction = match_count as f64 / coords.len() as f64;
    let threshold =
        if size <= cfg.small_size_max { cfg.match_fraction_small } else { cfg.match_fraction_large };
    if fraction <= threshold {
        return None;
    }

    let mut by_count: Vec<(Rgb, usize)> = matched.into_iter().collect();
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    by_count.truncate(cfg.max_dominant.max(1));
    Some(by_count.into_iter().map(|(rgb, _)| rgb).collect())
}

/// Zero the alpha of every cell image-wide matching the dominant background
/// colors or the placeholder table within tolerance.
pub fn remove_checkerboard(grid: &mut SampledGrid, dominant: &[Rgb], cfg: &CheckerboardConfig) {
    let tol_sq = cfg.color_tolerance * cfg.color_tolerance;
    for pixel in &mut grid.pixels {
        let Rgba([r, g, b, a]) = *pixel;
        if a == 0 {
            continue;
        }
        let rgb = (r, g, b);
        let hits_dominant = dominant.iter().any(|&d| (distance_sq(rgb, d) as f64) <= tol_sq);
        if hits_dominant || cfg.matches_placeholder(rgb) {
            *pixel = Rgba([r, g, b, 0]);
        }
    }
}

/// Detect-and-remove convenience wrapper. Returns whether a checkerboard
/// was found; on `false` the grid is untouched.
pub fn scrub_checkerboard(grid: &mut SampledGrid, cfg: &CheckerboardConfig) -> bool {
    match detect_checkerboard(grid, cfg) {
        Some(dominant) => {
            remove_checkerboard(grid, &dominant, cfg);
            true
        }
        None => false,
    }
}
