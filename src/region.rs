//! Interactive region editing: single-cell edits, flood fill, and the
//! hotspot extract/merge protocol for localized AI-assisted edits.
//!
//! The extract/merge pair brackets an external round trip: a square
//! sub-rectangle of the sprite is handed to the remote edit collaborator
//! together with the locked palette and a free-text instruction, and the
//! returned cells are validated and snapped before being written back.
//! This module defines the payload shapes on both sides of that boundary
//! but never performs the network call. `merge_region` must be applied to
//! the same sprite snapshot `extract_region` saw; staleness detection is
//! the caller's concern.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Cell, Hotspot, LockedPalette, SpriteData};

/// Error type for region edit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// Externally returned edit region has the wrong cell count. Fatal for
    /// that edit attempt; never silently truncated or padded.
    #[error("edit returned {actual} cells, expected {expected} for a {width}x{height} region")]
    SizeMismatch { width: u32, height: u32, expected: usize, actual: usize },
    /// Coordinates or bounds fall outside the sprite.
    #[error("coordinates ({x}, {y}) out of bounds for {width}x{height} sprite")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

/// Absolute axis-aligned bounds of a sprite sub-rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionBounds {
    pub fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// A direct editing operation on a sprite grid.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Paint a single cell.
    Set { x: u32, y: u32, cell: Cell },
    /// Clear a single cell to transparent.
    Erase { x: u32, y: u32 },
    /// Flood fill from a seed cell.
    Flood { x: u32, y: u32, cell: Cell },
}

/// Apply an edit operation in place. All-or-nothing: a failed bounds check
/// leaves the sprite untouched.
pub fn apply_edit(sprite: &mut SpriteData, op: &EditOp) -> Result<(), RegionError> {
    match op {
        EditOp::Set { x, y, cell } => {
            check_bounds(sprite, *x, *y)?;
            let idx = sprite.idx(*x, *y);
            sprite.pixels[idx] = cell.clone();
            Ok(())
        }
        EditOp::Erase { x, y } => {
            check_bounds(sprite, *x, *y)?;
            let idx = sprite.idx(*x, *y);
            sprite.pixels[idx] = Cell::Transparent;
            Ok(())
        }
        EditOp::Flood { x, y, cell } => flood_fill(sprite, *x, *y, cell.clone()),
    }
}

/// 4-connected flood fill from `(x, y)` with an explicit work queue.
///
/// Replaces every cell equal to the seed cell's value that is reachable
/// via up/down/left/right steps with `fill`. Filling with the value
/// already at the seed is a no-op. Iterative by design: an explicit queue
/// with fill-as-visited marking terminates in O(filled area) without
/// risking stack overflow on large contiguous regions.
pub fn flood_fill(sprite: &mut SpriteData, x: u32, y: u32, fill: Cell) -> Result<(), RegionError> {
    check_bounds(sprite, x, y)?;

    let seed_idx = sprite.idx(x, y);
    let original = sprite.pixels[seed_idx].clone();
    if original == fill {
        return Ok(());
    }

    let mut queue = VecDeque::new();
    queue.push_back((x, y));
    sprite.pixels[seed_idx] = fill.clone();

    while let Some((cx, cy)) = queue.pop_front() {
        let neighbors: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        for (dx, dy) in neighbors {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            if nx < 0 || ny < 0 || nx >= sprite.width as i64 || ny >= sprite.height as i64 {
                continue;
            }
            let (nx, ny) = (nx as u32, ny as u32);
            let idx = sprite.idx(nx, ny);
            if sprite.pixels[idx] == original {
                sprite.pixels[idx] = fill.clone();
                queue.push_back((nx, ny));
            }
        }
    }

    Ok(())
}

/// Cut the square sub-rectangle a hotspot selects, clamped to sprite
/// bounds.
///
/// The half-extent is `floor(radius / 2)` in each direction from the
/// hotspot center, so a radius-1 hotspot selects a single cell. Returns
/// the absolute bounds plus the region's cells in row-major order.
pub fn extract_region(sprite: &SpriteData, hotspot: &Hotspot) -> (RegionBounds, Vec<Cell>) {
    let half = hotspot.radius / 2;
    let cx = hotspot.x.min(sprite.width - 1);
    let cy = hotspot.y.min(sprite.height - 1);

    let x0 = cx.saturating_sub(half);
    let y0 = cy.saturating_sub(half);
    let x1 = (cx + half).min(sprite.width - 1);
    let y1 = (cy + half).min(sprite.height - 1);

    let bounds = RegionBounds { x: x0, y: y0, width: x1 - x0 + 1, height: y1 - y0 + 1 };
    let mut cells = Vec::with_capacity(bounds.area());
    for y in y0..=y1 {
        for x in x0..=x1 {
            cells.push(sprite.pixels[sprite.idx(x, y)].clone());
        }
    }
    (bounds, cells)
}

/// Write an externally edited region back into a copy of the sprite.
///
/// Every returned cell is forced onto the hex-or-transparent domain and
/// the locked palette (defense against the edit collaborator returning
/// off-palette or malformed values; anything unparseable becomes
/// transparent). Fails with [`RegionError::SizeMismatch`] when the cell
/// count disagrees with the bounds area, leaving the original sprite
/// untouched.
pub fn merge_region(
    sprite: &SpriteData,
    bounds: &RegionBounds,
    new_pixels: &[Cell],
    palette: &LockedPalette,
) -> Result<SpriteData, RegionError> {
    if new_pixels.len() != bounds.area() {
        return Err(RegionError::SizeMismatch {
            width: bounds.width,
            height: bounds.height,
            expected: bounds.area(),
            actual: new_pixels.len(),
        });
    }
    let x1 = bounds.x.saturating_add(bounds.width);
    let y1 = bounds.y.saturating_add(bounds.height);
    if x1 > sprite.width || y1 > sprite.height {
        return Err(RegionError::OutOfBounds {
            x: bounds.x,
            y: bounds.y,
            width: sprite.width,
            height: sprite.height,
        });
    }

    let mut out = sprite.clone();
    for ry in 0..bounds.height {
        for rx in 0..bounds.width {
            let cell = &new_pixels[(ry as usize) * (bounds.width as usize) + rx as usize];
            let idx = out.idx(bounds.x + rx, bounds.y + ry);
            out.pixels[idx] = palette.snap_cell(cell);
        }
    }
    Ok(out)
}

/// The payload handed to the external localized-edit collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// Region cells, hex-or-transparent, row-major.
    pub pixels: Vec<Cell>,
    pub width: u32,
    pub height: u32,
    /// Absolute position of the region's top-left cell in the sprite.
    pub x: u32,
    pub y: u32,
    /// Free-text instruction describing the desired edit.
    pub instruction: String,
    /// The locked palette the edit must conform to.
    pub palette: Vec<String>,
}

impl EditRequest {
    /// Build a request from a hotspot selection. Returns the bounds the
    /// caller needs to merge the response back.
    pub fn from_hotspot(
        sprite: &SpriteData,
        hotspot: &Hotspot,
        instruction: impl Into<String>,
        palette: &LockedPalette,
    ) -> (Self, RegionBounds) {
        let (bounds, pixels) = extract_region(sprite, hotspot);
        let request = EditRequest {
            pixels,
            width: bounds.width,
            height: bounds.height,
            x: bounds.x,
            y: bounds.y,
            instruction: instruction.into(),
            palette: palette.colors().to_vec(),
        };
        (request, bounds)
    }
}

/// The payload the external localized-edit collaborator returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditResponse {
    /// Exactly `width * height` cells, hex-or-transparent, row-major.
    pub pixels: Vec<Cell>,
}

fn check_bounds(sprite: &SpriteData, x: u32, y: u32) -> Result<(), RegionError> {
    if x >= sprite.width || y >= sprite.height {
        return Err(RegionError::OutOfBounds {
            x,
            y,
            width: sprite.width,
            height: sprite.height,
        });
    }
    Ok(())
}
