//! The reconstruction pipeline: raw model raster in, canonical sprite out.
//!
//! Wires the stages in order: center-point sampling, checkerboard
//! placeholder scrub, dual-check white matting, then palette snapping into
//! `SpriteData`. Each stage is pure and synchronous; the whole pipeline is
//! a CPU-bound per-pixel pass a caller may run on a worker thread, but it
//! has no internal concurrency or cancellation.

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::matte::{self, CheckerboardConfig, MatteConfig, MatteError, SubjectMask};
use crate::models::{Cell, Direction, LockedPalette, SpriteData, SpriteError};
use crate::sampler::{sample_grid, SampleError};
use crate::transform;

/// Error type for the reconstruction pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructError {
    #[error("sampling failed: {0}")]
    Sample(#[from] SampleError),
    #[error("matting failed: {0}")]
    Matte(#[from] MatteError),
    #[error("sprite assembly failed: {0}")]
    Sprite(#[from] SpriteError),
}

/// Knobs for one reconstruction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructOptions {
    /// Side length of the target sprite grid.
    pub target_size: u32,
    pub matte: MatteConfig,
    pub checkerboard: CheckerboardConfig,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        ReconstructOptions {
            target_size: 64,
            matte: MatteConfig::default(),
            checkerboard: CheckerboardConfig::default(),
        }
    }
}

/// Turn a raw generated raster into a clean, grid-exact, palette-locked
/// sprite for the given directional view.
///
/// Cells whose alpha ends up zero (already transparent in the source, or
/// removed by checkerboard/white matting) become `Cell::Transparent`;
/// every other cell snaps to the nearest locked-palette color.
pub fn reconstruct(
    src: &RgbaImage,
    palette: &LockedPalette,
    mask: Option<&SubjectMask>,
    direction: Direction,
    options: &ReconstructOptions,
) -> Result<SpriteData, ReconstructError> {
    let mut grid = sample_grid(src, options.target_size)?;
    matte::scrub_checkerboard(&mut grid, &options.checkerboard);
    matte::remove_background(&mut grid, mask, &options.matte)?;

    let pixels = grid
        .pixels
        .iter()
        .map(|&Rgba([r, g, b, a])| {
            if a == 0 {
                Cell::Transparent
            } else {
                Cell::Color(palette.snap_rgb((r, g, b)).to_string())
            }
        })
        .collect();

    Ok(SpriteData::new(grid.size, grid.size, pixels, direction)?)
}

/// Derive the mirrored directional view (e.g. W from E) without another
/// model invocation. Valid for bilaterally symmetric characters.
pub fn derive_mirrored(sprite: &SpriteData) -> SpriteData {
    transform::flip_horizontal(sprite, sprite.direction.mirrored())
}
