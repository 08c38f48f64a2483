//! Center-point downsampling of an arbitrary-resolution raster to an
//! exact N x N cell grid.
//!
//! Generated rasters draw their "virtual pixels" as large blocks with
//! anti-aliased blending at block boundaries. Blending never reaches a
//! block's center, so sampling the single source pixel at the center of
//! each target cell's source region is immune to edge blending as long as
//! the source's true pixel grid is no finer than the target grid. No
//! averaging or voting across neighbors is performed.

use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Error type for grid sampling failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// Target grid size must be a positive integer.
    #[error("target grid size must be positive")]
    InvalidTargetSize,
    /// Source image has a zero dimension.
    #[error("source image has zero dimension ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
}

/// A dense square grid of RGBA samples, row-major, one per target cell.
///
/// Intermediate representation between the raw raster and `SpriteData`:
/// background matting zeroes alpha here before cells are classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledGrid {
    pub size: u32,
    /// Row-major samples, length `size * size`.
    pub pixels: Vec<Rgba<u8>>,
}

impl SampledGrid {
    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.size as usize) + (x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba<u8> {
        self.pixels[self.idx(x, y)]
    }
}

/// Downsample `src` to exactly `target_size x target_size` cells by
/// center-point sampling.
///
/// For each target cell `(x, y)` the single source pixel at
/// `floor(x * step + step / 2)` per axis is taken, clamped to source
/// bounds, where `step = src_dim / target_size`. A source smaller than the
/// target duplicates pixels rather than introducing upscaling blur.
pub fn sample_grid(src: &RgbaImage, target_size: u32) -> Result<SampledGrid, SampleError> {
    if target_size == 0 {
        return Err(SampleError::InvalidTargetSize);
    }
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(SampleError::EmptySource { width: src_w, height: src_h });
    }

    let step_x = src_w as f64 / target_size as f64;
    let step_y = src_h as f64 / target_size as f64;

    let mut pixels = Vec::with_capacity((target_size as usize) * (target_size as usize));
    for y in 0..target_size {
        let sy = ((y as f64 * step_y + step_y / 2.0).floor() as u32).min(src_h - 1);
        for x in 0..target_size {
            let sx = ((x as f64 * step_x + step_x / 2.0).floor() as u32).min(src_w - 1);
            pixels.push(*src.get_pixel(sx, sy));
        }
    }

    Ok(SampledGrid { size: target_size, pixels })
}
