//! resprite - pixel-art sprite reconstruction and editing.
//!
//! Turns the raw, imprecise rasters a generative image model produces into
//! clean, grid-exact, palette-constrained sprites, and provides the
//! editing operations (draw, erase, flood fill, localized region edits,
//! resize, mirror) that mutate them while preserving their invariants:
//! - Parse and snap colors against a locked palette
//! - Downsample arbitrary-resolution rasters by center-point sampling
//! - Matte out white and checkerboard placeholder backgrounds
//! - Validate and merge externally edited sprite regions

pub mod color;
pub mod matte;
pub mod models;
pub mod pipeline;
pub mod region;
pub mod sampler;
pub mod transform;
