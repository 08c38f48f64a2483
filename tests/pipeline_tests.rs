//! Integration tests for the full reconstruction and editing flow.
//!
//! Builds synthetic model rasters the way the remote collaborator would
//! hand them over (white or checkerboard placeholder backgrounds,
//! anti-aliased block edges, off-palette colors) and checks the pipeline
//! output pixel by pixel, then runs editing operations on the result.

use image::{Rgba, RgbaImage};
use resprite::matte::SubjectMask;
use resprite::models::{Cell, Direction, Hotspot, LockedPalette, SpriteData};
use resprite::pipeline::{derive_mirrored, reconstruct, ReconstructOptions};
use resprite::region::{extract_region, flood_fill, merge_region, EditRequest};
use resprite::transform::{resize, snap_to_palette, ResizeMode};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn palette() -> LockedPalette {
    LockedPalette::new(["#1A1C2C", "#EF7D57", "#FFCD75", "#38B764"]).unwrap()
}

/// A 128x128 "model output": white background, an orange body block with
/// anti-aliased edges, and a slightly off-palette yellow head block.
fn synthetic_raster() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(128, 128, WHITE);

    // Head: roughly #FFCD75 but drifted, cells (3..5, 1..3) at 16px scale.
    for y in 16..48 {
        for x in 48..80 {
            img.put_pixel(x, y, Rgba([253, 201, 119, 255]));
        }
    }
    // Body: roughly #EF7D57 drifted, cells (2..6, 3..7).
    for y in 48..112 {
        for x in 32..96 {
            img.put_pixel(x, y, Rgba([240, 125, 90, 255]));
        }
    }
    // Anti-aliased halo one source pixel wide above and below the body.
    for x in 31..97 {
        img.put_pixel(x, 47, Rgba([250, 220, 210, 255]));
        img.put_pixel(x, 113, Rgba([250, 220, 210, 255]));
    }
    img
}

#[test]
fn reconstruct_produces_clean_palette_locked_sprite() {
    let options = ReconstructOptions { target_size: 8, ..Default::default() };
    let sprite = reconstruct(&synthetic_raster(), &palette(), None, Direction::S, &options)
        .unwrap();

    sprite.validate().unwrap();
    assert_eq!(sprite.pixels.len(), 64);

    // Background matted out.
    assert_eq!(sprite.pixels[sprite.idx(0, 0)], Cell::Transparent);
    assert_eq!(sprite.pixels[sprite.idx(7, 7)], Cell::Transparent);

    // Head and body snapped onto locked colors, drift gone.
    assert_eq!(sprite.pixels[sprite.idx(3, 1)], Cell::Color("#FFCD75".to_string()));
    assert_eq!(sprite.pixels[sprite.idx(4, 5)], Cell::Color("#EF7D57".to_string()));

    // Every surviving color is a locked palette entry.
    let locked = palette();
    for hex in sprite.palette() {
        assert!(locked.contains(&hex), "off-palette color {hex} survived");
    }
}

#[test]
fn reconstruct_ignores_antialiased_block_seams() {
    // The halo rows sit on block boundaries; center-point sampling at 16px
    // steps never lands on them, so the output is identical to a raster
    // rendered with no anti-aliasing at all.
    let clean = {
        let mut img = synthetic_raster();
        for x in 31..97 {
            img.put_pixel(x, 47, WHITE);
            img.put_pixel(x, 113, WHITE);
        }
        img
    };
    let options = ReconstructOptions { target_size: 8, ..Default::default() };
    let with_halo = reconstruct(&synthetic_raster(), &palette(), None, Direction::S, &options)
        .unwrap();
    let without_halo = reconstruct(&clean, &palette(), None, Direction::S, &options).unwrap();
    assert_eq!(with_halo, without_halo);
}

#[test]
fn subject_mask_preserves_white_detail() {
    // Paint a white detail inside the body and mark it subject.
    let mut img = synthetic_raster();
    for y in 64..80 {
        for x in 48..64 {
            img.put_pixel(x, y, WHITE);
        }
    }
    let mut confidence = vec![0u8; 64];
    confidence[4 * 8 + 3] = 255; // grid cell (3, 4)
    let mask = SubjectMask::from_confidence(&confidence, 8, 128).unwrap();

    let white_palette = LockedPalette::new(["#FFFFFF", "#EF7D57", "#FFCD75"]).unwrap();
    let options = ReconstructOptions { target_size: 8, ..Default::default() };
    let sprite =
        reconstruct(&img, &white_palette, Some(&mask), Direction::S, &options).unwrap();

    // The masked white cell survives; background white does not.
    assert_eq!(sprite.pixels[sprite.idx(3, 4)], Cell::Color("#FFFFFF".to_string()));
    assert_eq!(sprite.pixels[sprite.idx(0, 0)], Cell::Transparent);
}

#[test]
fn checkerboard_placeholder_background_is_scrubbed() {
    // Pink/gray checker background, solid green subject square.
    let mut img = RgbaImage::new(64, 64);
    for y in 0..64 {
        for x in 0..64 {
            let color = if x >= 24 && x < 40 && y >= 24 && y < 40 {
                Rgba([56, 183, 100, 255])
            } else if (x / 8 + y / 8) % 2 == 0 {
                Rgba([255, 192, 203, 255])
            } else {
                Rgba([204, 204, 204, 255])
            };
            img.put_pixel(x, y, color);
        }
    }

    let options = ReconstructOptions { target_size: 16, ..Default::default() };
    let sprite = reconstruct(&img, &palette(), None, Direction::S, &options).unwrap();

    assert_eq!(sprite.pixels[sprite.idx(0, 0)], Cell::Transparent);
    assert_eq!(sprite.pixels[sprite.idx(15, 15)], Cell::Transparent);
    assert_eq!(sprite.pixels[sprite.idx(8, 8)], Cell::Color("#38B764".to_string()));
}

#[test]
fn edit_cycle_extract_merge_fill_resize() {
    let options = ReconstructOptions { target_size: 8, ..Default::default() };
    let locked = palette();
    let sprite =
        reconstruct(&synthetic_raster(), &locked, None, Direction::S, &options).unwrap();

    // Localized edit round trip over the head area.
    let hotspot = Hotspot::new(3, 1, 2);
    let (request, bounds) = EditRequest::from_hotspot(&sprite, &hotspot, "darken the hair", &locked);
    assert_eq!(request.pixels.len(), bounds.area());

    // Simulated collaborator response: darkens everything, slightly off-palette.
    let response: Vec<Cell> =
        vec![Cell::Color("#1B1D2E".to_string()); bounds.area()];
    let edited = merge_region(&sprite, &bounds, &response, &locked).unwrap();
    assert_eq!(edited.pixels[edited.idx(3, 1)], Cell::Color("#1A1C2C".to_string()));
    // Untouched cells identical to the source snapshot.
    assert_eq!(edited.pixels[edited.idx(4, 5)], sprite.pixels[sprite.idx(4, 5)]);

    // Flood fill the body region.
    let mut filled = edited.clone();
    flood_fill(&mut filled, 4, 5, Cell::Color("#38B764".to_string())).unwrap();
    assert_eq!(filled.pixels[filled.idx(4, 5)], Cell::Color("#38B764".to_string()));

    // Resize keeps the invariant.
    let padded = resize(&filled, 12, ResizeMode::CropPad);
    padded.validate().unwrap();
    assert_eq!(padded.pixels.len(), 144);

    let scaled = resize(&filled, 16, ResizeMode::Scale);
    scaled.validate().unwrap();
    assert_eq!(scaled.pixels.len(), 256);
}

#[test]
fn mirrored_view_round_trips_through_persistence() {
    let options = ReconstructOptions { target_size: 8, ..Default::default() };
    let east = reconstruct(&synthetic_raster(), &palette(), None, Direction::E, &options)
        .unwrap();
    let west = derive_mirrored(&east);
    assert_eq!(west.direction, Direction::W);

    let json = serde_json::to_string(&west).unwrap();
    let restored: SpriteData = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, west);
    assert_eq!(derive_mirrored(&restored).pixels, east.pixels);
}

#[test]
fn snap_is_stable_across_repeated_passes() {
    let options = ReconstructOptions { target_size: 8, ..Default::default() };
    let locked = palette();
    let sprite =
        reconstruct(&synthetic_raster(), &locked, None, Direction::S, &options).unwrap();
    let once = snap_to_palette(&sprite, &locked);
    assert_eq!(once, sprite); // reconstruct already snapped
    assert_eq!(snap_to_palette(&once, &locked), once);
}

#[test]
fn hotspot_extraction_matches_merge_expectations() {
    let options = ReconstructOptions { target_size: 8, ..Default::default() };
    let locked = palette();
    let sprite =
        reconstruct(&synthetic_raster(), &locked, None, Direction::S, &options).unwrap();

    let (bounds, cells) = extract_region(&sprite, &Hotspot::new(7, 7, 6));
    // Clamped at the corner; merging back the extracted cells is a no-op.
    let merged = merge_region(&sprite, &bounds, &cells, &locked).unwrap();
    assert_eq!(merged, sprite);
}
