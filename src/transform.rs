//! Whole-sprite transforms: palette snapping, horizontal mirroring, and
//! canvas resizing.
//!
//! All functions are pure: they take a sprite by reference and return a
//! new one, leaving the input untouched. They are total over well-formed
//! `SpriteData` and preserve its length invariants by construction.

use crate::models::{Cell, Direction, LockedPalette, SpriteData};

/// How `resize` maps old cells onto the new canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Nearest-neighbor resampling; overall appearance is preserved but
    /// apparent pixel density changes.
    Scale,
    /// Keep the original cell size; center the old grid on the new canvas,
    /// cropping what falls outside and padding new border cells with
    /// transparency.
    CropPad,
}

/// Replace every non-transparent cell with its nearest locked-palette
/// color. Transparent cells pass through unchanged. Idempotent: snapping
/// an already-snapped sprite against the same palette is a no-op.
pub fn snap_to_palette(sprite: &SpriteData, palette: &LockedPalette) -> SpriteData {
    let mut out = sprite.clone();
    for cell in &mut out.pixels {
        *cell = palette.snap_cell(cell);
    }
    out
}

/// Mirror the sprite left-to-right and relabel it with `new_direction`.
///
/// Used to derive a mirrored view (e.g. W from E) for bilaterally
/// symmetric characters without another model invocation. The normal map,
/// when present, is mirrored positionally as well.
pub fn flip_horizontal(sprite: &SpriteData, new_direction: Direction) -> SpriteData {
    let flip = |cells: &[Cell]| -> Vec<Cell> {
        let w = sprite.width as usize;
        let mut out = Vec::with_capacity(cells.len());
        for row in cells.chunks(w) {
            out.extend(row.iter().rev().cloned());
        }
        out
    };

    SpriteData {
        width: sprite.width,
        height: sprite.height,
        pixels: flip(&sprite.pixels),
        normal_map: sprite.normal_map.as_deref().map(flip),
        direction: new_direction,
    }
}

/// Resize the sprite to a `new_size` square canvas.
///
/// A `new_size` equal to the current (square) size returns an equivalent
/// copy untouched. `new_size` is clamped to at least 1.
pub fn resize(sprite: &SpriteData, new_size: u32, mode: ResizeMode) -> SpriteData {
    let new_size = new_size.max(1);
    if new_size == sprite.width && new_size == sprite.height {
        return sprite.clone();
    }

    let map_cells = |cells: &[Cell]| -> Vec<Cell> {
        let n = new_size as usize;
        let mut out = Vec::with_capacity(n * n);
        match mode {
            ResizeMode::Scale => {
                for y in 0..new_size {
                    let sy = (y as u64 * sprite.height as u64 / new_size as u64) as u32;
                    for x in 0..new_size {
                        let sx = (x as u64 * sprite.width as u64 / new_size as u64) as u32;
                        out.push(cells[(sy as usize) * (sprite.width as usize) + sx as usize].clone());
                    }
                }
            }
            ResizeMode::CropPad => {
                // Centering offset per axis; floor division so odd
                // differences bias the same way in both directions.
                let off_x = (new_size as i64 - sprite.width as i64).div_euclid(2);
                let off_y = (new_size as i64 - sprite.height as i64).div_euclid(2);
                for y in 0..new_size as i64 {
                    let sy = y - off_y;
                    for x in 0..new_size as i64 {
                        let sx = x - off_x;
                        let in_bounds = sx >= 0
                            && sx < sprite.width as i64
                            && sy >= 0
                            && sy < sprite.height as i64;
                        if in_bounds {
                            out.push(
                                cells[(sy as usize) * (sprite.width as usize) + sx as usize]
                                    .clone(),
                            );
                        } else {
                            out.push(Cell::Transparent);
                        }
                    }
                }
            }
        }
        out
    };

    SpriteData {
        width: new_size,
        height: new_size,
        pixels: map_cells(&sprite.pixels),
        normal_map: sprite.normal_map.as_deref().map(map_cells),
        direction: sprite.direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(hex: &str) -> Cell {
        Cell::Color(hex.to_string())
    }

    fn sprite_2x2(cells: [&str; 4]) -> SpriteData {
        let pixels = cells
            .iter()
            .map(|&s| if s == "_" { Cell::Transparent } else { color(s) })
            .collect();
        SpriteData::new(2, 2, pixels, Direction::S).unwrap()
    }

    #[test]
    fn test_snap_maps_gray_to_nearer_pole() {
        let palette = LockedPalette::new(["#000000", "#FFFFFF"]).unwrap();
        let sprite = sprite_2x2(["#808080", "#101010", "_", "#808080"]);
        let snapped = snap_to_palette(&sprite, &palette);
        // 0x80 = 128 sits 1 unit closer to white than to black per channel.
        assert_eq!(snapped.pixels[0], color("#FFFFFF"));
        assert_eq!(snapped.pixels[1], color("#000000"));
        assert_eq!(snapped.pixels[2], Cell::Transparent);
        assert_eq!(snapped.pixels[3], color("#FFFFFF"));
    }

    #[test]
    fn test_snap_is_idempotent() {
        let palette = LockedPalette::new(["#112233", "#AABBCC", "#FF0000"]).unwrap();
        let sprite = sprite_2x2(["#123456", "#FE0101", "_", "#A0B0C0"]);
        let once = snap_to_palette(&sprite, &palette);
        let twice = snap_to_palette(&once, &palette);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_flip_reverses_columns() {
        let sprite = sprite_2x2(["#FF0000", "_", "#00FF00", "#0000FF"]);
        let flipped = flip_horizontal(&sprite, Direction::W);
        assert_eq!(flipped.direction, Direction::W);
        assert_eq!(flipped.pixels[0], Cell::Transparent);
        assert_eq!(flipped.pixels[1], color("#FF0000"));
        assert_eq!(flipped.pixels[2], color("#0000FF"));
        assert_eq!(flipped.pixels[3], color("#00FF00"));
    }

    #[test]
    fn test_flip_is_involution() {
        let sprite = sprite_2x2(["#FF0000", "_", "#00FF00", "#0000FF"]);
        let back = flip_horizontal(&flip_horizontal(&sprite, Direction::W), Direction::S);
        assert_eq!(back, sprite);
    }

    #[test]
    fn test_flip_mirrors_normal_map() {
        let sprite = sprite_2x2(["#FF0000", "_", "_", "_"])
            .with_normal_map(vec![
                color("#8080FF"),
                Cell::Transparent,
                Cell::Transparent,
                Cell::Transparent,
            ])
            .unwrap();
        let flipped = flip_horizontal(&sprite, Direction::W);
        let nm = flipped.normal_map.unwrap();
        assert_eq!(nm[0], Cell::Transparent);
        assert_eq!(nm[1], color("#8080FF"));
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let sprite = sprite_2x2(["#FF0000", "_", "#00FF00", "#0000FF"]);
        assert_eq!(resize(&sprite, 2, ResizeMode::Scale), sprite);
        assert_eq!(resize(&sprite, 2, ResizeMode::CropPad), sprite);
    }

    #[test]
    fn test_resize_scale_doubles() {
        let sprite = sprite_2x2(["#FF0000", "#00FF00", "#0000FF", "_"]);
        let scaled = resize(&sprite, 4, ResizeMode::Scale);
        assert_eq!(scaled.width, 4);
        assert_eq!(scaled.pixels.len(), 16);
        // Each source cell becomes a 2x2 block.
        assert_eq!(scaled.pixels[0], color("#FF0000"));
        assert_eq!(scaled.pixels[1], color("#FF0000"));
        assert_eq!(scaled.pixels[2], color("#00FF00"));
        assert_eq!(scaled.pixels[4], color("#FF0000"));
        assert_eq!(scaled.pixels[15], Cell::Transparent);
    }

    #[test]
    fn test_resize_crop_pad_centers() {
        let sprite = sprite_2x2(["#FF0000", "#00FF00", "#0000FF", "#FFFFFF"]);
        let padded = resize(&sprite, 4, ResizeMode::CropPad);
        // Offset floor((4-2)/2) = 1: old grid lands at (1,1)..(2,2).
        assert_eq!(padded.pixels[0], Cell::Transparent);
        assert_eq!(padded.pixels[4 + 1], color("#FF0000"));
        assert_eq!(padded.pixels[4 + 2], color("#00FF00"));
        assert_eq!(padded.pixels[2 * 4 + 1], color("#0000FF"));
        assert_eq!(padded.pixels[2 * 4 + 2], color("#FFFFFF"));
        assert_eq!(padded.pixels[15], Cell::Transparent);
    }

    #[test]
    fn test_resize_crop_drops_outside_cells() {
        let pixels = (0..16)
            .map(|i| color(&format!("#{:02X}{:02X}00", i * 16, i)))
            .collect::<Vec<_>>();
        let sprite = SpriteData::new(4, 4, pixels, Direction::S).unwrap();
        let cropped = resize(&sprite, 2, ResizeMode::CropPad);
        // Offset floor((2-4)/2) = -1: destination (0,0) reads source (1,1).
        assert_eq!(cropped.width, 2);
        assert_eq!(cropped.pixels[0], sprite.pixels[sprite.idx(1, 1)]);
        assert_eq!(cropped.pixels[1], sprite.pixels[sprite.idx(2, 1)]);
        assert_eq!(cropped.pixels[2], sprite.pixels[sprite.idx(1, 2)]);
        assert_eq!(cropped.pixels[3], sprite.pixels[sprite.idx(2, 2)]);
    }
}
