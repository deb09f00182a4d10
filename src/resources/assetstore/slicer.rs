//! Tilemap slicer.
//!
//! Cuts a source image into a dense, row-major grid of square sub-images.
//! Remainder pixels on the right and bottom edges are dropped.

use image::RgbaImage;
use image::imageops;
use raylib::prelude::Rectangle;

/// One cut tile: where it came from in the source and its own pixels.
#[derive(Debug, Clone)]
pub struct SlicedTile {
    pub region: Rectangle,
    pub image: RgbaImage,
}

/// Result of slicing a source image.
#[derive(Debug, Clone, Default)]
pub struct SliceGrid {
    pub tile_count_x: u32,
    pub tile_count_y: u32,
    /// Row-major: tile `(x, y)` is at `y * tile_count_x + x`.
    pub tiles: Vec<SlicedTile>,
}

impl SliceGrid {
    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }
}

/// Slice `image` into `tile_size` x `tile_size` tiles.
///
/// A `tile_size` of zero yields an empty grid.
pub fn slice(image: &RgbaImage, tile_size: u32) -> SliceGrid {
    if tile_size == 0 {
        return SliceGrid::default();
    }
    let tile_count_x = image.width() / tile_size;
    let tile_count_y = image.height() / tile_size;

    let mut tiles = Vec::with_capacity((tile_count_x * tile_count_y) as usize);
    for y in 0..tile_count_y {
        for x in 0..tile_count_x {
            let px = x * tile_size;
            let py = y * tile_size;
            let sub = imageops::crop_imm(image, px, py, tile_size, tile_size).to_image();
            tiles.push(SlicedTile {
                region: Rectangle::new(px as f32, py as f32, tile_size as f32, tile_size as f32),
                image: sub,
            });
        }
    }

    SliceGrid {
        tile_count_x,
        tile_count_y,
        tiles,
    }
}
