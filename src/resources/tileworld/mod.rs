//! Tile world resource.
//!
//! The editable grid of placed content. Every cell owns a [`TileStack`] of
//! encoded tile indices (see [`crate::resources::assetstore::TileRef`]) with a
//! collidable flag per entry. The grid is larger than the screen; a scroll
//! offset in whole cells selects the visible page.
//!
//! Cells live in world space: cell `(x, y)` covers
//! `[x * tile_size, (x + 1) * tile_size)` horizontally and likewise vertically.
//!
//! The grid is persisted with [`TileWorld::save`] / [`TileWorld::load`] in the
//! big-endian format described in [`format`].

pub mod format;
pub mod stack;

use std::fs;
use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use log::{debug, info, warn};
use raylib::prelude::{Rectangle, Vector2};

pub use format::{MAP_VERSION, MAX_MAP_DIMENSION, MapData, MapError};
pub use stack::{PlacedTile, TileStack};

use stack::fatal_alloc;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TileWorld {
    width: usize,
    height: usize,
    /// Row-major, `width * height` long.
    cells: Vec<TileStack>,
    tile_size: u32,
    view_tiles_x: usize,
    view_tiles_y: usize,
    scroll_x: usize,
    scroll_y: usize,
}

impl TileWorld {
    /// Create an empty `width` x `height` grid of `tile_size` pixel cells.
    pub fn new(width: usize, height: usize, tile_size: u32) -> Self {
        Self {
            width,
            height,
            cells: alloc_grid(width, height),
            tile_size: tile_size.max(1),
            view_tiles_x: width,
            view_tiles_y: height,
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    /// Replace the grid with an empty one of the new size.
    ///
    /// `viewport_width` / `viewport_height` are in pixels and set how many
    /// cells fit on screen. The scroll offset is reset.
    pub fn resize(&mut self, width: usize, height: usize, viewport_width: u32, viewport_height: u32) {
        let cells = alloc_grid(width, height);
        self.cells = cells;
        self.width = width;
        self.height = height;
        self.set_viewport(viewport_width, viewport_height);
        self.scroll_x = 0;
        self.scroll_y = 0;
        info!(
            "Tile world resized to {}x{} ({}x{} visible)",
            width, height, self.view_tiles_x, self.view_tiles_y
        );
    }

    pub fn set_viewport(&mut self, viewport_width: u32, viewport_height: u32) {
        self.view_tiles_x = (viewport_width / self.tile_size) as usize;
        self.view_tiles_y = (viewport_height / self.tile_size) as usize;
        self.clamp_scroll();
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Visible cell counts `(x, y)`.
    pub fn view_tiles(&self) -> (usize, usize) {
        (self.view_tiles_x, self.view_tiles_y)
    }

    /// Top-left visible cell.
    pub fn scroll(&self) -> (usize, usize) {
        (self.scroll_x, self.scroll_y)
    }

    /// Move the visible page by whole cells, clamped to the map.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        self.scroll_x = self.scroll_x.saturating_add_signed(dx as isize);
        self.scroll_y = self.scroll_y.saturating_add_signed(dy as isize);
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        self.scroll_x = self.scroll_x.min(self.width.saturating_sub(self.view_tiles_x));
        self.scroll_y = self.scroll_y.min(self.height.saturating_sub(self.view_tiles_y));
    }

    /// World-space offset of the visible page in pixels.
    pub fn scroll_pixels(&self) -> Vector2 {
        let size = self.tile_size as f32;
        Vector2::new(self.scroll_x as f32 * size, self.scroll_y as f32 * size)
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&TileStack> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    /// Cell containing a world-space point.
    pub fn cell_at(&self, point: Vector2) -> Option<(usize, usize)> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let x = (point.x / self.tile_size as f32) as usize;
        let y = (point.y / self.tile_size as f32) as usize;
        self.offset(x, y).map(|_| (x, y))
    }

    /// World-space bounds of cell `(x, y)`.
    pub fn cell_rect(&self, x: usize, y: usize) -> Rectangle {
        let size = self.tile_size as f32;
        Rectangle::new(x as f32 * size, y as f32 * size, size, size)
    }

    /// Push onto the stack at `(x, y)`. Returns `false` when out of bounds.
    pub fn push(&mut self, x: usize, y: usize, index: i32, collidable: bool) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.cells[i].push(PlacedTile::new(index, collidable));
                true
            }
            None => {
                debug!("Push outside the map at ({}, {})", x, y);
                false
            }
        }
    }

    /// Remove the top entry at `(x, y)`. Out of bounds or empty is a no-op.
    pub fn pop_top(&mut self, x: usize, y: usize) -> Option<PlacedTile> {
        let i = self.offset(x, y)?;
        self.cells[i].pop_top()
    }

    /// Empty every cell without changing the dimensions.
    pub fn clear(&mut self) {
        self.cells = alloc_grid(self.width, self.height);
    }

    /// True if `rect` overlaps any cell holding a collidable entry.
    ///
    /// Scans the whole grid; edges that only touch do not count.
    pub fn is_blocked(&self, rect: Rectangle) -> bool {
        let size = self.tile_size as f32;
        self.cells.iter().enumerate().any(|(i, cell)| {
            if !cell.has_collidable() {
                return false;
            }
            let cx = (i % self.width) as f32 * size;
            let cy = (i / self.width) as f32 * size;
            rect.x < cx + size
                && rect.x + rect.width > cx
                && rect.y < cy + size
                && rect.y + rect.height > cy
        })
    }

    /// Iterate `(x, y, stack)` over non-empty cells.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, &TileStack)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(move |(i, c)| (i % width, i / width, c))
    }

    /// Serialise the grid. Grids outside `1..=MAX_MAP_DIMENSION` on either
    /// axis have no file form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MapError> {
        format::encode(self.width, self.height, &self.cells)
    }

    /// Write the grid to `path`, replacing the file only once every byte is
    /// on disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let bytes = self
            .to_bytes()
            .inspect_err(|e| warn!("Cannot save {:?}: {}", path, e))?;
        format::write_atomic(path, &bytes)?;
        info!("Saved {}x{} map to {:?}", self.width, self.height, path);
        Ok(())
    }

    /// Replace the grid with the contents of `path`.
    ///
    /// The file is read and validated completely first; on any error the
    /// current grid is left as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = format::decode(&bytes).inspect_err(|e| warn!("Cannot load {:?}: {}", path, e))?;
        self.replace(map);
        info!("Loaded {}x{} map from {:?}", self.width, self.height, path);
        Ok(())
    }

    fn replace(&mut self, map: MapData) {
        self.width = map.width;
        self.height = map.height;
        self.cells = map.cells;
        self.clamp_scroll();
    }

    /// Load the first regular file of `dir` in name order.
    ///
    /// A missing or empty directory is not an error and returns `Ok(None)`.
    pub fn load_first_in_directory(
        &mut self,
        dir: impl AsRef<Path>,
    ) -> Result<Option<PathBuf>, MapError> {
        let dir = dir.as_ref();
        let Some(first) = first_file_in(dir)? else {
            debug!("No map files in {:?}", dir);
            return Ok(None);
        };
        self.load(&first)?;
        Ok(Some(first))
    }
}

fn first_file_in(dir: &Path) -> Result<Option<PathBuf>, MapError> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let io_err = |source| MapError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files.into_iter().next())
}

/// Fresh grid of empty stacks. Aborts if the allocation fails.
fn alloc_grid(width: usize, height: usize) -> Vec<TileStack> {
    let Some(count) = width.checked_mul(height) else {
        fatal_alloc("tile grid", usize::MAX);
    };
    let mut cells = Vec::new();
    if cells.try_reserve_exact(count).is_err() {
        fatal_alloc("tile grid", count);
    }
    cells.resize_with(count, TileStack::default);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> TileWorld {
        let mut world = TileWorld::new(4, 3, 64);
        world.push(0, 0, 1, false);
        world.push(0, 0, 2, true);
        world.push(3, 2, 1005, false);
        world
    }

    #[test]
    fn push_and_pop_by_coordinates() {
        let mut world = sample();
        assert_eq!(world.cell(0, 0).map(TileStack::count), Some(2));
        assert!(!world.push(4, 0, 1, false));
        assert_eq!(world.pop_top(0, 0), Some(PlacedTile::new(2, true)));
        assert_eq!(world.pop_top(1, 1), None);
        assert_eq!(world.pop_top(9, 9), None);
        assert_eq!(world.occupied().count(), 2);
    }

    #[test]
    fn resize_resets_every_cell() {
        let mut world = sample();
        world.resize(8, 8, 256, 128);
        assert_eq!((world.width(), world.height()), (8, 8));
        assert_eq!(world.view_tiles(), (4, 2));
        assert_eq!(world.occupied().count(), 0);
        assert!(world.cell(0, 0).is_some_and(|c| c.capacity() == 0));
    }

    #[test]
    fn blocked_only_by_collidable_cells() {
        let world = sample();
        assert!(world.is_blocked(Rectangle::new(10.0, 10.0, 5.0, 5.0)));
        // touching the right edge of cell (0, 0) is not an overlap
        assert!(!world.is_blocked(Rectangle::new(64.0, 0.0, 10.0, 10.0)));
        // cell (3, 2) holds only a non-collidable entry
        assert!(!world.is_blocked(Rectangle::new(200.0, 140.0, 10.0, 10.0)));
    }

    #[test]
    fn cell_lookup() {
        let world = sample();
        assert_eq!(world.cell_at(Vector2::new(65.0, 130.0)), Some((1, 2)));
        assert_eq!(world.cell_at(Vector2::new(-1.0, 0.0)), None);
        assert_eq!(world.cell_at(Vector2::new(256.0, 0.0)), None);
        let rect = world.cell_rect(2, 1);
        assert_eq!((rect.x, rect.y, rect.width), (128.0, 64.0, 64.0));
    }

    #[test]
    fn scroll_is_clamped() {
        let mut world = TileWorld::new(10, 10, 64);
        world.set_viewport(256, 256);
        world.scroll_by(100, 3);
        assert_eq!(world.scroll(), (6, 3));
        world.scroll_by(-50, -1);
        assert_eq!(world.scroll(), (0, 2));
        assert_eq!(world.scroll_pixels(), Vector2::new(0.0, 128.0));
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("maps").join("map.bin");
        let world = sample();
        world.save(&path).expect("save");
        assert!(!path.with_file_name("map.bin.tmp").exists());

        let mut loaded = TileWorld::new(1, 1, 64);
        loaded.load(&path).expect("load");
        assert_eq!((loaded.width(), loaded.height()), (4, 3));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(
                    loaded.cell(x, y).map(TileStack::entries),
                    world.cell(x, y).map(TileStack::entries)
                );
            }
        }
    }

    #[test]
    fn oversized_grid_is_not_saved() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("wide.bin");
        let mut world = TileWorld::new(5000, 1, 64);
        assert!(world.push(4999, 0, 7, true));
        assert!(matches!(
            world.save(&path),
            Err(MapError::InvalidDimensions {
                width: 5000,
                height: 1
            })
        ));
        assert!(!path.exists());

        let empty = TileWorld::new(0, 0, 64);
        assert!(matches!(
            empty.save(&path),
            Err(MapError::InvalidDimensions { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn failed_load_keeps_grid() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("bad.bin");
        let mut bytes = 99i32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        fs::write(&path, bytes).expect("write");

        let mut world = sample();
        let before = world.clone();
        let before_bytes = world.to_bytes().expect("bytes");
        assert!(matches!(
            world.load(&path),
            Err(MapError::UnsupportedVersion { found: 99 })
        ));
        assert_eq!(world, before);
        assert_eq!(world.to_bytes().expect("bytes"), before_bytes);

        assert!(matches!(
            world.load(temp.path().join("missing.bin")),
            Err(MapError::Io { .. })
        ));
        assert_eq!(world, before);
    }

    #[test]
    fn first_in_directory() {
        let temp = TempDir::new().expect("temp");
        let mut world = TileWorld::new(2, 2, 64);
        assert_eq!(
            world.load_first_in_directory(temp.path().join("nope")).expect("missing dir"),
            None
        );
        assert_eq!(world.load_first_in_directory(temp.path()).expect("empty dir"), None);

        let mut a = TileWorld::new(1, 1, 64);
        a.push(0, 0, 11, true);
        a.save(temp.path().join("a.bin")).expect("save a");
        TileWorld::new(5, 5, 64)
            .save(temp.path().join("b.bin"))
            .expect("save b");
        fs::create_dir(temp.path().join("0dir")).expect("mkdir");

        let loaded = world.load_first_in_directory(temp.path()).expect("load");
        assert_eq!(loaded, Some(temp.path().join("a.bin")));
        assert_eq!((world.width(), world.height()), (1, 1));
        assert_eq!(world.cell(0, 0).and_then(TileStack::top), Some(&PlacedTile::new(11, true)));
    }
}
