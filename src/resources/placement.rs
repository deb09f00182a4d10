//! Placement editor cursor.
//!
//! Tracks what the tile editor places next: a tilemap slot plus a tile,
//! sprite or animation inside it, and whether new entries block movement.
//! Cycling wraps around the relevant asset list of the [`AssetStore`].

use bevy_ecs::prelude::Resource;
use log::{debug, warn};

use crate::resources::assetstore::{AssetStore, TileRef};
use crate::resources::tileworld::{PlacedTile, TileWorld};

/// What the editor places, by index into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Tile(usize),
    Sprite(usize),
    Animation(usize),
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementCursor {
    /// Tilemap slot new entries are encoded under.
    pub tilemap: usize,
    pub selection: Selection,
    pub collidable: bool,
}

impl Default for PlacementCursor {
    fn default() -> Self {
        Self {
            tilemap: 0,
            selection: Selection::Tile(0),
            collidable: false,
        }
    }
}

/// Step `current` one place inside `0..len`, wrapping. A `None` start means the
/// selection was in another list: forward lands on 0, backward on the end.
fn cycle(current: Option<usize>, len: usize, forward: bool) -> usize {
    match (current, forward) {
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    }
}

impl PlacementCursor {
    pub fn next_tile(&mut self, store: &AssetStore) {
        self.step_tile(store, true);
    }

    pub fn previous_tile(&mut self, store: &AssetStore) {
        self.step_tile(store, false);
    }

    fn step_tile(&mut self, store: &AssetStore, forward: bool) {
        let total = store.tilemap_at(self.tilemap).map_or(0, |t| t.total_tiles());
        if total == 0 {
            debug!("Tilemap slot {} has no tiles", self.tilemap);
            return;
        }
        let current = match self.selection {
            Selection::Tile(i) if i < total => Some(i),
            _ => None,
        };
        self.selection = Selection::Tile(cycle(current, total, forward));
    }

    pub fn next_sprite(&mut self, store: &AssetStore) {
        self.step_sprite(store, true);
    }

    pub fn previous_sprite(&mut self, store: &AssetStore) {
        self.step_sprite(store, false);
    }

    fn step_sprite(&mut self, store: &AssetStore, forward: bool) {
        let count = store.sprite_count();
        if count == 0 {
            return;
        }
        let current = match self.selection {
            Selection::Sprite(i) if i < count => Some(i),
            _ => None,
        };
        self.selection = Selection::Sprite(cycle(current, count, forward));
    }

    pub fn next_animation(&mut self, store: &AssetStore) {
        self.step_animation(store, true);
    }

    pub fn previous_animation(&mut self, store: &AssetStore) {
        self.step_animation(store, false);
    }

    fn step_animation(&mut self, store: &AssetStore, forward: bool) {
        let count = store.animation_count();
        if count == 0 {
            return;
        }
        let current = match self.selection {
            Selection::Animation(i) if i < count => Some(i),
            _ => None,
        };
        self.selection = Selection::Animation(cycle(current, count, forward));
    }

    /// Move to the next tilemap slot and select its first tile.
    pub fn next_tilemap(&mut self, store: &AssetStore) {
        self.step_tilemap(store, true);
    }

    pub fn previous_tilemap(&mut self, store: &AssetStore) {
        self.step_tilemap(store, false);
    }

    fn step_tilemap(&mut self, store: &AssetStore, forward: bool) {
        let count = store.tilemap_count();
        if count == 0 {
            return;
        }
        let current = (self.tilemap < count).then_some(self.tilemap);
        self.tilemap = cycle(current, count, forward);
        self.selection = Selection::Tile(0);
    }

    pub fn toggle_collidable(&mut self) {
        self.collidable = !self.collidable;
    }

    /// The current selection as a tile reference.
    pub fn tile_ref(&self) -> TileRef {
        let tilemap = self.tilemap;
        match self.selection {
            Selection::Tile(tile) => TileRef::Tile { tilemap, tile },
            Selection::Sprite(sprite) => TileRef::Sprite { tilemap, sprite },
            Selection::Animation(animation) => TileRef::Animation { tilemap, animation },
        }
    }

    /// Encode the selection and push it onto cell `(x, y)`.
    ///
    /// Returns `false` if the selection does not resolve to a loaded asset,
    /// does not fit the index encoding, or the cell is outside the map.
    pub fn place(&self, world: &mut TileWorld, store: &AssetStore, x: usize, y: usize) -> bool {
        let tile_ref = self.tile_ref();
        let exists = match tile_ref {
            TileRef::Tile { tilemap, tile } => {
                store.tilemap_at(tilemap).is_some_and(|t| tile < t.total_tiles())
            }
            TileRef::Sprite { sprite, .. } => sprite < store.sprite_count(),
            TileRef::Animation { animation, .. } => animation < store.animation_count(),
        };
        if !exists {
            warn!("Nothing to place for {:?}", tile_ref);
            return false;
        }
        match store.encode_tile_ref(tile_ref) {
            Some(index) => world.push(x, y, index, self.collidable),
            None => false,
        }
    }

    /// Remove the top entry of cell `(x, y)`.
    pub fn erase(&self, world: &mut TileWorld, x: usize, y: usize) -> Option<PlacedTile> {
        world.pop_top(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn store_with(dir: &std::path::Path) -> AssetStore {
        let save = |name: &str, w: u32, h: u32| {
            let path = dir.join(name);
            RgbaImage::from_pixel(w, h, Rgba([9, 9, 9, 255]))
                .save(&path)
                .expect("write png");
            path
        };
        let mut store = AssetStore::new();
        store.load_tilemap(&save("Tilemap_A.png", 192, 64), 64).expect("a");
        store.load_tilemap(&save("Tilemap_B.png", 64, 64), 64).expect("b");
        store.load_sprite(&save("rock.png", 4, 4)).expect("rock");
        store.load_sprite(&save("tree.png", 4, 4)).expect("tree");
        store
    }

    #[test]
    fn tile_cycling_wraps() {
        let temp = TempDir::new().expect("temp");
        let store = store_with(temp.path());
        let mut cursor = PlacementCursor::default();
        cursor.previous_tile(&store);
        assert_eq!(cursor.selection, Selection::Tile(2));
        cursor.next_tile(&store);
        assert_eq!(cursor.selection, Selection::Tile(0));

        cursor.next_sprite(&store);
        assert_eq!(cursor.selection, Selection::Sprite(0));
        cursor.previous_sprite(&store);
        assert_eq!(cursor.selection, Selection::Sprite(1));
        cursor.next_tile(&store);
        assert_eq!(cursor.selection, Selection::Tile(0));

        // no animations loaded: selection unchanged
        cursor.next_animation(&store);
        assert_eq!(cursor.selection, Selection::Tile(0));
    }

    #[test]
    fn tilemap_switch_resets_selection() {
        let temp = TempDir::new().expect("temp");
        let store = store_with(temp.path());
        let mut cursor = PlacementCursor {
            selection: Selection::Tile(2),
            ..PlacementCursor::default()
        };
        cursor.next_tilemap(&store);
        assert_eq!(cursor.tilemap, 1);
        assert_eq!(cursor.selection, Selection::Tile(0));
        cursor.next_tilemap(&store);
        assert_eq!(cursor.tilemap, 0);
        cursor.previous_tilemap(&store);
        assert_eq!(cursor.tilemap, 1);
    }

    #[test]
    fn place_encodes_selection() {
        let temp = TempDir::new().expect("temp");
        let store = store_with(temp.path());
        let mut world = TileWorld::new(4, 4, 64);
        let mut cursor = PlacementCursor {
            tilemap: 1,
            ..PlacementCursor::default()
        };
        cursor.toggle_collidable();
        assert!(cursor.place(&mut world, &store, 1, 1));
        cursor.selection = Selection::Sprite(1);
        assert!(cursor.place(&mut world, &store, 1, 1));

        let stack = world.cell(1, 1).expect("cell");
        assert_eq!(
            stack.entries(),
            &[PlacedTile::new(1000, true), PlacedTile::new(1002, true)]
        );

        cursor.selection = Selection::Animation(0);
        assert!(!cursor.place(&mut world, &store, 1, 1));
        assert!(!cursor.place(&mut world, &store, 9, 9));

        assert_eq!(cursor.erase(&mut world, 1, 1), Some(PlacedTile::new(1002, true)));
        assert_eq!(world.cell(1, 1).map(|c| c.count()), Some(1));
    }
}
