//! Tagged references to placeable assets and their integer encoding.
//!
//! Map files store one `i32` per placed entry: `tilemap_slot * 1000 + offset`.
//! Inside a slot the offset space is partitioned into the tilemap's tiles, then
//! every loaded sprite, then every loaded animation. [`TileRef`] is the decoded
//! form used everywhere else.

use log::warn;
use raylib::prelude::Rectangle;

use super::{AssetStore, TextureId};

/// Width of the offset space owned by one tilemap slot.
pub const TILE_SLOTS_PER_TILEMAP: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileRef {
    /// Tile `tile` of tilemap `tilemap`.
    Tile { tilemap: usize, tile: usize },
    /// Sprite index `sprite`, placed through tilemap slot `tilemap`.
    Sprite { tilemap: usize, sprite: usize },
    /// Animation index `animation`, placed through tilemap slot `tilemap`.
    Animation { tilemap: usize, animation: usize },
}

impl TileRef {
    pub fn tilemap(&self) -> usize {
        match *self {
            TileRef::Tile { tilemap, .. }
            | TileRef::Sprite { tilemap, .. }
            | TileRef::Animation { tilemap, .. } => tilemap,
        }
    }
}

impl AssetStore {
    fn tiles_in_slot(&self, slot: usize) -> usize {
        self.tilemap_at(slot).map_or(0, |t| t.total_tiles())
    }

    /// Encode `tile_ref` for storage in a map file.
    ///
    /// Returns `None` when the offset does not fit the 1000-wide slot or the
    /// slot index overflows `i32`.
    pub fn encode_tile_ref(&self, tile_ref: TileRef) -> Option<i32> {
        let total = self.tiles_in_slot(tile_ref.tilemap());
        let offset = match tile_ref {
            TileRef::Tile { tile, .. } => Some(tile),
            TileRef::Sprite { sprite, .. } => total.checked_add(sprite),
            TileRef::Animation { animation, .. } => total
                .checked_add(self.sprite_count())
                .and_then(|o| o.checked_add(animation)),
        }?;
        if offset >= TILE_SLOTS_PER_TILEMAP as usize {
            warn!(
                "{:?} needs offset {} which does not fit in a slot of {}",
                tile_ref, offset, TILE_SLOTS_PER_TILEMAP
            );
            return None;
        }
        let slot = i32::try_from(tile_ref.tilemap()).ok()?;
        slot.checked_mul(TILE_SLOTS_PER_TILEMAP)?
            .checked_add(offset as i32)
    }

    /// Decode a stored index against the currently loaded assets.
    ///
    /// Returns `None` for negative indices and offsets past the last animation.
    pub fn decode_tile_index(&self, index: i32) -> Option<TileRef> {
        if index < 0 {
            return None;
        }
        let tilemap = (index / TILE_SLOTS_PER_TILEMAP) as usize;
        let offset = (index % TILE_SLOTS_PER_TILEMAP) as usize;
        let total = self.tiles_in_slot(tilemap);
        let sprites = self.sprite_count();

        if offset < total {
            Some(TileRef::Tile {
                tilemap,
                tile: offset,
            })
        } else if offset < total + sprites {
            Some(TileRef::Sprite {
                tilemap,
                sprite: offset - total,
            })
        } else {
            let animation = offset - total - sprites;
            (animation < self.animation_count()).then_some(TileRef::Animation { tilemap, animation })
        }
    }

    /// Texture and source rectangle to draw for a stored index.
    ///
    /// The rectangle is local to the texture's region; animations report
    /// their current frame.
    pub fn tile_source(&self, index: i32) -> Option<(TextureId, Rectangle)> {
        match self.decode_tile_index(index)? {
            TileRef::Tile { tilemap, tile } => {
                let tilemap = self.tilemap_at(tilemap)?;
                let tile = tilemap.tiles.get(tile)?;
                let size = tilemap.tile_size as f32;
                Some((tile.texture, Rectangle::new(0.0, 0.0, size, size)))
            }
            TileRef::Sprite { sprite, .. } => {
                let sprite = self.sprite_at(sprite)?;
                Some((
                    sprite.texture,
                    Rectangle::new(0.0, 0.0, sprite.width as f32, sprite.height as f32),
                ))
            }
            TileRef::Animation { animation, .. } => {
                let animation = self.animation_at(animation)?;
                Some((animation.texture, animation.current_rect()?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    // Tilemap of 2x2 tiles, two sprites, one two-row sheet.
    fn populated_store(dir: &std::path::Path) -> AssetStore {
        let save = |name: &str, w: u32, h: u32| {
            let path = dir.join(name);
            RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255]))
                .save(&path)
                .expect("write png");
            path
        };
        let mut store = AssetStore::new();
        store.load_tilemap(&save("Tilemap_A.png", 128, 128), 64).expect("tilemap");
        store.load_sprite(&save("rock.png", 8, 8)).expect("sprite");
        store.load_sprite(&save("tree.png", 8, 8)).expect("sprite");
        store
            .load_animation_sheet(&save("Imp_2_2_8_8.png", 16, 16))
            .expect("sheet");
        store
    }

    #[test]
    fn partitions_offsets() {
        let temp = TempDir::new().expect("temp");
        let store = populated_store(temp.path());

        assert_eq!(
            store.encode_tile_ref(TileRef::Tile { tilemap: 0, tile: 3 }),
            Some(3)
        );
        assert_eq!(
            store.encode_tile_ref(TileRef::Sprite { tilemap: 0, sprite: 1 }),
            Some(5)
        );
        assert_eq!(
            store.encode_tile_ref(TileRef::Animation {
                tilemap: 0,
                animation: 1
            }),
            Some(7)
        );

        assert_eq!(
            store.decode_tile_index(3),
            Some(TileRef::Tile { tilemap: 0, tile: 3 })
        );
        assert_eq!(
            store.decode_tile_index(4),
            Some(TileRef::Sprite { tilemap: 0, sprite: 0 })
        );
        assert_eq!(
            store.decode_tile_index(6),
            Some(TileRef::Animation {
                tilemap: 0,
                animation: 0
            })
        );
        assert_eq!(store.decode_tile_index(8), None);
        assert_eq!(store.decode_tile_index(-1), None);
    }

    #[test]
    fn empty_slot_starts_at_sprites() {
        let temp = TempDir::new().expect("temp");
        let store = populated_store(temp.path());
        assert_eq!(
            store.encode_tile_ref(TileRef::Sprite { tilemap: 3, sprite: 0 }),
            Some(3000)
        );
        assert_eq!(
            store.decode_tile_index(3002),
            Some(TileRef::Animation {
                tilemap: 3,
                animation: 0
            })
        );
    }

    #[test]
    fn offset_past_slot_is_rejected() {
        let store = AssetStore::new();
        assert_eq!(
            store.encode_tile_ref(TileRef::Tile {
                tilemap: 0,
                tile: 1000
            }),
            None
        );
        assert_eq!(
            store.encode_tile_ref(TileRef::Tile {
                tilemap: usize::MAX,
                tile: 0
            }),
            None
        );
    }

    #[test]
    fn tile_source_per_kind() {
        let temp = TempDir::new().expect("temp");
        let store = populated_store(temp.path());

        let (tex, rect) = store.tile_source(3).expect("tile");
        assert_eq!(tex, store.tilemap_at(0).expect("tilemap").tiles[3].texture);
        assert_eq!((rect.width, rect.height), (64.0, 64.0));

        let (tex, rect) = store.tile_source(5).expect("sprite");
        assert_eq!(tex, store.sprite_at(1).expect("tree").texture);
        assert_eq!((rect.width, rect.height), (8.0, 8.0));

        let (_, rect) = store.tile_source(7).expect("animation");
        assert_eq!((rect.x, rect.y), (0.0, 8.0));

        assert!(store.tile_source(8).is_none());
        assert!(store.tile_source(-1).is_none());
    }
}
