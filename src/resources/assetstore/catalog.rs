//! Serializable summary of the store contents, printed by `--list-assets`.

use serde::Serialize;

use super::AssetStore;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpriteEntry {
    pub index: usize,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnimationEntry {
    pub index: usize,
    pub name: String,
    pub frames: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub row: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TilemapEntry {
    pub index: usize,
    pub name: String,
    pub tile_size: u32,
    pub tile_count_x: u32,
    pub tile_count_y: u32,
    pub total_tiles: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct AssetCatalog {
    pub sprites: Vec<SpriteEntry>,
    pub animations: Vec<AnimationEntry>,
    pub tilemaps: Vec<TilemapEntry>,
}

impl AssetStore {
    /// Snapshot of every loaded asset in load order.
    pub fn catalog(&self) -> AssetCatalog {
        AssetCatalog {
            sprites: self
                .sprites()
                .iter()
                .enumerate()
                .map(|(index, s)| SpriteEntry {
                    index,
                    name: s.name.clone(),
                    width: s.width,
                    height: s.height,
                })
                .collect(),
            animations: self
                .animations()
                .iter()
                .enumerate()
                .map(|(index, a)| AnimationEntry {
                    index,
                    name: a.name.clone(),
                    frames: a.frame_count(),
                    frame_width: a.frame_width,
                    frame_height: a.frame_height,
                    row: a.row,
                })
                .collect(),
            tilemaps: self
                .tilemaps()
                .iter()
                .enumerate()
                .map(|(index, t)| TilemapEntry {
                    index,
                    name: t.name.clone(),
                    tile_size: t.tile_size,
                    tile_count_x: t.tile_count_x,
                    tile_count_y: t.tile_count_y,
                    total_tiles: t.total_tiles(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn catalog_serializes_in_load_order() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("Bat_1_3_4_4.png");
        RgbaImage::from_pixel(12, 4, Rgba([0, 0, 0, 255]))
            .save(&path)
            .expect("write png");
        let mut store = AssetStore::new();
        store.load_animation_sheet(&path).expect("load");

        let catalog = store.catalog();
        assert!(catalog.sprites.is_empty());
        assert_eq!(catalog.animations.len(), 1);
        assert_eq!(catalog.animations[0].name, "Bat_1");
        assert_eq!(catalog.animations[0].frames, 3);

        let json = serde_json::to_value(&catalog).expect("json");
        assert_eq!(json["animations"][0]["frame_width"], 4);
        assert_eq!(json["tilemaps"], serde_json::json!([]));
    }
}
