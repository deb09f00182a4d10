//! Tile placement editor input.
//!
//! | Input | Action |
//! |---|---|
//! | Left / Right | previous / next tile of the current tilemap |
//! | Up / Down | previous / next sprite |
//! | Q / E | previous / next animation |
//! | Page Up / Page Down | previous / next tilemap |
//! | C | toggle collidable for new entries |
//! | W A S D | scroll the view one cell |
//! | Left click | push the selection onto the cell under the cursor |
//! | Right click | pop the top entry of the cell under the cursor |
//! | F5 / F9 | save / load the configured map file |
use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::resources::assetstore::AssetStore;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::placement::PlacementCursor;
use crate::resources::tileworld::TileWorld;
use crate::systems::npc::mouse_world;

pub fn tile_placement_system(
    input: Res<InputState>,
    store: Res<AssetStore>,
    config: Res<GameConfig>,
    mut cursor: ResMut<PlacementCursor>,
    mut tiles: ResMut<TileWorld>,
) {
    if input.secondarydirection_left.just_pressed {
        cursor.previous_tile(&store);
    }
    if input.secondarydirection_right.just_pressed {
        cursor.next_tile(&store);
    }
    if input.secondarydirection_up.just_pressed {
        cursor.previous_sprite(&store);
    }
    if input.secondarydirection_down.just_pressed {
        cursor.next_sprite(&store);
    }
    if input.previous_animation.just_pressed {
        cursor.previous_animation(&store);
    }
    if input.next_animation.just_pressed {
        cursor.next_animation(&store);
    }
    if input.previous_tilemap.just_pressed {
        cursor.previous_tilemap(&store);
    }
    if input.next_tilemap.just_pressed {
        cursor.next_tilemap(&store);
    }
    if input.toggle_collidable.just_pressed {
        cursor.toggle_collidable();
        info!("New entries collidable: {}", cursor.collidable);
    }

    let mut dx = 0;
    let mut dy = 0;
    if input.maindirection_left.just_pressed {
        dx -= 1;
    }
    if input.maindirection_right.just_pressed {
        dx += 1;
    }
    if input.maindirection_up.just_pressed {
        dy -= 1;
    }
    if input.maindirection_down.just_pressed {
        dy += 1;
    }
    if dx != 0 || dy != 0 {
        tiles.scroll_by(dx, dy);
    }

    if let Some((x, y)) = tiles.cell_at(mouse_world(&input, &tiles)) {
        if input.mouse.left.pressed {
            cursor.place(&mut tiles, &store, x, y);
        }
        if input.mouse.right.pressed {
            cursor.erase(&mut tiles, x, y);
        }
    }

    if input.save_map.just_pressed {
        if let Err(e) = tiles.save(&config.map_file) {
            warn!("Map not saved: {}", e);
        }
    }
    if input.load_map.just_pressed {
        if let Err(e) = tiles.load(&config.map_file) {
            warn!("Map not loaded: {}", e);
        }
    }
}
