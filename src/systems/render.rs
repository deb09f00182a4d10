//! Drawing.
//!
//! [`render_system`] is an exclusive system: it takes the Raylib handle out of
//! the world for the duration of the frame, uploads any store texture not yet
//! on the GPU and draws the current scene. GPU textures are cached per source
//! file in [`TextureCache`]; store textures reference a region of their file.
use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use log::warn;
use raylib::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::animation::Animator;
use crate::components::building::{Building, BuildingState};
use crate::components::inputcontrolled::InputControlled;
use crate::components::mapposition::MapPosition;
use crate::components::npc::Npc;
use crate::game::PLAYER_SIZE;
use crate::resources::assetstore::{AssetStore, TextureId};
use crate::resources::debugview::{DebugViewer, ViewMode};
use crate::resources::gamestate::{CurrentScene, Scene};
use crate::resources::input::InputState;
use crate::resources::menu::MainMenu;
use crate::resources::placement::{PlacementCursor, Selection};
use crate::resources::pointer::{CursorHover, DragSelection};
use crate::resources::stockpile::Stockpile;
use crate::resources::tileworld::TileWorld;
use crate::systems::building::UNIT_BUTTONS;

const TEST_MAP_BACKGROUND: Color = Color {
    r: 0x47,
    g: 0xaa,
    b: 0xa9,
    a: 0xff,
};
const DRAG_FILL: Color = Color {
    r: 0,
    g: 228,
    b: 48,
    a: 76,
};
const CURSOR_SPRITE: &str = "mouse";
const HOVER_CURSOR_SPRITE: &str = "select";

/// GPU textures keyed by source file.
#[derive(Default)]
pub struct TextureCache {
    textures: FxHashMap<PathBuf, Texture2D>,
    failed: FxHashSet<PathBuf>,
}

impl TextureCache {
    /// Upload every source file of `store` not cached yet. An empty store
    /// releases the cache.
    pub fn sync(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, store: &AssetStore) {
        if store.texture_count() == 0 {
            self.textures.clear();
            self.failed.clear();
            return;
        }
        for id in 1..=store.texture_count() as u32 {
            let Some(data) = store.texture(TextureId(id)) else {
                continue;
            };
            if self.textures.contains_key(&data.source) || self.failed.contains(&data.source) {
                continue;
            }
            match upload(rl, thread, &data.source) {
                Some(texture) => {
                    self.textures.insert(data.source.clone(), texture);
                }
                None => {
                    self.failed.insert(data.source.clone());
                }
            }
        }
    }

    fn get(&self, source: &Path) -> Option<&Texture2D> {
        self.textures.get(source)
    }
}

fn upload(rl: &mut RaylibHandle, thread: &RaylibThread, path: &Path) -> Option<Texture2D> {
    let Some(name) = path.to_str() else {
        warn!("Texture path {:?} is not valid UTF-8", path);
        return None;
    };
    rl.load_texture(thread, name)
        .inspect_err(|e| warn!("Cannot upload {:?}: {}", path, e))
        .ok()
}

/// Draw `local` (relative to the texture's region) of store texture `id` with
/// its top-left corner at `at`.
fn draw_region(
    d: &mut RaylibDrawHandle,
    cache: &TextureCache,
    store: &AssetStore,
    id: TextureId,
    local: Rectangle,
    at: Vector2,
) {
    let Some(data) = store.texture(id) else {
        return;
    };
    let Some(texture) = cache.get(&data.source) else {
        return;
    };
    let src = Rectangle::new(
        data.region.x + local.x,
        data.region.y + local.y,
        local.width,
        local.height,
    );
    d.draw_texture_rec(texture, src, at, Color::WHITE);
}

/// Draw a named sprite or the current frame of a named animation.
fn draw_named(
    d: &mut RaylibDrawHandle,
    cache: &TextureCache,
    store: &AssetStore,
    name: &str,
    at: Vector2,
) {
    if let Some(animation) = store.animation_ref(name) {
        if let Some(rect) = animation.current_rect() {
            draw_region(d, cache, store, animation.texture, rect, at);
        }
        return;
    }
    let sprite = store.sprite(name);
    if !sprite.texture.is_none() {
        let rect = Rectangle::new(0.0, 0.0, sprite.width as f32, sprite.height as f32);
        draw_region(d, cache, store, sprite.texture, rect, at);
    }
}

pub fn render_system(world: &mut World) {
    let Some(mut rl) = world.remove_non_send_resource::<RaylibHandle>() else {
        return;
    };
    let Some(thread) = world.remove_non_send_resource::<RaylibThread>() else {
        world.insert_non_send_resource(rl);
        return;
    };
    let mut cache = world
        .remove_non_send_resource::<TextureCache>()
        .unwrap_or_default();
    cache.sync(&mut rl, &thread, world.resource::<AssetStore>());

    {
        let mut d = rl.begin_drawing(&thread);
        match world.resource::<CurrentScene>().get() {
            Scene::MainMenu => draw_main_menu(world, &mut d),
            Scene::TilePlacement => draw_tile_placement(world, &mut d, &cache),
            Scene::TestMap => draw_test_map(world, &mut d, &cache),
            Scene::Debug => draw_debug(world, &mut d, &cache),
            Scene::Networking => {
                d.clear_background(Color::BLACK);
                d.draw_text("Networking is not available", 40, 40, 20, Color::RAYWHITE);
                d.draw_text("ESC: back to menu", 40, 70, 10, Color::GRAY);
            }
        }
    }

    world.insert_non_send_resource(cache);
    world.insert_non_send_resource(thread);
    world.insert_non_send_resource(rl);
}

fn draw_main_menu(world: &mut World, d: &mut RaylibDrawHandle) {
    let menu = *world.resource::<MainMenu>();
    d.clear_background(Color::DARKGRAY);
    d.draw_text("Tilestead", 40, 40, 40, Color::RAYWHITE);
    for (i, scene) in Scene::MENU.iter().enumerate() {
        let color = if i == menu.selected {
            Color::GOLD
        } else {
            Color::LIGHTGRAY
        };
        d.draw_text(scene.label(), 60, 120 + i as i32 * 30, 20, color);
    }
    d.draw_text("UP / DOWN: select   ENTER: open", 40, 260, 10, Color::GRAY);
}

/// Every visible cell's stack, bottom to top, offset by the scroll.
fn draw_tiles(world: &World, d: &mut RaylibDrawHandle, cache: &TextureCache) {
    let store = world.resource::<AssetStore>();
    let tiles = world.resource::<TileWorld>();
    let (sx, sy) = tiles.scroll();
    let (vw, vh) = tiles.view_tiles();
    let scroll = tiles.scroll_pixels();
    for (x, y, stack) in tiles.occupied() {
        if x < sx || y < sy || x > sx + vw || y > sy + vh {
            continue;
        }
        let cell = tiles.cell_rect(x, y);
        let at = Vector2::new(cell.x - scroll.x, cell.y - scroll.y);
        for entry in stack.entries() {
            if let Some((texture, rect)) = store.tile_source(entry.index) {
                draw_region(d, cache, store, texture, rect, at);
            }
        }
    }
}

fn draw_tile_placement(world: &mut World, d: &mut RaylibDrawHandle, cache: &TextureCache) {
    d.clear_background(Color::RAYWHITE);
    draw_tiles(world, d, cache);

    let store = world.resource::<AssetStore>();
    let tiles = world.resource::<TileWorld>();
    let cursor = *world.resource::<PlacementCursor>();
    let input = world.resource::<InputState>();
    let scroll = tiles.scroll_pixels();
    let size = tiles.tile_size() as i32;

    for (x, y, stack) in tiles.occupied() {
        if stack.has_collidable() {
            let cell = tiles.cell_rect(x, y);
            d.draw_rectangle_lines(
                (cell.x - scroll.x) as i32,
                (cell.y - scroll.y) as i32,
                size,
                size,
                Color::RED,
            );
        }
    }

    if let Some((x, y)) = tiles.cell_at(input.mouse.position + scroll) {
        let cell = tiles.cell_rect(x, y);
        let at = Vector2::new(cell.x - scroll.x, cell.y - scroll.y);
        if let Some(index) = store.encode_tile_ref(cursor.tile_ref()) {
            if let Some((texture, rect)) = store.tile_source(index) {
                draw_region(d, cache, store, texture, rect, at);
            }
        }
        d.draw_rectangle_lines(at.x as i32, at.y as i32, size, size, Color::BLUE);
    }

    let selected = match cursor.selection {
        Selection::Tile(i) => format!("tile {}", i),
        Selection::Sprite(i) => format!(
            "sprite {}",
            store.sprite_at(i).map_or("-", |s| s.name.as_str())
        ),
        Selection::Animation(i) => format!(
            "animation {}",
            store.animation_at(i).map_or("-", |a| a.name.as_str())
        ),
    };
    let tilemap = store
        .tilemap_at(cursor.tilemap)
        .map_or("-", |t| t.name.as_str());
    let (sx, sy) = tiles.scroll();
    d.draw_text(
        &format!(
            "Tilemap: {} | {} | collidable: {} | view ({}, {})",
            tilemap, selected, cursor.collidable, sx, sy
        ),
        10,
        10,
        10,
        Color::BLACK,
    );
    d.draw_text(
        "ARROWS tile/sprite  Q/E animation  PGUP/PGDN tilemap  C collide  WASD scroll  F5 save  F9 load",
        10,
        25,
        10,
        Color::DARKGRAY,
    );
}

fn draw_test_map(world: &mut World, d: &mut RaylibDrawHandle, cache: &TextureCache) {
    d.clear_background(TEST_MAP_BACKGROUND);
    draw_tiles(world, d, cache);

    let mut buildings: Vec<(Vector2, Building, Option<Animator>)> = world
        .query::<(&MapPosition, &Building, Option<&Animator>)>()
        .iter(world)
        .map(|(p, b, a)| (p.pos, b.clone(), a.cloned()))
        .collect();
    buildings.sort_by(|a, b| a.0.y.total_cmp(&b.0.y));

    let mut npcs: Vec<(Vector2, Npc, Animator)> = world
        .query::<(&MapPosition, &Npc, &Animator)>()
        .iter(world)
        .map(|(p, n, a)| (p.pos, n.clone(), a.clone()))
        .collect();
    npcs.sort_by(|a, b| a.0.y.total_cmp(&b.0.y));

    let players: Vec<Vector2> = world
        .query_filtered::<&MapPosition, With<InputControlled>>()
        .iter(world)
        .map(|p| p.pos)
        .collect();

    let store = world.resource::<AssetStore>();
    let scroll = world.resource::<TileWorld>().scroll_pixels();

    for (pos, building, animator) in &buildings {
        let pos = *pos - scroll;
        let frame = animator
            .as_ref()
            .filter(|_| building.state == BuildingState::Completed)
            .and_then(|a| {
                let animation = store.animation_ref(&a.animation_key)?;
                Some((animation.texture, *animation.frames.get(a.frame_index)?))
            });
        let (w, h) = match frame {
            Some((texture, rect)) => {
                let at = Vector2::new(pos.x - rect.width / 2.0, pos.y - rect.height / 2.0);
                draw_region(d, cache, store, texture, rect, at);
                (rect.width, rect.height)
            }
            None => {
                let sprite = store.sprite(building.visual_name());
                let (w, h) = (sprite.width as f32, sprite.height as f32);
                draw_named(
                    d,
                    cache,
                    store,
                    building.visual_name(),
                    Vector2::new(pos.x - w / 2.0, pos.y - h / 2.0),
                );
                (w, h)
            }
        };
        if building.state == BuildingState::Construction {
            d.draw_text(
                &format!("{:.0}%", building.build_progress),
                pos.x as i32,
                (pos.y - h / 2.0) as i32 - 12,
                10,
                Color::RAYWHITE,
            );
        }
        if building.selected {
            d.draw_rectangle_lines(
                (pos.x - w / 2.0) as i32,
                (pos.y - h / 2.0) as i32,
                w as i32,
                h as i32,
                Color::YELLOW,
            );
        }
    }

    for (pos, npc, animator) in &npcs {
        let pos = *pos - scroll;
        let Some(animation) = store.animation_ref(&animator.animation_key) else {
            d.draw_circle(pos.x as i32, pos.y as i32, 8.0, Color::MAROON);
            continue;
        };
        let Some(rect) = animation.frames.get(animator.frame_index).copied() else {
            continue;
        };
        let at = Vector2::new(pos.x - rect.width / 2.0, pos.y - rect.height / 2.0);
        draw_region(d, cache, store, animation.texture, rect, at);
        if npc.selected {
            d.draw_circle_lines(pos.x as i32, pos.y as i32, rect.width / 2.0, Color::GREEN);
        }
        if npc.draw_name {
            d.draw_text(
                &animator.animation_key,
                at.x as i32,
                at.y as i32 - 20,
                10,
                Color::RAYWHITE,
            );
        }
    }

    for pos in &players {
        let pos = *pos - scroll;
        d.draw_rectangle(
            pos.x as i32,
            pos.y as i32,
            PLAYER_SIZE as i32,
            PLAYER_SIZE as i32,
            Color::BLUE,
        );
    }

    if buildings
        .iter()
        .any(|(_, b, _)| b.selected && b.state == BuildingState::Completed)
    {
        d.draw_text("Select Unit to Spawn:", 100, 50, 20, Color::WHITE);
        for button in &UNIT_BUTTONS {
            d.draw_rectangle_rec(button.rect, Color::DARKGRAY);
            d.draw_text(
                button.label,
                button.rect.x as i32 + 10,
                button.rect.y as i32 + 5,
                20,
                Color::WHITE,
            );
        }
    }

    if let Some(rect) = world.resource::<DragSelection>().rect() {
        let rect = Rectangle::new(rect.x - scroll.x, rect.y - scroll.y, rect.width, rect.height);
        d.draw_rectangle_rec(rect, DRAG_FILL);
        d.draw_rectangle_lines(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
            Color::GREEN,
        );
    }

    let stock = *world.resource::<Stockpile>();
    let screen_w = d.get_screen_width();
    d.draw_text(
        &format!("Wood: {}  Gold: {}", stock.wood, stock.gold),
        screen_w - 200,
        10,
        20,
        Color::RAYWHITE,
    );

    let hover = world.resource::<CursorHover>().0;
    let mouse = world.resource::<InputState>().mouse.position;
    let cursor = if hover {
        HOVER_CURSOR_SPRITE
    } else {
        CURSOR_SPRITE
    };
    draw_named(d, cache, store, cursor, mouse);
}

fn draw_debug(world: &mut World, d: &mut RaylibDrawHandle, cache: &TextureCache) {
    d.clear_background(Color::DARKBLUE);
    let store = world.resource::<AssetStore>();
    let viewer = *world.resource::<DebugViewer>();
    let center = Vector2::new(
        d.get_screen_width() as f32 / 2.0,
        d.get_screen_height() as f32 / 2.0,
    );

    let (label, count) = match viewer.mode {
        ViewMode::Sprites => {
            if let Some(sprite) = store.sprite_at(viewer.index) {
                let (w, h) = (sprite.width as f32, sprite.height as f32);
                let rect = Rectangle::new(0.0, 0.0, w, h);
                let at = Vector2::new(center.x - w / 2.0, center.y - h / 2.0);
                draw_region(d, cache, store, sprite.texture, rect, at);
                d.draw_text(&sprite.name, 10, 40, 20, Color::RAYWHITE);
            }
            ("Sprites", store.sprite_count())
        }
        ViewMode::Animations => {
            if let Some(animation) = store.animation_at(viewer.index) {
                if let Some(rect) = animation.current_rect() {
                    let at = Vector2::new(center.x - rect.width / 2.0, center.y - rect.height / 2.0);
                    draw_region(d, cache, store, animation.texture, rect, at);
                }
                d.draw_text(
                    &format!(
                        "{} ({} frames of {}x{})",
                        animation.name,
                        animation.frame_count(),
                        animation.frame_width,
                        animation.frame_height
                    ),
                    10,
                    40,
                    20,
                    Color::RAYWHITE,
                );
            }
            ("Animations", store.animation_count())
        }
    };
    let position = if count == 0 { 0 } else { viewer.index + 1 };
    d.draw_text(
        &format!("{} {}/{}  (LEFT/RIGHT browse, TAB switch, ESC back)", label, position, count),
        10,
        10,
        20,
        Color::RAYWHITE,
    );
    let fps = d.get_fps();
    d.draw_text(&format!("FPS: {}", fps), 10, 70, 10, Color::LIGHTGRAY);
}
