//! Scene setup and teardown.
//!
//! [`init_world`] inserts every long-lived resource once. [`enter_scene`] runs
//! on each scene switch: it despawns the previous scene's entities, rebuilds
//! the asset store and tile world the new scene needs and spawns its initial
//! entities. [`build_update_schedule`] wires the per-frame systems, each gated
//! on the scene it belongs to.
use std::path::Path;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{error, info, warn};
use raylib::prelude::Vector2;

use crate::components::animation::Animator;
use crate::components::boxcollider::BoxCollider;
use crate::components::building::{Building, BuildingKind, Faction};
use crate::components::inputcontrolled::InputControlled;
use crate::components::mapposition::MapPosition;
use crate::components::npc::{DEFAULT_NPC_SPEED, Npc};
use crate::components::persistent::Persistent;
use crate::events::scene::observe_scene_change_event;
use crate::resources::assetstore::{AssetStore, DEFAULT_TILE_SIZE};
use crate::resources::debugview::DebugViewer;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{CurrentScene, NextScene, Scene};
use crate::resources::input::InputState;
use crate::resources::menu::MainMenu;
use crate::resources::placement::PlacementCursor;
use crate::resources::pointer::{CursorHover, DragSelection};
use crate::resources::screensize::ScreenSize;
use crate::resources::stockpile::Stockpile;
use crate::resources::tileworld::TileWorld;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{
    advance_animators, advance_store_animations, building_animation_keys, npc_animation_keys,
};
use crate::systems::building::{building_click_system, building_production_system, building_update_system};
use crate::systems::cursor::cursor_hover_system;
use crate::systems::debugview::debug_viewer_system;
use crate::systems::menu::main_menu_system;
use crate::systems::movement::player_movement_system;
use crate::systems::npc::{npc_drag_selection_system, npc_mouse_system, npc_movement_system};
use crate::systems::placement::tile_placement_system;
use crate::systems::scene::{back_to_menu_system, check_pending_scene, in_scene, not_in_scene};

/// Unit spawned at test map entry.
pub const STARTING_UNIT: &str = "WarriorRed_1";
pub const STARTING_UNIT_POSITION: Vector2 = Vector2 { x: 300.0, y: 300.0 };
pub const STARTING_BUILDING_POSITION: Vector2 = Vector2 { x: 400.0, y: 400.0 };
pub const PLAYER_POSITION: Vector2 = Vector2 { x: 600.0, y: 400.0 };
pub const PLAYER_SPEED: f32 = 200.0;
/// Edge of the player square, also used for its collision test.
pub const PLAYER_SIZE: f32 = 100.0;

/// Ordering of the per-frame work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Hardware polling into [`InputState`].
    Input,
    /// Scene logic.
    Logic,
    /// Pending scene switches.
    Scene,
    /// Drawing.
    Render,
}

/// Insert every resource the systems expect and register the scene observer.
///
/// The world starts in [`Scene::MainMenu`] with an empty asset store and a
/// map of the configured size.
pub fn init_world(world: &mut World, config: GameConfig, screen: ScreenSize) {
    let mut tiles = TileWorld::new(
        config.map_width as usize,
        config.map_height as usize,
        config.tile_size,
    );
    tiles.set_viewport(screen.w.max(0) as u32, screen.h.max(0) as u32);

    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(screen);
    world.insert_resource(InputState::default());
    world.insert_resource(CurrentScene::new(Scene::MainMenu));
    world.insert_resource(NextScene::new());
    world.insert_resource(MainMenu::default());
    world.insert_resource(config.asset_store());
    world.insert_resource(tiles);
    world.insert_resource(PlacementCursor::default());
    world.insert_resource(DebugViewer::default());
    world.insert_resource(CursorHover::default());
    world.insert_resource(DragSelection::default());
    world.insert_resource(Stockpile::default());
    world.insert_resource(config);

    world.spawn((Observer::new(observe_scene_change_event), Persistent));
    world.flush();
}

/// Despawn every entity not marked [`Persistent`].
pub fn clean_scene_entities(world: &mut World) {
    let doomed: Vec<Entity> = world
        .query_filtered::<Entity, Without<Persistent>>()
        .iter(world)
        .collect();
    for entity in doomed {
        world.despawn(entity);
    }
}

/// Build the resources and entities of `scene`.
///
/// Called by the scene observer once [`CurrentScene`] already holds `scene`.
pub fn enter_scene(world: &mut World, scene: Scene) {
    info!("Entering scene {}", scene.label());
    clean_scene_entities(world);
    world.insert_resource(PlacementCursor::default());
    world.insert_resource(DebugViewer::default());
    world.insert_resource(CursorHover::default());
    world.insert_resource(DragSelection::default());
    world.insert_resource(Stockpile::default());

    match scene {
        Scene::MainMenu => {
            world.resource_mut::<AssetStore>().unload();
        }
        Scene::TilePlacement => {
            reload_assets(world, false);
            reset_map(world);
            let map_file = world.resource::<GameConfig>().map_file.clone();
            if map_file.is_file() {
                if let Err(e) = world.resource_mut::<TileWorld>().load(&map_file) {
                    warn!("Starting with an empty map: {}", e);
                }
            }
        }
        Scene::TestMap => {
            reload_assets(world, true);
            reset_map(world);
            let map_dir = world.resource::<GameConfig>().map_dir.clone();
            match world.resource_mut::<TileWorld>().load_first_in_directory(&map_dir) {
                Ok(Some(path)) => info!("Test map uses {:?}", path),
                Ok(None) => info!("No map in {:?}, starting empty", map_dir),
                Err(e) => warn!("Starting with an empty map: {}", e),
            }
            spawn_test_map(world);
        }
        Scene::Debug => {
            reload_assets(world, false);
        }
        Scene::Networking => {
            info!("Networking is not available; press ESC to return to the menu");
        }
    }
}

/// Replace the asset store with a fresh load of the configured asset root.
fn reload_assets(world: &mut World, with_patch: bool) {
    world.resource_mut::<AssetStore>().unload();
    let config = world.resource::<GameConfig>().clone();
    let mut store = config.asset_store();
    load_tree(&mut store, &config.asset_root, with_patch);
    world.insert_resource(store);
}

/// Load `root` into `store`, optionally followed by its patch folder.
pub fn load_tree(store: &mut AssetStore, root: &Path, with_patch: bool) {
    if let Err(e) = store.load(root) {
        error!("Cannot load assets: {}", e);
        return;
    }
    if with_patch {
        if let Err(e) = store.load_additional(root) {
            warn!("Cannot load patch assets: {}", e);
        }
    }
}

/// Reallocate the tile world at the configured size for the current screen.
fn reset_map(world: &mut World) {
    let (width, height) = {
        let config = world.resource::<GameConfig>();
        (config.map_width as usize, config.map_height as usize)
    };
    let screen = *world.resource::<ScreenSize>();
    world.resource_mut::<TileWorld>().resize(
        width,
        height,
        screen.w.max(0) as u32,
        screen.h.max(0) as u32,
    );
}

fn spawn_test_map(world: &mut World) {
    let (position, npc, animator, collider) =
        npc_bundle(world.resource::<AssetStore>(), STARTING_UNIT, STARTING_UNIT_POSITION);
    world.spawn((position, npc.with_draw_name(true), animator, collider));

    match building_bundle(
        world.resource::<AssetStore>(),
        Faction::Humans,
        BuildingKind::Castle,
        STARTING_BUILDING_POSITION,
    ) {
        Some((position, building, collider, Some(animator))) => {
            world.spawn((position, building, collider, animator));
        }
        Some((position, building, collider, None)) => {
            world.spawn((position, building, collider));
        }
        None => warn!("No starting building available"),
    }

    world.spawn((
        MapPosition::new(PLAYER_POSITION.x, PLAYER_POSITION.y),
        InputControlled::new(PLAYER_SPEED),
        BoxCollider::new(PLAYER_SIZE, PLAYER_SIZE),
    ));
}

/// Components of an NPC of `unit` standing at `position`.
///
/// The collider is the unit's frame size centred on the position, or a
/// tile-sized square when the unit has no idle animation.
pub fn npc_bundle(
    store: &AssetStore,
    unit: &str,
    position: Vector2,
) -> (MapPosition, Npc, Animator, BoxCollider) {
    let npc = Npc::new(unit, DEFAULT_NPC_SPEED);
    let animation = store.animation(&npc.fallback_key());
    let (w, h) = if animation.is_empty() {
        (DEFAULT_TILE_SIZE as f32, DEFAULT_TILE_SIZE as f32)
    } else {
        (animation.frame_width as f32, animation.frame_height as f32)
    };
    let animator = Animator::new(npc.animation_key());
    (
        MapPosition::new(position.x, position.y),
        npc,
        animator,
        BoxCollider::centered(w, h),
    )
}

/// Components of a new `faction` / `kind` building at `position`.
///
/// The collider takes the size of the completed visual. Animated buildings
/// get an [`Animator`]. `None` if the faction has no such building.
pub fn building_bundle(
    store: &AssetStore,
    faction: Faction,
    kind: BuildingKind,
    position: Vector2,
) -> Option<(MapPosition, Building, BoxCollider, Option<Animator>)> {
    let building = Building::new(faction, kind)?;
    let completed = building.config.completed_sprite;
    let (w, h, animator) = if building.config.animated {
        let key = building_animation_key(store, completed);
        let animation = store.animation(&key);
        (
            animation.frame_width as f32,
            animation.frame_height as f32,
            Some(Animator::new(key)),
        )
    } else {
        let sprite = store.sprite(completed);
        (sprite.width as f32, sprite.height as f32, None)
    };
    let (w, h) = if w > 0.0 && h > 0.0 {
        (w, h)
    } else {
        (DEFAULT_TILE_SIZE as f32, DEFAULT_TILE_SIZE as f32)
    };
    Some((
        MapPosition::new(position.x, position.y),
        building,
        BoxCollider::centered(w, h),
        animator,
    ))
}

/// Animation key of an animated building visual: the name itself when it is
/// a loaded animation, otherwise its first sheet row.
pub fn building_animation_key(store: &AssetStore, name: &str) -> String {
    if store.animation_ref(name).is_some() {
        name.to_string()
    } else {
        format!("{}_1", name)
    }
}

/// Per-frame systems for every scene, without input polling and drawing.
///
/// The binary adds those to [`FrameSet::Input`] and [`FrameSet::Render`].
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.configure_sets(
        (
            FrameSet::Input,
            FrameSet::Logic,
            FrameSet::Scene,
            FrameSet::Render,
        )
            .chain(),
    );

    update.add_systems(
        main_menu_system
            .run_if(in_scene(Scene::MainMenu))
            .in_set(FrameSet::Logic),
    );
    update.add_systems(
        back_to_menu_system
            .run_if(not_in_scene(Scene::MainMenu))
            .in_set(FrameSet::Logic),
    );
    update.add_systems(
        tile_placement_system
            .run_if(in_scene(Scene::TilePlacement))
            .in_set(FrameSet::Logic),
    );
    update.add_systems(
        debug_viewer_system
            .run_if(in_scene(Scene::Debug))
            .in_set(FrameSet::Logic),
    );
    update.add_systems(
        advance_store_animations
            .run_if(not_in_scene(Scene::MainMenu))
            .in_set(FrameSet::Logic),
    );
    update.add_systems(
        (
            cursor_hover_system,
            player_movement_system,
            npc_mouse_system,
            npc_movement_system,
            building_click_system,
            building_update_system,
            building_production_system,
            npc_drag_selection_system,
            npc_animation_keys,
            building_animation_keys,
            advance_animators,
        )
            .chain()
            .run_if(in_scene(Scene::TestMap))
            .in_set(FrameSet::Logic),
    );
    update.add_systems(check_pending_scene.in_set(FrameSet::Scene));
    update
}
