//! Tilestead main entry point.
//!
//! A 2D tile game runtime written in Rust using:
//! - **raylib** for windowing, input and drawing
//! - **bevy_ecs** for the world, resources, systems and scene observers
//! - **image** for decoding and slicing asset images
//!
//! # Main Loop
//!
//! 1. Read `config.ini` and the command line, set up logging
//! 2. Open the raylib window and insert every resource into the ECS world
//! 3. Run the frame schedule: input, scene logic, pending scene switches,
//!    rendering
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --scene test-map
//! cargo run --release -- --list-assets
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::fs::OpenOptions;
use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use tilestead::events::scene::SceneChangedEvent;
use tilestead::game::{self, FrameSet};
use tilestead::resources::gameconfig::GameConfig;
use tilestead::resources::gamestate::{NextScene, Scene};
use tilestead::resources::screensize::ScreenSize;
use tilestead::resources::tileworld::TileWorld;
use tilestead::systems::input::update_input_state;
use tilestead::systems::render::{TextureCache, render_system};
use tilestead::systems::time::update_world_time;

/// Tilestead 2D tile game runtime
#[derive(Parser)]
#[command(version, about = "Tile placement editor and test map for sprite sheet assets")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Scene to open instead of the main menu
    /// (tile-placement, test-map, debug, networking).
    #[arg(long, value_name = "NAME")]
    scene: Option<String>,

    /// Asset root, overriding the configuration file.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Load the asset tree, print a JSON catalog of it and exit.
    #[arg(long)]
    list_assets: bool,
}

fn init_logging(config: &GameConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
        }
    }
    builder.init();
}

fn list_assets(config: &GameConfig) -> Result<(), String> {
    let mut store = config.asset_store();
    store
        .load(&config.asset_root)
        .map_err(|e| format!("Cannot load assets: {}", e))?;
    store
        .load_additional(&config.asset_root)
        .map_err(|e| format!("Cannot load patch assets: {}", e))?;
    let json = serde_json::to_string_pretty(&store.catalog())
        .map_err(|e| format!("Cannot serialise catalog: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    let config_result = config.load_from_file();
    if let Some(root) = cli.assets {
        config.asset_root = root;
    }
    init_logging(&config);
    if let Err(e) = config_result {
        warn!("Using default configuration: {}", e);
    }

    // Early-exit: print the asset catalog (no window needed)
    if cli.list_assets {
        if let Err(e) = list_assets(&config) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let start_scene = match cli.scene.as_deref() {
        None => None,
        Some(name) => match Scene::from_name(name) {
            Some(scene) => Some(scene),
            None => {
                eprintln!(
                    "Error: unknown scene {:?}; expected one of tile-placement, test-map, debug, networking",
                    name
                );
                std::process::exit(2);
            }
        },
    };

    info!("Starting Tilestead");
    // --------------- Raylib window ---------------
    let (window_width, window_height) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(window_width as i32, window_height as i32)
        .resizable()
        .title("Tilestead")
        .build();
    rl.set_target_fps(config.target_fps);
    // ESC returns to the menu instead of closing the window
    rl.set_exit_key(None);

    // --------------- ECS world + resources ---------------
    let screen = ScreenSize {
        w: rl.get_screen_width(),
        h: rl.get_screen_height(),
    };
    let mut world = World::new();
    game::init_world(&mut world, config, screen);
    world.insert_non_send_resource(TextureCache::default());
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    if let Some(scene) = start_scene {
        world.resource_mut::<NextScene>().set(scene);
        world.trigger(SceneChangedEvent {});
        world.flush();
    }

    let mut update = game::build_update_schedule();
    update.add_systems(update_input_state.in_set(FrameSet::Input));
    update.add_systems(render_system.in_set(FrameSet::Render));
    if let Err(e) = update.initialize(&mut world) {
        error!("Failed to initialize schedule: {}", e);
        std::process::exit(1);
    }

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        let (dt, w, h) = {
            let rl = world.non_send_resource::<raylib::RaylibHandle>();
            (rl.get_frame_time(), rl.get_screen_width(), rl.get_screen_height())
        };
        update_world_time(&mut world, dt);

        // Window may have been resized
        if *world.resource::<ScreenSize>() != (ScreenSize { w, h }) {
            world.insert_resource(ScreenSize { w, h });
            world
                .resource_mut::<TileWorld>()
                .set_viewport(w.max(0) as u32, h.max(0) as u32);
        }

        update.run(&mut world);

        world.clear_trackers(); // Clear changed components for next frame
    }
    info!("Window closed, exiting");
}
