//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `assetstore` – sprites, animations and sliced tilemaps indexed by name
//! - `tileworld` – the editable grid of tile stacks and its map file format
//! - `placement` – what the tile editor places next
//! - `gameconfig` – settings loaded from `config.ini`
//! - `gamestate` – current scene and pending scene switch
//! - `input` – per-frame keyboard and mouse state
//! - `pointer` – cursor hover flag and drag-box selection
//! - `debugview` – debug scene asset viewer position
//! - `menu` – main menu selection
//! - `stockpile` – wood and gold counters
//! - `screensize` – current framebuffer dimensions in pixels
//! - `worldtime` – simulation time and delta
pub mod assetstore;
pub mod debugview;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod menu;
pub mod placement;
pub mod pointer;
pub mod screensize;
pub mod stockpile;
pub mod tileworld;
pub mod worldtime;
