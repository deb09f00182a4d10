//! Game systems.
//!
//! This module groups all ECS systems that advance input, scene logic and
//! rendering.
//!
//! Submodules overview
//! - [`animation`] – choose and advance per-entity animations
//! - [`building`] – building selection, construction and unit production
//! - [`cursor`] – hover detection over NPCs and buildings
//! - [`debugview`] – browse loaded sprites and animations
//! - [`input`] – read hardware input and update [`crate::resources::input::InputState`]
//! - [`menu`] – main menu navigation
//! - [`movement`] – keyboard movement of the player square
//! - [`npc`] – NPC selection, orders and movement
//! - [`placement`] – tile placement editor
//! - [`render`] – draw the current scene using Raylib
//! - [`scene`] – pending scene switches and scene run conditions
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod building;
pub mod cursor;
pub mod debugview;
pub mod input;
pub mod menu;
pub mod movement;
pub mod npc;
pub mod placement;
pub mod render;
pub mod scene;
pub mod time;
