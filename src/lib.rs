//! Tilestead library.
//!
//! A 2D tile game runtime: an asset store of sprites, row animations and
//! sliced tilemaps, an editable grid of tile stacks with a versioned binary
//! map format, and the scenes and entities that consume them. Components,
//! resources, systems and events are exposed for integration tests and the
//! binary.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
