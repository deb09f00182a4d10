//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animation`] – per-entity playback of a named store animation
//! - [`boxcollider`] – axis-aligned rectangular collider
//! - [`building`] – faction buildings with construction and unit production
//! - [`inputcontrolled`] – keyboard-driven movement
//! - [`mapposition`] – world-space position for an entity
//! - [`npc`] – non-player characters with state-driven animation
//! - [`persistent`] – marker for entities that persist across scene changes

pub mod animation;
pub mod boxcollider;
pub mod building;
pub mod inputcontrolled;
pub mod mapposition;
pub mod npc;
pub mod persistent;
