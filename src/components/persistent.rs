//! Persistent entity marker component.
//!
//! Entities with the [`Persistent`] component survive scene changes. The scene
//! observer carries it; everything spawned by a scene does not.

use bevy_ecs::prelude::Component;

/// Tag component used to mark entities that should persist across scene changes.
#[derive(Component, Clone, Debug)]
pub struct Persistent;
