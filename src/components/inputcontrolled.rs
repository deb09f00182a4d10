//! Keyboard-driven movement component.

use bevy_ecs::prelude::Component;

/// Entity moved by the WASD keys at `speed` pixels per second. The move is
/// refused when the entity's [`BoxCollider`] would overlap a blocked cell.
///
/// [`BoxCollider`]: crate::components::boxcollider::BoxCollider
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct InputControlled {
    pub speed: f32,
}

impl InputControlled {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}
