//! Keyboard movement of the player square.
use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::boxcollider::BoxCollider;
use crate::components::inputcontrolled::InputControlled;
use crate::components::mapposition::MapPosition;
use crate::resources::input::InputState;
use crate::resources::tileworld::TileWorld;
use crate::resources::worldtime::WorldTime;

/// WASD moves every [`InputControlled`] entity. The move is refused when the
/// collider at the new position overlaps a collidable cell.
pub fn player_movement_system(
    input: Res<InputState>,
    time: Res<WorldTime>,
    tiles: Res<TileWorld>,
    mut query: Query<(&mut MapPosition, &BoxCollider, &InputControlled)>,
) {
    let mut dir = Vector2::zero();
    if input.maindirection_up.active {
        dir.y -= 1.0;
    }
    if input.maindirection_down.active {
        dir.y += 1.0;
    }
    if input.maindirection_left.active {
        dir.x -= 1.0;
    }
    if input.maindirection_right.active {
        dir.x += 1.0;
    }
    if dir.x == 0.0 && dir.y == 0.0 {
        return;
    }
    for (mut pos, collider, controlled) in query.iter_mut() {
        let next = pos.pos + dir.scale_by(controlled.speed * time.delta);
        if !tiles.is_blocked(collider.rect(next)) {
            pos.pos = next;
        }
    }
}
