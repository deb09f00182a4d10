//! NPC selection, orders and movement.
//!
//! Mouse positions are converted to world space with the tile world's
//! scroll offset. An NPC's bounds are its [`BoxCollider`], sized from its
//! animation frame when spawned.
use bevy_ecs::prelude::*;
use log::debug;
use raylib::prelude::Vector2;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::npc::{Npc, NpcState};
use crate::resources::input::InputState;
use crate::resources::pointer::DragSelection;
use crate::resources::tileworld::TileWorld;
use crate::resources::worldtime::WorldTime;

/// Drags smaller than this on both axes are treated as clicks.
pub const MIN_DRAG_SIZE: f32 = 4.0;

/// Mouse position in world space.
pub fn mouse_world(input: &InputState, tiles: &TileWorld) -> Vector2 {
    input.mouse.position + tiles.scroll_pixels()
}

/// Left click on an NPC selects it alone. Right click orders every selected
/// NPC to walk to the cursor.
pub fn npc_mouse_system(
    input: Res<InputState>,
    tiles: Res<TileWorld>,
    mut npcs: Query<(&MapPosition, &BoxCollider, &mut Npc)>,
) {
    let mouse = mouse_world(&input, &tiles);

    if input.mouse.left.pressed {
        let hit = npcs
            .iter()
            .any(|(pos, collider, npc)| npc.state != NpcState::Dead && collider.contains_point(pos.pos, mouse));
        if hit {
            let mut picked = false;
            for (pos, collider, mut npc) in npcs.iter_mut() {
                let selected = !picked
                    && npc.state != NpcState::Dead
                    && collider.contains_point(pos.pos, mouse);
                picked |= selected;
                npc.selected = selected;
            }
        }
    }

    if input.mouse.right.pressed {
        for (_, _, mut npc) in npcs.iter_mut().filter(|(_, _, npc)| npc.selected) {
            npc.order_move(mouse);
            debug!("{} ordered to ({:.0}, {:.0})", npc.unit_type, mouse.x, mouse.y);
        }
    }
}

/// Walk toward the target. A step into a collidable cell is refused and the
/// NPC stops; reaching the target also stops it.
pub fn npc_movement_system(
    time: Res<WorldTime>,
    tiles: Res<TileWorld>,
    mut npcs: Query<(&mut MapPosition, &BoxCollider, &mut Npc)>,
) {
    for (mut pos, collider, mut npc) in npcs.iter_mut() {
        if npc.state != NpcState::Walking {
            continue;
        }
        let Some(target) = npc.target else {
            npc.halt();
            continue;
        };
        let to_target = target - pos.pos;
        let distance = to_target.length();
        let step = npc.speed * time.delta;
        let (next, arrived) = if distance <= step {
            (target, true)
        } else {
            (pos.pos + to_target.scale_by(step / distance), false)
        };

        if tiles.is_blocked(collider.rect(next)) {
            debug!("{} blocked at ({:.0}, {:.0})", npc.unit_type, next.x, next.y);
            npc.halt();
            continue;
        }
        pos.pos = next;
        if arrived {
            npc.halt();
        }
    }
}

/// Drag a box with the left button; on release every living NPC overlapping
/// the box is selected and the rest deselected.
pub fn npc_drag_selection_system(
    input: Res<InputState>,
    tiles: Res<TileWorld>,
    mut drag: ResMut<DragSelection>,
    mut npcs: Query<(&MapPosition, &BoxCollider, &mut Npc)>,
) {
    let mouse = mouse_world(&input, &tiles);
    if input.mouse.left.pressed {
        drag.start = Some(mouse);
    }
    if drag.is_active() {
        drag.end = mouse;
    }
    if !input.mouse.left.released {
        return;
    }
    let Some(rect) = drag.rect() else {
        return;
    };
    drag.start = None;
    if rect.width < MIN_DRAG_SIZE && rect.height < MIN_DRAG_SIZE {
        return;
    }
    for (pos, collider, mut npc) in npcs.iter_mut() {
        npc.selected = npc.state != NpcState::Dead && collider.overlaps_rect(pos.pos, rect);
    }
}
