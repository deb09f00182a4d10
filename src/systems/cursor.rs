//! Cursor hover detection.
use bevy_ecs::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::building::Building;
use crate::components::mapposition::MapPosition;
use crate::components::npc::Npc;
use crate::resources::input::InputState;
use crate::resources::pointer::CursorHover;
use crate::resources::tileworld::TileWorld;
use crate::systems::npc::mouse_world;

/// Set [`CursorHover`] when the mouse is over an NPC or a building.
///
/// NPCs are hit-tested as a circle of half their frame width around their
/// position, buildings by their collision rectangle.
pub fn cursor_hover_system(
    input: Res<InputState>,
    tiles: Res<TileWorld>,
    mut hover: ResMut<CursorHover>,
    npcs: Query<(&MapPosition, &BoxCollider), With<Npc>>,
    buildings: Query<(&MapPosition, &BoxCollider), With<Building>>,
) {
    let mouse = mouse_world(&input, &tiles);
    let over_npc = npcs.iter().any(|(pos, collider)| {
        let radius = collider.size.x / 2.0;
        (mouse - pos.pos).length_sqr() <= radius * radius
    });
    let over_building = || {
        buildings
            .iter()
            .any(|(pos, collider)| collider.contains_point(pos.pos, mouse))
    };
    hover.0 = over_npc || over_building();
}
