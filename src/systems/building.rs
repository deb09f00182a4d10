//! Building construction, selection and unit production.
//!
//! A selected, completed building shows one screen-space button per
//! [`UNIT_BUTTONS`] entry; clicking a button queues that unit.
use bevy_ecs::prelude::*;
use log::{info, warn};
use raylib::prelude::{Rectangle, Vector2};

use crate::components::boxcollider::BoxCollider;
use crate::components::building::{Building, BuildingState, SPAWN_OFFSET_Y};
use crate::components::mapposition::MapPosition;
use crate::components::npc::{MAX_NPCS, Npc};
use crate::game::npc_bundle;
use crate::resources::assetstore::AssetStore;
use crate::resources::input::InputState;
use crate::resources::tileworld::TileWorld;
use crate::resources::worldtime::WorldTime;
use crate::systems::npc::mouse_world;

/// One unit production button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitButton {
    pub label: &'static str,
    /// Unit type queued on click.
    pub unit: &'static str,
    /// Screen-space bounds.
    pub rect: Rectangle,
}

pub const UNIT_BUTTONS: [UnitButton; 2] = [
    UnitButton {
        label: "Warrior",
        unit: "WarriorRed",
        rect: Rectangle {
            x: 100.0,
            y: 80.0,
            width: 120.0,
            height: 30.0,
        },
    },
    UnitButton {
        label: "Archer",
        unit: "ArcherRed",
        rect: Rectangle {
            x: 100.0,
            y: 120.0,
            width: 120.0,
            height: 30.0,
        },
    },
];

/// Button under a screen-space point.
pub fn unit_button_at(point: Vector2) -> Option<&'static UnitButton> {
    UNIT_BUTTONS.iter().find(|b| {
        point.x >= b.rect.x
            && point.x <= b.rect.x + b.rect.width
            && point.y >= b.rect.y
            && point.y <= b.rect.y + b.rect.height
    })
}

/// Left click handling for buildings.
///
/// A click on a unit button of the selected building queues that unit and
/// leaves selections alone. Otherwise the topmost building under the cursor
/// (largest `y`) becomes the only selected building and every NPC is
/// deselected; a click on empty ground deselects all buildings.
pub fn building_click_system(
    input: Res<InputState>,
    tiles: Res<TileWorld>,
    mut buildings: Query<(&MapPosition, &BoxCollider, &mut Building)>,
    mut npcs: Query<&mut Npc>,
) {
    if !input.mouse.left.pressed {
        return;
    }

    if let Some(button) = unit_button_at(input.mouse.position) {
        let mut queued = false;
        for (_, _, mut building) in buildings.iter_mut() {
            if building.selected && building.state == BuildingState::Completed {
                info!("{} queued at {}", button.label, building.config.type_name);
                building.queue_unit(button.unit);
                queued = true;
            }
        }
        if queued {
            return;
        }
    }

    let mouse = mouse_world(&input, &tiles);
    let topmost = buildings
        .iter()
        .filter(|(pos, collider, building)| {
            building.state != BuildingState::Destroyed && collider.contains_point(pos.pos, mouse)
        })
        .map(|(pos, _, _)| pos.pos.y)
        .fold(None, |best: Option<f32>, y| Some(best.map_or(y, |b| b.max(y))));

    let mut picked = false;
    for (pos, collider, mut building) in buildings.iter_mut() {
        let selected = !picked
            && topmost.is_some_and(|y| pos.pos.y == y)
            && building.state != BuildingState::Destroyed
            && collider.contains_point(pos.pos, mouse);
        picked |= selected;
        building.selected = selected;
    }

    if picked {
        for mut npc in npcs.iter_mut() {
            npc.selected = false;
        }
    }
}

pub fn building_update_system(time: Res<WorldTime>, mut buildings: Query<&mut Building>) {
    for mut building in buildings.iter_mut() {
        building.update(time.delta);
    }
}

/// Completed buildings with a queued unit spawn it below themselves.
///
/// Nothing spawns once [`MAX_NPCS`] NPCs exist; the queue is cleared either
/// way.
pub fn building_production_system(
    mut commands: Commands,
    store: Res<AssetStore>,
    mut buildings: Query<(&MapPosition, &mut Building)>,
    npcs: Query<(), With<Npc>>,
) {
    let mut npc_count = npcs.iter().count();
    for (pos, mut building) in buildings.iter_mut() {
        if building.state != BuildingState::Completed {
            continue;
        }
        let Some(unit) = building.unit_to_spawn.take() else {
            continue;
        };
        if npc_count >= MAX_NPCS {
            warn!("NPC limit of {} reached, {} not spawned", MAX_NPCS, unit);
            continue;
        }
        let at = Vector2::new(pos.pos.x, pos.pos.y + SPAWN_OFFSET_Y);
        let (position, npc, animator, collider) = npc_bundle(&store, &unit, at);
        info!(
            "Spawned {} (health {}, strength {}, defense {})",
            npc.unit_type, npc.health, npc.strength, npc.defense
        );
        commands.spawn((position, npc.with_draw_name(true), animator, collider));
        npc_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_hit_test() {
        assert_eq!(
            unit_button_at(Vector2::new(150.0, 90.0)).map(|b| b.unit),
            Some("WarriorRed")
        );
        assert_eq!(
            unit_button_at(Vector2::new(150.0, 140.0)).map(|b| b.unit),
            Some("ArcherRed")
        );
        assert!(unit_button_at(Vector2::new(150.0, 115.0)).is_none());
        assert!(unit_button_at(Vector2::new(50.0, 90.0)).is_none());
    }
}
