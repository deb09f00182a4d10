//! Building component and the per-faction building table.
//!
//! A building starts under construction, completes once its progress reaches
//! 100 and is destroyed when its health drops to zero. Completed buildings
//! produce one NPC per queued unit type.

use bevy_ecs::prelude::Component;
use log::info;

use BuildingKind::*;
use Faction::*;

/// Build progress gained per second.
pub const BUILD_RATE: f32 = 20.0;
/// Progress at which construction completes.
pub const BUILD_COMPLETE: f32 = 100.0;
/// Produced units appear this many pixels below the building centre.
pub const SPAWN_OFFSET_Y: f32 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Humans,
    Undead,
    Goblins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingKind {
    Castle,
    Tower,
    House,
    Graveyard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildingState {
    #[default]
    Construction,
    Completed,
    Destroyed,
}

/// Static description of one building type of one faction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingConfig {
    pub faction: Faction,
    pub kind: BuildingKind,
    pub type_name: &'static str,
    pub construction_sprite: &'static str,
    /// Sprite name, or animation name when `animated`.
    pub completed_sprite: &'static str,
    pub destroyed_sprite: &'static str,
    pub max_health: f32,
    pub animated: bool,
}

const fn config(
    faction: Faction,
    kind: BuildingKind,
    type_name: &'static str,
    sprites: [&'static str; 3],
    max_health: f32,
    animated: bool,
) -> BuildingConfig {
    BuildingConfig {
        faction,
        kind,
        type_name,
        construction_sprite: sprites[0],
        completed_sprite: sprites[1],
        destroyed_sprite: sprites[2],
        max_health,
        animated,
    }
}

#[rustfmt::skip]
pub static BUILDING_CONFIGS: &[BuildingConfig] = &[
    config(Humans, Castle, "Castle", ["CastleConstruction", "CastleBlue", "CastleDestroyed"], 200.0, false),
    config(Humans, Tower, "Tower", ["TowerConstruction", "TowerBlue", "TowerDestroyed"], 150.0, false),
    config(Humans, House, "House", ["HouseConstruction", "HouseBlue", "HouseDestroyed"], 100.0, false),
    config(Undead, Castle, "Castle", ["UndeadCastleConstruction", "UndeadCastleBlue", "UndeadCastleDestroyed"], 200.0, false),
    config(Undead, Tower, "Tower", ["UndeadTowerConstruction", "UndeadTowerBlue", "UndeadTowerDestroyed"], 150.0, true),
    config(Undead, House, "House", ["UndeadHouseConstruction", "UndeadHouseBlue", "UndeadHouseDestroyed"], 100.0, false),
    config(Undead, Graveyard, "Graveyard", ["GraveyardConstruction", "GraveyardInactive", "GraveyardDestroyed"], 150.0, false),
    config(Goblins, House, "House", ["GoblinHouse", "GoblinHouse", "GoblinHouseDestroyed"], 200.0, false),
    config(Goblins, Tower, "Tower", ["WoodTowerInConstruction", "WoodTowerBlue", "WoodTowerDestroyed"], 150.0, true),
];

/// Look up the table entry for `faction` / `kind`.
pub fn building_config(faction: Faction, kind: BuildingKind) -> Option<&'static BuildingConfig> {
    BUILDING_CONFIGS
        .iter()
        .find(|c| c.faction == faction && c.kind == kind)
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Building {
    pub config: &'static BuildingConfig,
    pub state: BuildingState,
    pub build_progress: f32,
    pub health: f32,
    pub selected: bool,
    /// Unit type produced on the next update once completed.
    pub unit_to_spawn: Option<String>,
}

impl Building {
    /// New building under construction. `None` if the faction has no such
    /// building.
    pub fn new(faction: Faction, kind: BuildingKind) -> Option<Self> {
        let config = building_config(faction, kind)?;
        Some(Self {
            config,
            state: BuildingState::Construction,
            build_progress: 0.0,
            health: config.max_health,
            selected: false,
            unit_to_spawn: None,
        })
    }

    /// Advance construction and check for destruction.
    pub fn update(&mut self, dt: f32) {
        if self.state != BuildingState::Destroyed && self.health <= 0.0 {
            self.state = BuildingState::Destroyed;
            self.selected = false;
            self.unit_to_spawn = None;
            info!("{} destroyed", self.config.type_name);
            return;
        }
        if self.state == BuildingState::Construction {
            self.build_progress = (self.build_progress + dt * BUILD_RATE).min(BUILD_COMPLETE);
            if self.build_progress >= BUILD_COMPLETE {
                self.state = BuildingState::Completed;
                info!("{} construction completed", self.config.type_name);
            }
        }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    /// Queue one unit of `unit_type` for production.
    pub fn queue_unit(&mut self, unit_type: impl Into<String>) {
        self.unit_to_spawn = Some(unit_type.into());
    }

    /// Asset name drawn for the current state.
    pub fn visual_name(&self) -> &'static str {
        match self.state {
            BuildingState::Construction => self.config.construction_sprite,
            BuildingState::Completed => self.config.completed_sprite,
            BuildingState::Destroyed => self.config.destroyed_sprite,
        }
    }
}
