//! Non-player character component.
//!
//! An NPC plays the row animations of its unit sheet: `<unit>_1` while idle,
//! `<unit>_2` while walking and `<unit>_3` while attacking. Sheets follow the
//! asset naming convention, so a `WarriorRed_6_6_192_192.png` file provides
//! every state of the `WarriorRed` unit.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

pub const DEFAULT_NPC_SPEED: f32 = 100.0;
pub const DEFAULT_NPC_HEALTH: f32 = 100.0;
pub const DEFAULT_NPC_STRENGTH: i32 = 10;
pub const DEFAULT_NPC_DEFENSE: i32 = 5;
/// Upper bound on live NPCs; production stops once reached.
pub const MAX_NPCS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NpcState {
    #[default]
    Idle,
    Walking,
    Talking,
    Attacking,
    Dead,
}

impl NpcState {
    /// Sheet row (1-based) played in this state.
    pub fn animation_row(&self) -> u32 {
        match self {
            NpcState::Idle | NpcState::Talking | NpcState::Dead => 1,
            NpcState::Walking => 2,
            NpcState::Attacking => 3,
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Npc {
    pub state: NpcState,
    /// Pixels per second while walking.
    pub speed: f32,
    /// Animation base name, e.g. `WarriorRed`.
    pub unit_type: String,
    pub health: f32,
    pub strength: i32,
    pub defense: i32,
    pub selected: bool,
    /// Where the NPC is walking to.
    pub target: Option<Vector2>,
    pub draw_name: bool,
}

impl Npc {
    /// Create an idle NPC of `unit_type`. A full animation key such as
    /// `WarriorRed_1` is accepted and reduced to its base name.
    pub fn new(unit_type: &str, speed: f32) -> Self {
        Self {
            state: NpcState::Idle,
            speed,
            unit_type: unit_base_name(unit_type).to_string(),
            health: DEFAULT_NPC_HEALTH,
            strength: DEFAULT_NPC_STRENGTH,
            defense: DEFAULT_NPC_DEFENSE,
            selected: false,
            target: None,
            draw_name: false,
        }
    }

    pub fn with_draw_name(mut self, draw_name: bool) -> Self {
        self.draw_name = draw_name;
        self
    }

    /// Animation key for the current state.
    pub fn animation_key(&self) -> String {
        format!("{}_{}", self.unit_type, self.state.animation_row())
    }

    /// Idle key, used when the state's row is missing from the store.
    pub fn fallback_key(&self) -> String {
        format!("{}_1", self.unit_type)
    }

    /// Start walking toward `target`. Dead NPCs ignore orders.
    pub fn order_move(&mut self, target: Vector2) {
        if self.state == NpcState::Dead {
            return;
        }
        self.target = Some(target);
        self.state = NpcState::Walking;
    }

    /// Stop walking and go idle.
    pub fn halt(&mut self) {
        self.target = None;
        if self.state == NpcState::Walking {
            self.state = NpcState::Idle;
        }
    }

    /// Apply damage after defense. Reaching zero health kills the NPC.
    pub fn take_damage(&mut self, amount: f32) {
        let dealt = (amount - self.defense as f32).max(0.0);
        self.health -= dealt;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.state = NpcState::Dead;
            self.target = None;
            self.selected = false;
        }
    }
}

/// Strip a trailing `_<row>` from an animation key: `WarriorRed_1` gives
/// `WarriorRed`. Names without a numeric suffix are returned unchanged.
pub fn unit_base_name(key: &str) -> &str {
    match key.rsplit_once('_') {
        Some((base, row)) if !base.is_empty() && row.parse::<u32>().is_ok() => base,
        _ => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_keys_follow_state() {
        let mut npc = Npc::new("WarriorRed_1", DEFAULT_NPC_SPEED);
        assert_eq!(npc.unit_type, "WarriorRed");
        assert_eq!(npc.animation_key(), "WarriorRed_1");
        npc.order_move(Vector2::new(10.0, 0.0));
        assert_eq!(npc.animation_key(), "WarriorRed_2");
        npc.state = NpcState::Attacking;
        assert_eq!(npc.animation_key(), "WarriorRed_3");
        npc.state = NpcState::Talking;
        assert_eq!(npc.animation_key(), "WarriorRed_1");
        assert_eq!(npc.fallback_key(), "WarriorRed_1");
    }

    #[test]
    fn base_name_parsing() {
        assert_eq!(unit_base_name("Warrior_Red_2"), "Warrior_Red");
        assert_eq!(unit_base_name("Archer"), "Archer");
        assert_eq!(unit_base_name("Archer_Blue"), "Archer_Blue");
        assert_eq!(unit_base_name("_3"), "_3");
    }

    #[test]
    fn dead_npcs_ignore_orders() {
        let mut npc = Npc::new("Goblin", 50.0);
        npc.selected = true;
        npc.take_damage(DEFAULT_NPC_HEALTH + DEFAULT_NPC_DEFENSE as f32);
        assert_eq!(npc.state, NpcState::Dead);
        assert!(!npc.selected);
        npc.order_move(Vector2::new(1.0, 1.0));
        assert_eq!(npc.state, NpcState::Dead);
        assert!(npc.target.is_none());
    }

    #[test]
    fn defense_absorbs_damage() {
        let mut npc = Npc::new("Goblin", 50.0);
        npc.take_damage(3.0);
        assert_eq!(npc.health, DEFAULT_NPC_HEALTH);
        npc.take_damage(15.0);
        assert_eq!(npc.health, DEFAULT_NPC_HEALTH - 10.0);
    }
}
