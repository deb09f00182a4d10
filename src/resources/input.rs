//! Per-frame keyboard and mouse input resource.
//!
//! Captures the subset of input state the game cares about and exposes it to
//! systems via the [`InputState`] resource. Gameplay systems only read this
//! resource, so they can be driven from tests without a window.
//!
//! Default bindings:
//! - WASD: move the player square, scroll the editor view
//! - arrows: cycle tiles (left/right) and sprites (up/down), menu navigation
//! - Page Up / Page Down: cycle tilemaps
//! - Q / E: cycle animations
//! - C: toggle the collidable flag for new placements
//! - F5 / F9: save / load the map
//! - Tab: switch the debug viewer between sprites and animations
//! - Enter: confirm, Escape: back to the menu
use bevy_ecs::prelude::*;
use raylib::prelude::*;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently held.
    pub active: bool,
    /// Whether the key was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the key was just released this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL)
    }
}

impl BoolState {
    /// Inactive state bound to `key`.
    pub const fn bound(key: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: key,
        }
    }

    /// Simulate a press on this frame. Used by tests and scripted input.
    pub fn press(&mut self) {
        self.active = true;
        self.just_pressed = true;
        self.just_released = false;
    }

    /// Clear the edge flags, keeping `active`.
    pub fn clear_edges(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// State of one mouse button this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub down: bool,
    pub pressed: bool,
    pub released: bool,
}

/// Mouse position (screen space) and buttons.
#[derive(Debug, Clone, Copy)]
pub struct MouseState {
    pub position: Vector2,
    pub left: ButtonState,
    pub right: ButtonState,
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            position: Vector2::zero(),
            left: ButtonState::default(),
            right: ButtonState::default(),
        }
    }
}

/// Resource capturing the per-frame input state relevant to the game.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub maindirection_up: BoolState,
    pub maindirection_left: BoolState,
    pub maindirection_down: BoolState,
    pub maindirection_right: BoolState,
    // Arrow keys
    pub secondarydirection_up: BoolState,
    pub secondarydirection_down: BoolState,
    pub secondarydirection_left: BoolState,
    pub secondarydirection_right: BoolState,
    // Editor keys
    pub previous_tilemap: BoolState,
    pub next_tilemap: BoolState,
    pub previous_animation: BoolState,
    pub next_animation: BoolState,
    pub toggle_collidable: BoolState,
    pub save_map: BoolState,
    pub load_map: BoolState,
    // Control keys
    pub toggle_view: BoolState,
    pub action_confirm: BoolState,
    pub action_back: BoolState,

    pub mouse: MouseState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            maindirection_up: BoolState::bound(KeyboardKey::KEY_W),
            maindirection_left: BoolState::bound(KeyboardKey::KEY_A),
            maindirection_down: BoolState::bound(KeyboardKey::KEY_S),
            maindirection_right: BoolState::bound(KeyboardKey::KEY_D),
            secondarydirection_up: BoolState::bound(KeyboardKey::KEY_UP),
            secondarydirection_down: BoolState::bound(KeyboardKey::KEY_DOWN),
            secondarydirection_left: BoolState::bound(KeyboardKey::KEY_LEFT),
            secondarydirection_right: BoolState::bound(KeyboardKey::KEY_RIGHT),
            previous_tilemap: BoolState::bound(KeyboardKey::KEY_PAGE_UP),
            next_tilemap: BoolState::bound(KeyboardKey::KEY_PAGE_DOWN),
            previous_animation: BoolState::bound(KeyboardKey::KEY_Q),
            next_animation: BoolState::bound(KeyboardKey::KEY_E),
            toggle_collidable: BoolState::bound(KeyboardKey::KEY_C),
            save_map: BoolState::bound(KeyboardKey::KEY_F5),
            load_map: BoolState::bound(KeyboardKey::KEY_F9),
            toggle_view: BoolState::bound(KeyboardKey::KEY_TAB),
            action_confirm: BoolState::bound(KeyboardKey::KEY_ENTER),
            action_back: BoolState::bound(KeyboardKey::KEY_ESCAPE),
            mouse: MouseState::default(),
        }
    }
}

impl InputState {
    /// Every key binding, for polling.
    pub fn keys_mut(&mut self) -> [&mut BoolState; 18] {
        [
            &mut self.maindirection_up,
            &mut self.maindirection_left,
            &mut self.maindirection_down,
            &mut self.maindirection_right,
            &mut self.secondarydirection_up,
            &mut self.secondarydirection_down,
            &mut self.secondarydirection_left,
            &mut self.secondarydirection_right,
            &mut self.previous_tilemap,
            &mut self.next_tilemap,
            &mut self.previous_animation,
            &mut self.next_animation,
            &mut self.toggle_collidable,
            &mut self.save_map,
            &mut self.load_map,
            &mut self.toggle_view,
            &mut self.action_confirm,
            &mut self.action_back,
        ]
    }

    /// Drop all edge flags (keyboard and mouse). Held keys stay held.
    pub fn clear_edges(&mut self) {
        for key in self.keys_mut() {
            key.clear_edges();
        }
        for button in [&mut self.mouse.left, &mut self.mouse.right] {
            button.pressed = false;
            button.released = false;
        }
    }
}
