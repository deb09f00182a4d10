//! Input systems.
//!
//! [`update_input_state`] reads hardware input from Raylib each frame and
//! writes the results into [`crate::resources::input::InputState`].
use bevy_ecs::prelude::*;
use raylib::prelude::MouseButton;

use crate::resources::input::{ButtonState, InputState};

/// Poll Raylib for keyboard and mouse input and update the `InputState` resource.
pub fn update_input_state(mut input: ResMut<InputState>, rl: NonSendMut<raylib::RaylibHandle>) {
    for key in input.keys_mut() {
        let binding = key.key_binding;
        key.active = rl.is_key_down(binding);
        key.just_pressed = rl.is_key_pressed(binding);
        key.just_released = rl.is_key_released(binding);
    }

    let button = |b: MouseButton| ButtonState {
        down: rl.is_mouse_button_down(b),
        pressed: rl.is_mouse_button_pressed(b),
        released: rl.is_mouse_button_released(b),
    };
    input.mouse.left = button(MouseButton::MOUSE_BUTTON_LEFT);
    input.mouse.right = button(MouseButton::MOUSE_BUTTON_RIGHT);
    input.mouse.position = rl.get_mouse_position();
}
