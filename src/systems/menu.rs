//! Main menu navigation.
use bevy_ecs::prelude::*;
use log::info;

use crate::resources::gamestate::NextScene;
use crate::resources::input::InputState;
use crate::resources::menu::MainMenu;

/// Up / down (arrows or W / S) move the highlight; ENTER requests the
/// highlighted scene.
pub fn main_menu_system(
    input: Res<InputState>,
    mut menu: ResMut<MainMenu>,
    mut next_scene: ResMut<NextScene>,
) {
    if input.secondarydirection_up.just_pressed || input.maindirection_up.just_pressed {
        menu.up();
    }
    if input.secondarydirection_down.just_pressed || input.maindirection_down.just_pressed {
        menu.down();
    }
    if input.action_confirm.just_pressed {
        let scene = menu.selected_scene();
        info!("Menu selected {}", scene.label());
        next_scene.set(scene);
    }
}
