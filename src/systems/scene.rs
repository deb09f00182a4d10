//! Scene switching systems and run conditions.
use bevy_ecs::prelude::*;

use crate::events::scene::SceneChangedEvent;
use crate::resources::gamestate::{CurrentScene, NextScene, NextScenes, Scene};
use crate::resources::input::InputState;

/// Trigger [`SceneChangedEvent`] while a scene switch is pending.
pub fn check_pending_scene(mut commands: Commands, next_scene: Res<NextScene>) {
    if let NextScenes::Pending(_scene) = next_scene.get() {
        commands.trigger(SceneChangedEvent {});
    }
}

/// ESC returns to the main menu from any other scene.
pub fn back_to_menu_system(input: Res<InputState>, mut next_scene: ResMut<NextScene>) {
    if input.action_back.just_pressed {
        next_scene.set(Scene::MainMenu);
    }
}

/// Run condition: the current scene is `scene`.
pub fn in_scene(scene: Scene) -> impl FnMut(Res<CurrentScene>) -> bool + Clone {
    move |current: Res<CurrentScene>| current.get() == scene
}

/// Run condition: the current scene is anything but `scene`.
pub fn not_in_scene(scene: Scene) -> impl FnMut(Res<CurrentScene>) -> bool + Clone {
    move |current: Res<CurrentScene>| current.get() != scene
}
