//! Scene switch event and observer.
//!
//! Systems request a switch by updating [`NextScene`]. Emitting a
//! [`SceneChangedEvent`] then triggers [`observe_scene_change_event`], which
//! applies the switch to [`CurrentScene`] and queues
//! [`crate::game::enter_scene`] to rebuild the scene's entities and resources.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::game;
use crate::resources::gamestate::{CurrentScene, NextScene, NextScenes};

/// Event used to indicate that a pending scene switch should be applied.
#[derive(Event, Debug, Clone, Copy)]
pub struct SceneChangedEvent {}

/// Observer that applies a pending scene switch.
///
/// If [`NextScene`] holds [`NextScenes::Pending`], the observer copies the
/// scene into [`CurrentScene`], clears the request and queues the scene
/// entry. If nothing is pending, nothing happens.
pub fn observe_scene_change_event(
    _trigger: On<SceneChangedEvent>,
    mut commands: Commands,
    mut next_scene: Option<ResMut<NextScene>>,
    mut current_scene: Option<ResMut<CurrentScene>>,
) {
    debug!("SceneChangedEvent triggered");

    let (Some(next_scene), Some(current_scene)) =
        (next_scene.as_deref_mut(), current_scene.as_deref_mut())
    else {
        warn!(
            "Scene resources missing in observe_scene_change_event. next: {:?}, current: {:?}",
            next_scene.is_some(),
            current_scene.is_some()
        );
        return;
    };

    match next_scene.get() {
        NextScenes::Pending(scene) => {
            info!("Switching scene from {:?} to {:?}", current_scene.get(), scene);
            current_scene.set(scene);
            next_scene.reset();
            commands.queue(move |world: &mut World| game::enter_scene(world, scene));
        }
        NextScenes::Unchanged => debug!("No scene change pending."),
    }
}
