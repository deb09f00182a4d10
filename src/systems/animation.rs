//! Animation systems.
//!
//! - [`advance_store_animations`] steps the store's shared playback, used by
//!   animated entries placed on the tile world and by the debug viewer.
//! - [`npc_animation_keys`] and [`building_animation_keys`] pick the animation
//!   each entity should play from its state.
//! - [`advance_animators`] steps every per-entity [`Animator`].
use bevy_ecs::prelude::*;

use crate::components::animation::Animator;
use crate::components::building::{Building, BuildingState};
use crate::components::npc::Npc;
use crate::game::building_animation_key;
use crate::resources::assetstore::AssetStore;
use crate::resources::worldtime::WorldTime;

pub fn advance_store_animations(mut store: ResMut<AssetStore>, time: Res<WorldTime>) {
    store.advance(time.delta);
}

/// Point each NPC's animator at the row of its current state, falling back
/// to the idle row when the unit has no such row.
pub fn npc_animation_keys(store: Res<AssetStore>, mut query: Query<(&Npc, &mut Animator)>) {
    for (npc, mut animator) in query.iter_mut() {
        let key = npc.animation_key();
        if store.animation_ref(&key).is_some() {
            animator.set_key(&key);
        } else {
            animator.set_key(&npc.fallback_key());
        }
    }
}

/// Animated buildings play their completed visual once construction ends.
pub fn building_animation_keys(
    store: Res<AssetStore>,
    mut query: Query<(&Building, &mut Animator)>,
) {
    for (building, mut animator) in query.iter_mut() {
        if building.state == BuildingState::Completed {
            let key = building_animation_key(&store, building.config.completed_sprite);
            animator.set_key(&key);
        }
    }
}

/// Advance every animator against its animation's frame time and length.
/// Animators whose key is not loaded stay on frame 0.
pub fn advance_animators(
    store: Res<AssetStore>,
    time: Res<WorldTime>,
    mut query: Query<&mut Animator>,
) {
    for mut animator in query.iter_mut() {
        if let Some(animation) = store.animation_ref(&animator.animation_key) {
            animator.advance(time.delta, animation);
        }
    }
}
