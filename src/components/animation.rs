use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::resources::assetstore::{Animation, DEFAULT_FRAME_TIME};

/// Per-entity playback of a named animation from the asset store.
///
/// Entities reference animations by name only; frame geometry and the
/// texture stay in the store.
#[derive(Debug, Clone, Component, Serialize, Deserialize, PartialEq)]
pub struct Animator {
    pub animation_key: String,
    pub frame_index: usize,
    pub elapsed_time: f32,
}

impl Animator {
    pub fn new(animation_key: impl Into<String>) -> Self {
        Self {
            animation_key: animation_key.into(),
            frame_index: 0,
            elapsed_time: 0.0,
        }
    }

    /// Switch to `key`, restarting playback if it differs from the current one.
    pub fn set_key(&mut self, key: &str) {
        if self.animation_key != key {
            self.animation_key = key.to_string();
            self.frame_index = 0;
            self.elapsed_time = 0.0;
        }
    }

    /// Advance against the timing and length of `animation`.
    pub fn advance(&mut self, dt: f32, animation: &Animation) {
        let frames = animation.frame_count();
        if frames == 0 {
            return;
        }
        let frame_time = if animation.frame_time > 0.0 {
            animation.frame_time
        } else {
            DEFAULT_FRAME_TIME
        };
        self.elapsed_time += dt;
        if self.elapsed_time >= frame_time {
            self.elapsed_time -= frame_time;
            self.frame_index = (self.frame_index + 1) % frames;
        }
        if self.frame_index >= frames {
            self.frame_index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::assetstore::TextureId;
    use raylib::prelude::Rectangle;

    fn two_frames() -> Animation {
        Animation {
            name: "Imp_1".into(),
            texture: TextureId(1),
            frames: vec![Rectangle::new(0.0, 0.0, 8.0, 8.0); 2],
            frame_time: 0.1,
            ..Animation::default()
        }
    }

    #[test]
    fn advances_and_wraps() {
        let anim = two_frames();
        let mut animator = Animator::new("Imp_1");
        animator.advance(0.1, &anim);
        assert_eq!(animator.frame_index, 1);
        animator.advance(0.1, &anim);
        assert_eq!(animator.frame_index, 0);
    }

    #[test]
    fn key_change_restarts() {
        let anim = two_frames();
        let mut animator = Animator::new("Imp_1");
        animator.advance(0.15, &anim);
        animator.set_key("Imp_1");
        assert_eq!(animator.frame_index, 1);
        animator.set_key("Imp_2");
        assert_eq!(animator.frame_index, 0);
        assert_eq!(animator.elapsed_time, 0.0);
    }

    #[test]
    fn missing_animation_is_inert() {
        let mut animator = Animator::new("Ghost_1");
        animator.advance(5.0, &Animation::default());
        assert_eq!(animator.frame_index, 0);
    }
}
