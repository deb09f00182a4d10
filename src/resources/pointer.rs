//! Mouse pointer state shared by the test map systems.

use bevy_ecs::prelude::Resource;
use raylib::prelude::{Rectangle, Vector2};

/// `true` while the mouse is over an NPC or a building. The renderer swaps
/// the `mouse` sprite for `select` when set.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorHover(pub bool);

/// Drag-box selection in progress, in screen coordinates.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DragSelection {
    pub start: Option<Vector2>,
    pub end: Vector2,
}

impl DragSelection {
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Normalised box between the drag start and the current end.
    pub fn rect(&self) -> Option<Rectangle> {
        let start = self.start?;
        Some(Rectangle::new(
            start.x.min(self.end.x),
            start.y.min(self.end.y),
            (self.end.x - start.x).abs(),
            (self.end.y - start.y).abs(),
        ))
    }
}
