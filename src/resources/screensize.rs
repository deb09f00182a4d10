//! Screen size resource.
//!
//! Stores the current framebuffer dimensions in pixels. The tile world derives
//! its visible cell counts from it and the placement palette anchors to its
//! bottom edge.

use bevy_ecs::prelude::Resource;

/// Current screen size in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}
