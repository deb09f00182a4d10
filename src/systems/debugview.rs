//! Debug scene asset browsing.
use bevy_ecs::prelude::*;

use crate::resources::assetstore::AssetStore;
use crate::resources::debugview::DebugViewer;
use crate::resources::input::InputState;

/// Left / right step through the list, TAB switches between sprites and
/// animations.
pub fn debug_viewer_system(
    input: Res<InputState>,
    store: Res<AssetStore>,
    mut viewer: ResMut<DebugViewer>,
) {
    if input.toggle_view.just_pressed {
        viewer.toggle_mode();
    }
    if input.secondarydirection_right.just_pressed {
        viewer.next(&store);
    }
    if input.secondarydirection_left.just_pressed {
        viewer.previous(&store);
    }
}
