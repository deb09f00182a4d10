//! Debug asset viewer state.

use bevy_ecs::prelude::Resource;

use crate::resources::assetstore::AssetStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Sprites,
    Animations,
}

/// Which asset the debug scene shows.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugViewer {
    pub mode: ViewMode,
    pub index: usize,
}

impl DebugViewer {
    fn len(&self, store: &AssetStore) -> usize {
        match self.mode {
            ViewMode::Sprites => store.sprite_count(),
            ViewMode::Animations => store.animation_count(),
        }
    }

    pub fn next(&mut self, store: &AssetStore) {
        let len = self.len(store);
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    pub fn previous(&mut self, store: &AssetStore) {
        let len = self.len(store);
        if len > 0 {
            self.index = (self.index % len + len - 1) % len;
        }
    }

    /// Switch between sprites and animations, starting at the first entry.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ViewMode::Sprites => ViewMode::Animations,
            ViewMode::Animations => ViewMode::Sprites,
        };
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_keeps_index() {
        let store = AssetStore::new();
        let mut viewer = DebugViewer::default();
        viewer.next(&store);
        viewer.previous(&store);
        assert_eq!(viewer.index, 0);
        viewer.index = 3;
        viewer.toggle_mode();
        assert_eq!(viewer.mode, ViewMode::Animations);
        assert_eq!(viewer.index, 0);
    }
}
