//! Scene state resources.
//!
//! [`CurrentScene`] holds the scene being updated and drawn. Systems request a
//! switch through [`NextScene`]; `crate::events::scene::observe_scene_change_event`
//! applies it and runs [`crate::game::enter_scene`].

use bevy_ecs::prelude::Resource;

/// Top-level modes of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scene {
    #[default]
    MainMenu,
    /// Tile editor: place, erase, save and load map cells.
    TilePlacement,
    /// Playable map with NPCs, buildings and the player square.
    TestMap,
    /// Asset viewer cycling through sprites and animations.
    Debug,
    /// Placeholder that only returns to the menu.
    Networking,
}

impl Scene {
    /// Entries shown by the main menu, in order.
    pub const MENU: [Scene; 4] = [
        Scene::TilePlacement,
        Scene::TestMap,
        Scene::Debug,
        Scene::Networking,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Scene::MainMenu => "Main Menu",
            Scene::TilePlacement => "Tile Placement",
            Scene::TestMap => "Test Map",
            Scene::Debug => "Debug",
            Scene::Networking => "Networking",
        }
    }

    /// Parse a scene name as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "mainmenu" | "menu" => Some(Scene::MainMenu),
            "tileplacement" | "editor" => Some(Scene::TilePlacement),
            "testmap" | "map" => Some(Scene::TestMap),
            "debug" => Some(Scene::Debug),
            "networking" => Some(Scene::Networking),
            _ => None,
        }
    }
}

/// Representation of a requested next scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextScenes {
    #[default]
    Unchanged,
    Pending(Scene),
}

/// Authoritative current scene.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CurrentScene {
    current: Scene,
}

impl CurrentScene {
    pub fn new(scene: Scene) -> Self {
        CurrentScene { current: scene }
    }
    pub fn get(&self) -> Scene {
        self.current
    }
    /// Update the current scene immediately, without running scene entry.
    pub fn set(&mut self, scene: Scene) {
        self.current = scene;
    }
}

/// Intent to switch to another scene.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NextScene {
    next: NextScenes,
}

impl NextScene {
    pub fn new() -> Self {
        NextScene {
            next: NextScenes::Unchanged,
        }
    }

    pub fn get(&self) -> NextScenes {
        self.next
    }

    /// Request a switch to `scene`.
    pub fn set(&mut self, scene: Scene) {
        self.next = NextScenes::Pending(scene);
    }

    pub fn reset(&mut self) {
        self.next = NextScenes::Unchanged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_names() {
        assert_eq!(Scene::from_name("test-map"), Some(Scene::TestMap));
        assert_eq!(Scene::from_name("TilePlacement"), Some(Scene::TilePlacement));
        assert_eq!(Scene::from_name("tile_placement"), Some(Scene::TilePlacement));
        assert_eq!(Scene::from_name("lobby"), None);
    }

    #[test]
    fn next_scene_request_and_reset() {
        let mut next = NextScene::new();
        assert_eq!(next.get(), NextScenes::Unchanged);
        next.set(Scene::Debug);
        assert_eq!(next.get(), NextScenes::Pending(Scene::Debug));
        next.reset();
        assert_eq!(next.get(), NextScenes::Unchanged);
    }
}
