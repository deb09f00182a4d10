//! Main menu selection.

use bevy_ecs::prelude::Resource;

use crate::resources::gamestate::Scene;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MainMenu {
    /// Index into [`Scene::MENU`].
    pub selected: usize,
}

impl MainMenu {
    pub fn down(&mut self) {
        self.selected = (self.selected + 1) % Scene::MENU.len();
    }

    pub fn up(&mut self) {
        self.selected = (self.selected + Scene::MENU.len() - 1) % Scene::MENU.len();
    }

    pub fn selected_scene(&self) -> Scene {
        Scene::MENU[self.selected % Scene::MENU.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_both_ways() {
        let mut menu = MainMenu::default();
        menu.up();
        assert_eq!(menu.selected_scene(), Scene::Networking);
        menu.down();
        assert_eq!(menu.selected_scene(), Scene::TilePlacement);
    }
}
