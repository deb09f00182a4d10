//! Wood and gold counters shown on the test map HUD.

use bevy_ecs::prelude::Resource;
use log::info;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stockpile {
    pub wood: i32,
    pub gold: i32,
}

impl Stockpile {
    pub fn add_wood(&mut self, amount: i32) {
        self.wood += amount;
        info!("Added {} wood. Total wood: {}", amount, self.wood);
    }

    pub fn add_gold(&mut self, amount: i32) {
        self.gold += amount;
        info!("Added {} gold. Total gold: {}", amount, self.gold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut stock = Stockpile::default();
        stock.add_wood(5);
        stock.add_wood(3);
        stock.add_gold(-2);
        assert_eq!(stock, Stockpile { wood: 8, gold: -2 });
    }
}
