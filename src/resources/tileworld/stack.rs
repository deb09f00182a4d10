//! Per-cell tile stack.
//!
//! Each cell of the tile world holds a LIFO stack of placed entries. Capacity
//! follows a doubling policy starting at 4 and never shrinks, so a cell that
//! was once deep keeps its storage for reuse after pops.

use log::error;

/// Capacity of a stack after its first push.
pub const INITIAL_STACK_CAPACITY: usize = 4;

/// One placed entry: an encoded tile index and its collision flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTile {
    pub index: i32,
    pub collidable: bool,
}

impl PlacedTile {
    pub fn new(index: i32, collidable: bool) -> Self {
        Self { index, collidable }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileStack {
    entries: Vec<PlacedTile>,
    capacity: usize,
}

impl TileStack {
    /// Build a stack holding `entries` with the capacity the growth policy
    /// would have reached for that many pushes. An empty list allocates nothing.
    pub fn from_entries(entries: Vec<PlacedTile>) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        let capacity = grown_capacity(entries.len());
        let mut stack = Self {
            entries,
            capacity,
        };
        stack.reserve_to_capacity();
        stack
    }

    /// Append an entry, doubling capacity when full.
    ///
    /// Aborts the process if the allocation fails.
    pub fn push(&mut self, entry: PlacedTile) {
        if self.entries.len() == self.capacity {
            self.capacity = (self.capacity * 2).max(INITIAL_STACK_CAPACITY);
            self.reserve_to_capacity();
        }
        self.entries.push(entry);
    }

    /// Remove the top entry. Capacity is kept.
    pub fn pop_top(&mut self) -> Option<PlacedTile> {
        self.entries.pop()
    }

    pub fn top(&self) -> Option<&PlacedTile> {
        self.entries.last()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries bottom to top.
    pub fn entries(&self) -> &[PlacedTile] {
        &self.entries
    }

    pub fn has_collidable(&self) -> bool {
        self.entries.iter().any(|e| e.collidable)
    }

    fn reserve_to_capacity(&mut self) {
        let additional = self.capacity.saturating_sub(self.entries.len());
        if self.entries.try_reserve_exact(additional).is_err() {
            fatal_alloc("tile stack", self.capacity);
        }
    }
}

/// Smallest value of the sequence 4, 8, 16, ... that holds `count` entries.
pub fn grown_capacity(count: usize) -> usize {
    let mut capacity = INITIAL_STACK_CAPACITY;
    while capacity < count {
        capacity = capacity.saturating_mul(2);
    }
    capacity
}

/// Log and terminate. Used when growing tile storage fails, since a
/// half-grown grid cannot be trusted by later placement or collision queries.
pub(crate) fn fatal_alloc(what: &str, requested: usize) -> ! {
    error!("Out of memory allocating {} ({} entries); aborting", what, requested);
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_doubles_from_four() {
        let mut stack = TileStack::default();
        assert_eq!(stack.capacity(), 0);
        stack.push(PlacedTile::new(1, false));
        assert_eq!(stack.capacity(), 4);
        for i in 0..4 {
            stack.push(PlacedTile::new(i, false));
        }
        assert_eq!(stack.count(), 5);
        assert_eq!(stack.capacity(), 8);
    }

    #[test]
    fn push_pop_keeps_capacity_and_order() {
        let mut stack = TileStack::default();
        for i in 0..9 {
            stack.push(PlacedTile::new(i, i % 2 == 0));
        }
        assert_eq!(stack.capacity(), 16);
        for expected in (0..9).rev() {
            assert_eq!(stack.pop_top().map(|e| e.index), Some(expected));
        }
        assert_eq!(stack.count(), 0);
        assert_eq!(stack.capacity(), 16);
        assert_eq!(stack.pop_top(), None);

        stack.push(PlacedTile::new(42, true));
        assert_eq!(stack.entries(), &[PlacedTile::new(42, true)]);
        assert_eq!(stack.capacity(), 16);
    }

    #[test]
    fn from_entries_follows_growth_policy() {
        assert_eq!(TileStack::from_entries(Vec::new()).capacity(), 0);
        let stack = TileStack::from_entries(vec![PlacedTile::new(0, false); 5]);
        assert_eq!(stack.capacity(), 8);
        assert_eq!(grown_capacity(1), 4);
        assert_eq!(grown_capacity(4), 4);
        assert_eq!(grown_capacity(17), 32);
    }

    #[test]
    fn collidable_scan() {
        let mut stack = TileStack::default();
        assert!(!stack.has_collidable());
        stack.push(PlacedTile::new(3, false));
        stack.push(PlacedTile::new(4, true));
        assert!(stack.has_collidable());
        stack.pop_top();
        assert!(!stack.has_collidable());
    }
}
