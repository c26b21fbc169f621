//! Least Recently Used (LRU) replacement order.
//!
//! Maintains one usage stack per set as a list of way indices. When a way is
//! accessed it moves to the front (Most Recently Used position); the back of
//! the list is the eviction victim.

/// Per-set LRU ordering.
pub struct LruList {
    /// One usage stack per set. Index 0 is MRU, the last index is LRU.
    usage: Vec<Vec<usize>>,
}

impl LruList {
    /// Creates LRU state for `sets` sets of `ways` ways each, initially
    /// ordered way 0 (MRU) through way `ways - 1` (LRU).
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut usage = Vec::with_capacity(sets);
        for _ in 0..sets {
            usage.push((0..ways).collect());
        }
        Self { usage }
    }

    /// Moves the accessed `way` to the front of its set's usage stack.
    pub fn touch(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            stack.remove(pos);
        }
        stack.insert(0, way);
    }

    /// Returns the way at the bottom of the usage stack (the LRU victim).
    pub fn victim(&self, set: usize) -> usize {
        *self.usage[set].last().unwrap()
    }

    /// Current MRU-to-LRU ordering of a set.
    pub fn order(&self, set: usize) -> &[usize] {
        &self.usage[set]
    }
}
