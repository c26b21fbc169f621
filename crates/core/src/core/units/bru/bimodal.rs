//! Bimodal (2-bit Saturating Counter) Predictor.
//!
//! Uses a table of 2-bit saturating counters indexed by PC.
//! States: 0 (Strongly Not Taken), 1 (Weakly Not Taken),
//!         2 (Weakly Taken), 3 (Strongly Taken).

use super::{saturate, Predictor};

/// Bimodal predictor state.
pub struct BimodalPredictor {
    counters: Vec<u8>,
    correct: u64,
    incorrect: u64,
}

impl BimodalPredictor {
    /// Creates a bimodal predictor with `table_size` counters, all
    /// initialised to 1 ("weakly not taken"). `table_size` must be a power
    /// of two.
    pub fn new(table_size: usize) -> Self {
        Self {
            counters: vec![1; table_size],
            correct: 0,
            incorrect: 0,
        }
    }

    fn index(&self, pc: u32) -> usize {
        (pc as usize >> 2) & (self.counters.len() - 1)
    }

    /// Direction implied by the current counter state, without updating.
    pub(super) fn direction(&self, pc: u32) -> bool {
        self.counters[self.index(pc)] >= 2
    }

    /// Trains the counter for `pc` on the actual outcome.
    pub(super) fn train(&mut self, pc: u32, taken: bool) {
        let idx = self.index(pc);
        saturate(&mut self.counters[idx], taken);
    }
}

impl Predictor for BimodalPredictor {
    fn predict(&self, pc: u32, taken_target: u32) -> (bool, u32) {
        if self.direction(pc) {
            (true, taken_target)
        } else {
            (false, pc.wrapping_add(4))
        }
    }

    fn update(&mut self, pc: u32, _target: u32, taken: bool) {
        // Judge the pre-update prediction, then train.
        if self.direction(pc) == taken {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.train(pc, taken);
    }

    fn reset(&mut self) {
        self.counters.fill(1);
        self.correct = 0;
        self.incorrect = 0;
    }

    fn correct(&self) -> u64 {
        self.correct
    }

    fn incorrect(&self) -> u64 {
        self.incorrect
    }

    fn name(&self) -> &'static str {
        "Bimodal (2-bit)"
    }
}
