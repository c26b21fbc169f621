//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an
//! XOR hash, letting the same branch be predicted differently in different
//! execution contexts. The counter discipline is identical to bimodal; after
//! each correctness check the global history register shifts in the actual
//! outcome bit, masked to the configured history length.

use super::{saturate, Predictor};

/// GShare predictor state.
pub struct GSharePredictor {
    counters: Vec<u8>,
    /// Global history register of the most recent outcomes.
    ghr: u32,
    history_mask: u32,
    correct: u64,
    incorrect: u64,
}

impl GSharePredictor {
    /// Creates a gshare predictor with `table_size` counters (power of two)
    /// and `history_bits` bits of global history.
    pub fn new(table_size: usize, history_bits: u32) -> Self {
        Self {
            counters: vec![1; table_size],
            ghr: 0,
            history_mask: (1u32 << history_bits) - 1,
            correct: 0,
            incorrect: 0,
        }
    }

    fn index(&self, pc: u32) -> usize {
        let mask = self.counters.len() - 1;
        let pc_bits = (pc as usize >> 2) & mask;
        (pc_bits ^ self.ghr as usize) & mask
    }

    /// Direction implied by the current state, without updating.
    pub(super) fn direction(&self, pc: u32) -> bool {
        self.counters[self.index(pc)] >= 2
    }

    /// Trains the indexed counter and shifts the outcome into the history.
    pub(super) fn train(&mut self, pc: u32, taken: bool) {
        let idx = self.index(pc);
        saturate(&mut self.counters[idx], taken);
        self.ghr = ((self.ghr << 1) | taken as u32) & self.history_mask;
    }
}

impl Predictor for GSharePredictor {
    fn predict(&self, pc: u32, taken_target: u32) -> (bool, u32) {
        if self.direction(pc) {
            (true, taken_target)
        } else {
            (false, pc.wrapping_add(4))
        }
    }

    fn update(&mut self, pc: u32, _target: u32, taken: bool) {
        if self.direction(pc) == taken {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.train(pc, taken);
    }

    fn reset(&mut self) {
        self.counters.fill(1);
        self.ghr = 0;
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
        "GShare"
    }
}
