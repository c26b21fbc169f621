//! Static branch predictors.
//!
//! Always-not-taken and always-taken: no internal state beyond the accuracy
//! counters. Correctness is judged directly against the actual outcome.

use super::Predictor;

/// Static predictor with a fixed direction.
pub struct StaticPredictor {
    predict_taken: bool,
    correct: u64,
    incorrect: u64,
}

impl StaticPredictor {
    /// Creates an always-not-taken predictor.
    pub fn not_taken() -> Self {
        Self {
            predict_taken: false,
            correct: 0,
            incorrect: 0,
        }
    }

    /// Creates an always-taken predictor.
    pub fn taken() -> Self {
        Self {
            predict_taken: true,
            correct: 0,
            incorrect: 0,
        }
    }
}

impl Predictor for StaticPredictor {
    fn predict(&self, pc: u32, taken_target: u32) -> (bool, u32) {
        if self.predict_taken {
            (true, taken_target)
        } else {
            (false, pc.wrapping_add(4))
        }
    }

    fn update(&mut self, _pc: u32, _target: u32, taken: bool) {
        if taken == self.predict_taken {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }

    fn reset(&mut self) {
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
        if self.predict_taken {
            "Always Taken"
        } else {
            "Always Not Taken"
        }
    }
}
