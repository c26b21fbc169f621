//! Tournament Branch Predictor.
//!
//! A hybrid of the bimodal and gshare predictors with a 2-bit selector table
//! indexed by PC: selector states 0-1 prefer bimodal, 2-3 prefer gshare.
//! The selector starts at 1 ("weakly bimodal"). Accuracy counts only the
//! prediction actually used.

use super::bimodal::BimodalPredictor;
use super::gshare::GSharePredictor;
use super::Predictor;

/// Tournament predictor state.
pub struct TournamentPredictor {
    bimodal: BimodalPredictor,
    gshare: GSharePredictor,
    /// 2-bit selectors: 0-1 prefer bimodal, 2-3 prefer gshare.
    selectors: Vec<u8>,
    correct: u64,
    incorrect: u64,
}

impl TournamentPredictor {
    /// Creates a tournament predictor; both sub-predictors use `table_size`
    /// entries, gshare with `history_bits` bits of history.
    pub fn new(table_size: usize, history_bits: u32) -> Self {
        Self {
            bimodal: BimodalPredictor::new(table_size),
            gshare: GSharePredictor::new(table_size, history_bits),
            selectors: vec![1; table_size],
            correct: 0,
            incorrect: 0,
        }
    }

    fn index(&self, pc: u32) -> usize {
        (pc as usize >> 2) & (self.selectors.len() - 1)
    }

    fn use_gshare(&self, pc: u32) -> bool {
        self.selectors[self.index(pc)] >= 2
    }
}

impl Predictor for TournamentPredictor {
    fn predict(&self, pc: u32, taken_target: u32) -> (bool, u32) {
        // Query both sub-predictors without updating them; the selector
        // chooses which prediction is reported.
        let taken = if self.use_gshare(pc) {
            self.gshare.direction(pc)
        } else {
            self.bimodal.direction(pc)
        };
        if taken {
            (true, taken_target)
        } else {
            (false, pc.wrapping_add(4))
        }
    }

    fn update(&mut self, pc: u32, _target: u32, taken: bool) {
        // Both sub-predictions, still pre-update.
        let bimodal_pred = self.bimodal.direction(pc);
        let gshare_pred = self.gshare.direction(pc);
        let used_pred = if self.use_gshare(pc) {
            gshare_pred
        } else {
            bimodal_pred
        };

        self.bimodal.train(pc, taken);
        self.gshare.train(pc, taken);

        // Move the selector one step toward the sub-predictor that was
        // right, only when exactly one of them was.
        let bimodal_correct = bimodal_pred == taken;
        let gshare_correct = gshare_pred == taken;
        let idx = self.index(pc);
        if bimodal_correct && !gshare_correct {
            if self.selectors[idx] > 0 {
                self.selectors[idx] -= 1;
            }
        } else if gshare_correct && !bimodal_correct && self.selectors[idx] < 3 {
            self.selectors[idx] += 1;
        }

        if used_pred == taken {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }

    fn reset(&mut self) {
        self.bimodal.reset();
        self.gshare.reset();
        self.selectors.fill(1);
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
        "Tournament"
    }
}
