//! Branch prediction unit implementations.
//!
//! This module contains the branch prediction schemes the pipeline can be
//! configured with: static (always-not-taken / always-taken), bimodal,
//! gshare, and tournament. Accuracy counters are part of the predictor
//! interface, so the engine never needs to know which scheme is installed.

/// Bimodal 2-bit saturating-counter predictor.
pub mod bimodal;

/// Global-history (gshare) predictor.
pub mod gshare;

/// Static predictors (always-not-taken, always-taken).
pub mod static_bp;

/// Tournament predictor (bimodal vs gshare with a per-PC selector).
pub mod tournament;

use self::bimodal::BimodalPredictor;
use self::gshare::GSharePredictor;
use self::static_bp::StaticPredictor;
use self::tournament::TournamentPredictor;
use crate::config::{PredictorConfig, PredictorKind};

/// The branch-predictor capability.
///
/// `predict` reports the predicted direction and target for the branch at
/// `pc` whose taken target is `taken_target`; the predicted PC is the taken
/// target when predicting taken, `pc + 4` otherwise. `update` judges the
/// pre-update prediction against the actual outcome (advancing the accuracy
/// counters) and then trains the internal state.
pub trait Predictor {
    /// Predicts the branch at `pc`. Returns `(predict_taken, predicted_pc)`.
    fn predict(&self, pc: u32, taken_target: u32) -> (bool, u32);

    /// Trains the predictor with the actual outcome of the branch at `pc`.
    fn update(&mut self, pc: u32, target: u32, taken: bool);

    /// Restores the initial counter/history state and zeroes accuracy.
    fn reset(&mut self);

    /// Number of predictions judged correct so far.
    fn correct(&self) -> u64;

    /// Number of predictions judged incorrect so far.
    fn incorrect(&self) -> u64;

    /// Total number of judged predictions.
    fn total(&self) -> u64 {
        self.correct() + self.incorrect()
    }

    /// Prediction accuracy in percent (0 when nothing was judged yet).
    fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.correct() as f64 / total as f64 * 100.0
    }

    /// Human-readable scheme name for reports.
    fn name(&self) -> &'static str;
}

/// Enum wrapper for static dispatch of branch predictors.
pub enum PredictorUnit {
    /// Always-not-taken or always-taken.
    Static(StaticPredictor),
    /// 2-bit bimodal.
    Bimodal(BimodalPredictor),
    /// Global-history gshare.
    GShare(GSharePredictor),
    /// Bimodal/gshare tournament.
    Tournament(TournamentPredictor),
}

impl PredictorUnit {
    /// Creates a predictor from configuration.
    pub fn new(config: &PredictorConfig) -> Self {
        match config.kind {
            PredictorKind::AlwaysNotTaken => Self::Static(StaticPredictor::not_taken()),
            PredictorKind::AlwaysTaken => Self::Static(StaticPredictor::taken()),
            PredictorKind::Bimodal => Self::Bimodal(BimodalPredictor::new(config.table_size)),
            PredictorKind::GShare => Self::GShare(GSharePredictor::new(
                config.table_size,
                config.history_bits,
            )),
            PredictorKind::Tournament => Self::Tournament(TournamentPredictor::new(
                config.table_size,
                config.history_bits,
            )),
        }
    }
}

impl Predictor for PredictorUnit {
    #[inline]
    fn predict(&self, pc: u32, taken_target: u32) -> (bool, u32) {
        match self {
            Self::Static(bp) => bp.predict(pc, taken_target),
            Self::Bimodal(bp) => bp.predict(pc, taken_target),
            Self::GShare(bp) => bp.predict(pc, taken_target),
            Self::Tournament(bp) => bp.predict(pc, taken_target),
        }
    }

    #[inline]
    fn update(&mut self, pc: u32, target: u32, taken: bool) {
        match self {
            Self::Static(bp) => bp.update(pc, target, taken),
            Self::Bimodal(bp) => bp.update(pc, target, taken),
            Self::GShare(bp) => bp.update(pc, target, taken),
            Self::Tournament(bp) => bp.update(pc, target, taken),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Static(bp) => bp.reset(),
            Self::Bimodal(bp) => bp.reset(),
            Self::GShare(bp) => bp.reset(),
            Self::Tournament(bp) => bp.reset(),
        }
    }

    fn correct(&self) -> u64 {
        match self {
            Self::Static(bp) => bp.correct(),
            Self::Bimodal(bp) => bp.correct(),
            Self::GShare(bp) => bp.correct(),
            Self::Tournament(bp) => bp.correct(),
        }
    }

    fn incorrect(&self) -> u64 {
        match self {
            Self::Static(bp) => bp.incorrect(),
            Self::Bimodal(bp) => bp.incorrect(),
            Self::GShare(bp) => bp.incorrect(),
            Self::Tournament(bp) => bp.incorrect(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Static(bp) => bp.name(),
            Self::Bimodal(bp) => bp.name(),
            Self::GShare(bp) => bp.name(),
            Self::Tournament(bp) => bp.name(),
        }
    }
}

/// Saturating increment/decrement for a 2-bit counter.
///
/// Counters never leave the range 0..=3.
#[inline]
pub(crate) fn saturate(counter: &mut u8, up: bool) {
    if up {
        if *counter < 3 {
            *counter += 1;
        }
    } else if *counter > 0 {
        *counter -= 1;
    }
}
