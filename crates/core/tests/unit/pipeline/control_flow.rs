//! Branch prediction, jumps, and flush behaviour.

use crate::common::encode::*;
use crate::common::harness::*;
use rv32_core::config::{Config, PredictorKind};

fn config_with(kind: PredictorKind) -> Config {
    let mut config = Config::default();
    config.predictor.kind = kind;
    config
}

#[test]
fn correctly_predicted_taken_branch_skips_sequential_path() {
    // BEQ x0, x0, +8 is always taken; with an always-taken predictor the
    // fall-through must never retire.
    let program = [
        beq(0, 0, 8),  // 0x0 -> 0x8
        addi(5, 0, 1), // 0x4: wrong path
        addi(6, 0, 2), // 0x8
    ];
    let cpu = run_words_with(&config_with(PredictorKind::AlwaysTaken), &program);
    assert_eq!(cpu.register(5), 0, "wrong-path instruction must not retire");
    assert_eq!(cpu.register(6), 2);
    assert_eq!(cpu.stats().mispredictions, 0);
    assert_eq!(cpu.stats().instructions_retired, 2);
}

#[test]
fn mispredicted_taken_branch_squashes_wrong_path() {
    // Same program under always-not-taken: EX discovers the taken branch
    // and squashes the wrong-path instructions that have not reached MEM.
    let program = [
        beq(0, 0, 8),
        addi(5, 0, 1),
        addi(6, 0, 2),
    ];
    let cpu = run_words_with(&config_with(PredictorKind::AlwaysNotTaken), &program);
    assert_eq!(cpu.register(5), 0);
    assert_eq!(cpu.register(6), 2);
    assert_eq!(cpu.stats().mispredictions, 1);
    assert_eq!(cpu.stats().branch_taken, 1);
}

#[test]
fn not_taken_branch_with_not_taken_predictor_runs_straight_through() {
    let program = [
        bne(0, 0, 8),  // never taken
        addi(5, 0, 1),
        addi(6, 0, 2),
    ];
    let cpu = run_words_with(&config_with(PredictorKind::AlwaysNotTaken), &program);
    assert_eq!(cpu.register(5), 1);
    assert_eq!(cpu.register(6), 2);
    assert_eq!(cpu.stats().mispredictions, 0);
    assert_eq!(cpu.stats().branch_not_taken, 1);
    assert_eq!(cpu.stats().flush_cycles, 0);
}

#[test]
fn not_taken_branch_with_taken_predictor_recovers_to_fall_through() {
    let program = [
        bne(0, 0, 8),  // never taken, but predicted taken
        addi(5, 0, 1),
        addi(6, 0, 2),
    ];
    let cpu = run_words_with(&config_with(PredictorKind::AlwaysTaken), &program);
    // Misprediction recovery re-fetches the fall-through.
    assert_eq!(cpu.register(5), 1);
    assert_eq!(cpu.register(6), 2);
    assert_eq!(cpu.stats().mispredictions, 1);
}

#[test]
fn bimodal_predictor_learns_the_loop_branch() {
    // A four-iteration countdown: the backward branch is taken three
    // times, then falls through. Bimodal warms up after one taken outcome.
    let program = [
        addi(5, 0, 4),
        addi(5, 5, -1),
        bne(5, 0, -4),
    ];
    let cpu = run_words_with(&config_with(PredictorKind::Bimodal), &program);
    assert_eq!(cpu.register(5), 0);
    assert_eq!(cpu.stats().branch_taken, 3);
    assert_eq!(cpu.stats().branch_not_taken, 1);
    // First taken instance mispredicts (counter at 1), the next two hit;
    // the final not-taken instance mispredicts (counter saturated taken).
    assert_eq!(cpu.stats().mispredictions, 2);
}

#[test]
fn jumps_flush_and_count_as_taken() {
    let program = [
        jal(0, 8),     // 0x0 -> 0x8
        addi(5, 0, 1), // skipped
        addi(6, 0, 2),
    ];
    let cpu = run_words(&program);
    assert_eq!(cpu.register(5), 0);
    assert_eq!(cpu.register(6), 2);
    assert_eq!(cpu.stats().branch_taken, 1);
    assert_eq!(cpu.stats().jump_count, 1);
    assert!(cpu.stats().flush_cycles >= 1);
    // Jumps do not touch the conditional-branch predictor.
    use rv32_core::core::units::bru::Predictor;
    assert_eq!(cpu.predictor().total(), 0);
}

#[test]
fn jalr_masks_bit_zero_of_the_target() {
    let program = [
        addi(1, 0, 9),  // odd target address
        jalr(0, 1, 0),  // lands on 8, not 9
        addi(5, 0, 1),  // 0x8: executed after the jump
    ];
    let cpu = run_words(&program);
    assert_eq!(cpu.register(5), 1);
}

#[test]
fn forward_jump_past_the_image_ends_the_run() {
    let program = [
        addi(5, 0, 1),
        jal(0, 100), // far past max_pc
    ];
    let cpu = run_words(&program);
    assert_eq!(cpu.register(5), 1);
    assert!(cpu.pipeline_empty());
}
