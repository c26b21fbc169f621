//! Compressed-instruction execution equivalence.
//!
//! A compressed instruction must leave the same architectural state as its
//! 32-bit expansion, with the PC advanced by 2 instead of 4.

use crate::common::encode::*;
use crate::common::harness::*;
use rv32_core::common::AccessSize;
use rv32_core::config::Config;

/// Runs a single compressed instruction and its expansion side by side and
/// compares the named integer register.
fn assert_equivalent(compressed: u16, wide: u32, reg: usize) {
    let c = run_halves(&[compressed]);
    let w = run_words(&[wide]);
    assert_eq!(
        c.register(reg),
        w.register(reg),
        "architectural state diverged for {compressed:#06x}"
    );
    assert_eq!(c.pc(), 2);
    assert_eq!(w.pc(), 4);
}

#[test]
fn c_li_matches_addi() {
    assert_equivalent(c_li(5, 13), addi(5, 0, 13), 5);
}

#[test]
fn c_lui_matches_lui() {
    assert_equivalent(c_lui(6, 5), u_type(0x37, 6, 5), 6);
}

#[test]
fn c_addi16sp_matches_addi() {
    assert_equivalent(c_addi16sp(32), addi(2, 2, 32), 2);
}

#[test]
fn compressed_loads_and_stores_execute() {
    // C.LI x8, 3; C.SW x8, 4(x8)... keep it simple: store then reload via
    // the stack-pointer forms with sp = 0.
    let mut cpu = cpu_with_image(
        &Config::default(),
        image_from_halves(&[c_li(9, 42), c_swsp(9, 8), c_lwsp(10, 8)]),
    );
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(10), 42);
    assert_eq!(cpu.stats().memory_writes, 1);
    assert_eq!(cpu.stats().memory_reads, 1);
}

#[test]
fn compressed_load_use_stalls_like_wide() {
    let config = Config::default();
    let mut cpu = cpu_with_image(
        &config,
        image_from_halves(&[c_lwsp(9, 0), c_add(10, 9)]),
    );
    cpu.store_data(0, 6, AccessSize::Word);
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(10), 6);
    assert_eq!(cpu.stats().stall_cycles, 1);
}

#[test]
fn compressed_branch_recovers_to_pc_plus_two() {
    // C.BNEZ with a not-taken outcome under an always-taken predictor: the
    // recovery PC is the branch PC + 2, so the next compressed instruction
    // still executes.
    let mut config = Config::default();
    config.predictor.kind = rv32_core::config::PredictorKind::AlwaysTaken;
    let program = [
        c_bnez(8, 6),  // 0x0: x8 == 0, never taken
        c_li(9, 1),    // 0x2: fall-through must execute
        c_li(10, 2),   // 0x4
    ];
    let cpu = {
        let mut cpu = cpu_with_image(&config, image_from_halves(&program));
        cpu.run(TEST_CYCLE_BUDGET);
        cpu
    };
    assert_eq!(cpu.register(9), 1);
    assert_eq!(cpu.register(10), 2);
    assert_eq!(cpu.stats().mispredictions, 1);
}

#[test]
fn compressed_jump_and_link() {
    // C.JAL is unavailable; the call goes through C.JALR. x1 receives the
    // 32-bit link convention (pc + 4).
    let program = [
        c_li(5, 12),  // 0x0: target address
        c_jalr(5),    // 0x2: jump to 12, link in x1
        c_li(9, 1),   // 0x4: fall-through path, squashed
        c_li(10, 2),  // 0x6: fall-through path, never fetched
        0x0000,       // 0x8: end marker
        0x0000,       // 0xA
        c_li(11, 3),  // 0xC: jump target
    ];
    let mut cpu = cpu_with_image(&Config::default(), image_from_halves(&program));
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(11), 3);
    assert_eq!(cpu.register(1), 2 + 4, "link is pc + 4");
    assert_eq!(cpu.register(9), 0);
    assert_eq!(cpu.register(10), 0);
}

#[test]
fn compressed_backward_jump_loop_terminates() {
    // C.LI x8, 2; loop: C.ADDI x8, -1; C.BNEZ x8, -2.
    let program = [
        c_li(8, 2),
        c_addi(8, -1),
        c_bnez(8, -2),
    ];
    let mut cpu = cpu_with_image(&Config::default(), image_from_halves(&program));
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(8), 0);
    assert_eq!(cpu.stats().branch_taken, 1);
    assert_eq!(cpu.stats().branch_not_taken, 1);
}

#[test]
fn mixed_width_program() {
    // A 32-bit ADDI followed by compressed C.ADDI parcels.
    let mut image = image_from_words(&[addi(5, 0, 1)]);
    image.extend(image_from_halves(&[c_addi(5, 2), c_addi(5, 3)]));
    let mut cpu = cpu_with_image(&Config::default(), image);
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(5), 6);
    assert_eq!(cpu.pc(), 8);
}
