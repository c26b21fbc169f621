//! Forwarding and the load-use stall.

use crate::common::encode::*;
use crate::common::harness::*;
use rv32_core::common::AccessSize;
use rv32_core::config::Config;

#[test]
fn ex_to_ex_forwarding_back_to_back() {
    let cpu = run_words(&[addi(5, 0, 10), add(6, 5, 5)]);
    assert_eq!(cpu.register(6), 20);
    assert_eq!(cpu.stats().stall_cycles, 0);
}

#[test]
fn mem_to_ex_forwarding_one_apart() {
    // One independent instruction between producer and consumer: the value
    // arrives through the previous-cycle MEM/WB snapshot.
    let cpu = run_words(&[addi(5, 0, 10), addi(9, 0, 1), add(6, 5, 5)]);
    assert_eq!(cpu.register(6), 20);
    assert_eq!(cpu.stats().stall_cycles, 0);
}

#[test]
fn newest_producer_wins() {
    // Both in-flight producers write x5; EX must take the newer (EX/MEM)
    // value, not the older (MEM/WB) one.
    let cpu = run_words(&[addi(5, 0, 1), addi(5, 0, 2), add(6, 5, 5)]);
    assert_eq!(cpu.register(6), 4);
}

#[test]
fn store_data_is_forwarded() {
    let program = [
        addi(5, 0, 55),
        sw(5, 0, 20),
        lw(6, 0, 20),
    ];
    let cpu = run_words(&program);
    assert_eq!(cpu.register(6), 55);
}

#[test]
fn load_use_stalls_one_bubble_only() {
    let config = Config::default();
    let mut cpu = cpu_with_image(
        &config,
        image_from_words(&[lw(5, 0, 0), add(6, 5, 5), add(7, 6, 5)]),
    );
    cpu.store_data(0, 21, AccessSize::Word);
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(5), 21);
    assert_eq!(cpu.register(6), 42);
    assert_eq!(cpu.register(7), 63);
    assert_eq!(cpu.stats().stall_cycles, 1);
}

#[test]
fn load_use_on_rs2_stalls() {
    let config = Config::default();
    let mut cpu = cpu_with_image(
        &config,
        image_from_words(&[addi(4, 0, 1), lw(5, 0, 0), add(6, 4, 5)]),
    );
    cpu.store_data(0, 7, AccessSize::Word);
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(6), 8);
    assert_eq!(cpu.stats().stall_cycles, 1);
}

#[test]
fn load_feeding_independent_instruction_does_not_stall() {
    let config = Config::default();
    let mut cpu = cpu_with_image(
        &config,
        image_from_words(&[lw(5, 0, 0), addi(6, 0, 3), add(7, 5, 6)]),
    );
    cpu.store_data(0, 4, AccessSize::Word);
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(7), 7);
    assert_eq!(cpu.stats().stall_cycles, 0);
}

#[test]
fn i_type_immediate_field_does_not_fake_a_hazard() {
    // ADDI's immediate bits alias the rs2 field; an immediate equal to the
    // load destination must not stall.
    let config = Config::default();
    let mut cpu = cpu_with_image(
        &config,
        // LW x5; ADDI x6, x0, 5 — the 5 sits in the rs2 bit positions.
        image_from_words(&[lw(5, 0, 0), addi(6, 0, 5)]),
    );
    cpu.store_data(0, 1, AccessSize::Word);
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(6), 5);
    assert_eq!(cpu.stats().stall_cycles, 0);
}

#[test]
fn load_into_x0_does_not_stall() {
    let config = Config::default();
    let mut cpu = cpu_with_image(
        &config,
        image_from_words(&[lw(0, 0, 0), add(6, 0, 0)]),
    );
    cpu.store_data(0, 99, AccessSize::Word);
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(6), 0);
    assert_eq!(cpu.stats().stall_cycles, 0);
}

#[test]
fn load_use_then_store_chain() {
    // The loaded value is consumed as store data one instruction later.
    let config = Config::default();
    let mut cpu = cpu_with_image(
        &config,
        image_from_words(&[lw(5, 0, 0), sw(5, 0, 8), lw(6, 0, 8)]),
    );
    cpu.store_data(0, 1234, AccessSize::Word);
    cpu.run(TEST_CYCLE_BUDGET);
    assert_eq!(cpu.register(6), 1234);
    assert_eq!(cpu.stats().stall_cycles, 1);
}
