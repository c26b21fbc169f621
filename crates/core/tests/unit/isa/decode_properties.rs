//! Instruction decode properties.
//!
//! Verifies that `decode()` extracts opcode, register fields, function
//! codes, and immediates for every instruction format, and that immediate
//! generation is a pure function of the raw word and opcode.

use crate::common::encode::*;
use rv32_core::isa::decode::{decode, immediate, InstructionBits};

// ── Field extraction ──────────────────────────────────────

#[test]
fn field_extraction_all_ones() {
    let inst: u32 = 0xFFFF_FFFF;
    assert_eq!(inst.opcode(), 0x7F);
    assert_eq!(inst.rd(), 31);
    assert_eq!(inst.funct3(), 7);
    assert_eq!(inst.rs1(), 31);
    assert_eq!(inst.rs2(), 31);
    assert_eq!(inst.funct7(), 0x7F);
}

#[test]
fn field_extraction_all_zeros() {
    let inst: u32 = 0;
    assert_eq!(inst.opcode(), 0);
    assert_eq!(inst.rd(), 0);
    assert_eq!(inst.funct3(), 0);
    assert_eq!(inst.rs1(), 0);
    assert_eq!(inst.rs2(), 0);
    assert_eq!(inst.funct7(), 0);
}

#[test]
fn decode_r_type_fields() {
    let d = decode(r_type(0x33, 5, 0x0, 10, 15, 0x20));
    assert_eq!(d.opcode, 0x33);
    assert_eq!(d.rd, 5);
    assert_eq!(d.rs1, 10);
    assert_eq!(d.rs2, 15);
    assert_eq!(d.funct3, 0);
    assert_eq!(d.funct7, 0x20);
    assert_eq!(d.imm, 0, "R-type has no immediate");
}

// ── Immediates per format ─────────────────────────────────

#[test]
fn i_type_immediate_round_trip_all_values() {
    for raw in -2048i32..=2047 {
        let d = decode(addi(0, 0, raw));
        assert_eq!(d.imm, raw, "I-type round-trip failed for imm={raw}");
    }
}

#[test]
fn s_type_immediate_boundaries() {
    for &val in &[-2048i32, -1, 0, 1, 2047] {
        let d = decode(sw(0, 0, val));
        assert_eq!(d.imm, val, "S-type round-trip failed for imm={val}");
    }
}

#[test]
fn b_type_immediate_even_byte_offsets() {
    for &val in &[-4096i32, -256, -8, 0, 8, 128, 4094] {
        let d = decode(beq(0, 0, val));
        assert_eq!(d.imm, val, "B-type round-trip failed for imm={val}");
        assert_eq!(d.imm & 1, 0, "branch offsets have bit 0 clear");
    }
}

#[test]
fn j_type_immediate_boundaries() {
    for &val in &[-1_048_576i32, -20, 0, 100, 1_048_574] {
        let d = decode(jal(0, val));
        assert_eq!(d.imm, val, "J-type round-trip failed for imm={val}");
    }
}

#[test]
fn u_type_immediate_is_upper_bits() {
    for &imm20 in &[0u32, 1, 0x7FFFF, 0x80000, 0xFFFFF] {
        let d = decode(u_type(0x37, 0, imm20));
        assert_eq!(d.imm, (imm20 << 12) as i32);
    }
}

#[test]
fn jalr_immediate_sign_extends() {
    let d = decode(jalr(0, 1, -4));
    assert_eq!(d.imm, -4);
}

#[test]
fn load_immediate_sign_extends() {
    let d = decode(lw(1, 2, -8));
    assert_eq!(d.imm, -8);
}

#[test]
fn fp_load_store_share_base_formats() {
    assert_eq!(decode(flw(1, 2, 64)).imm, 64);
    assert_eq!(decode(fsw(3, 2, -16)).imm, -16);
}

#[test]
fn shift_immediates_keep_low_five_bits() {
    // SRAI encodes funct7 0x20 in the upper immediate bits; the shift
    // amount is only the low five.
    let srai = i_type(0x13, 1, 0x5, 2, (0x20 << 5) | 13);
    assert_eq!(decode(srai).imm, 13);
    let slli = i_type(0x13, 1, 0x1, 2, 31);
    assert_eq!(decode(slli).imm, 31);
}

#[test]
fn immediate_is_pure_function_of_word_and_opcode() {
    let inst = addi(5, 6, -100);
    assert_eq!(immediate(inst, 0x13), immediate(inst, 0x13));
    let d1 = decode(inst);
    let d2 = decode(inst);
    assert_eq!(d1.imm, d2.imm);
}
