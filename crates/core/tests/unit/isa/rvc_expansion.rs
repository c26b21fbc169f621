//! Compressed-instruction expansion.
//!
//! Each recognised RVC encoding must expand to its exactly-equivalent
//! 32-bit instruction; reserved encodings expand to the sentinel word 0.
//! Expansion followed by decode must agree with the direct decode of the
//! corresponding base instruction.

use crate::common::encode::*;
use rv32_core::core::pipeline::stages::decode::control_signals;
use rv32_core::isa::decode::decode;
use rv32_core::isa::rvc::{expand, is_compressed, mnemonic};

#[test]
fn compressed_detection() {
    assert!(is_compressed(0x0001));
    assert!(is_compressed(0x0285));
    assert!(!is_compressed(0x0013)); // low bits 11: 32-bit parcel
}

#[test]
fn expand_c_addi() {
    assert_eq!(expand(c_addi(5, 1)), addi(5, 5, 1));
    assert_eq!(expand(c_addi(10, -3)), addi(10, 10, -3));
    assert_eq!(expand(c_addi(31, -32)), addi(31, 31, -32));
}

#[test]
fn expand_c_li() {
    assert_eq!(expand(c_li(7, 13)), addi(7, 0, 13));
    assert_eq!(expand(c_li(7, -1)), addi(7, 0, -1));
}

#[test]
fn expand_c_lui() {
    // C.LUI t1, 0x5 -> LUI x6, 5
    assert_eq!(expand(c_lui(6, 5)), u_type(0x37, 6, 5));
    // Negative imm[17:12] sign-extends through the upper bits.
    assert_eq!(expand(c_lui(6, 0x3F)), u_type(0x37, 6, 0xFFFFF));
}

#[test]
fn expand_c_addi16sp() {
    assert_eq!(expand(c_addi16sp(16)), addi(2, 2, 16));
    assert_eq!(expand(c_addi16sp(-64)), addi(2, 2, -64));
}

#[test]
fn expand_c_addi4spn() {
    assert_eq!(expand(c_addi4spn(10, 40)), addi(10, 2, 40));
    assert_eq!(expand(c_addi4spn(8, 4)), addi(8, 2, 4));
}

#[test]
fn expand_c_lw_c_sw() {
    assert_eq!(expand(c_lw(9, 10, 16)), lw(9, 10, 16));
    assert_eq!(expand(c_sw(9, 10, 16)), sw(9, 10, 16));
    assert_eq!(expand(c_lw(8, 8, 0)), lw(8, 8, 0));
}

#[test]
fn expand_c_shifts_and_andi() {
    assert_eq!(expand(c_srli(8, 3)), i_type(0x13, 8, 0x5, 8, 3));
    assert_eq!(expand(c_srai(8, 3)), i_type(0x13, 8, 0x5, 8, (0x20 << 5) | 3));
    assert_eq!(expand(c_andi(9, 0xF)), i_type(0x13, 9, 0x7, 9, 0xF));
    assert_eq!(expand(c_andi(9, -2)), i_type(0x13, 9, 0x7, 9, -2));
    assert_eq!(expand(c_slli(5, 4)), i_type(0x13, 5, 0x1, 5, 4));
}

#[test]
fn expand_c_register_alu() {
    assert_eq!(expand(c_sub(8, 9)), r_type(0x33, 8, 0x0, 8, 9, 0x20));
    assert_eq!(expand(c_xor(8, 9)), r_type(0x33, 8, 0x4, 8, 9, 0x00));
    assert_eq!(expand(c_or(8, 9)), r_type(0x33, 8, 0x6, 8, 9, 0x00));
    assert_eq!(expand(c_and(8, 9)), r_type(0x33, 8, 0x7, 8, 9, 0x00));
}

#[test]
fn expand_c_and_known_encoding() {
    // 0x9C89 is C.AND x9, x10.
    assert_eq!(expand(0x9C89), r_type(0x33, 9, 0x7, 9, 10, 0x00));
}

#[test]
fn expand_c_j_and_branches() {
    assert_eq!(expand(c_j(-4)), jal(0, -4));
    assert_eq!(expand(c_j(100)), jal(0, 100));
    assert_eq!(expand(c_beqz(8, 8)), beq(8, 0, 8));
    assert_eq!(expand(c_bnez(9, -6)), bne(9, 0, -6));
}

#[test]
fn expand_c_stack_forms() {
    assert_eq!(expand(c_lwsp(5, 12)), lw(5, 2, 12));
    assert_eq!(expand(c_swsp(5, 12)), sw(5, 2, 12));
    assert_eq!(expand(c_lwsp(1, 252)), lw(1, 2, 252));
}

#[test]
fn expand_c_jumps_and_moves() {
    assert_eq!(expand(c_jr(1)), jalr(0, 1, 0));
    assert_eq!(expand(c_jalr(5)), jalr(1, 5, 0));
    assert_eq!(expand(c_mv(3, 4)), add(3, 0, 4));
    assert_eq!(expand(c_add(3, 4)), r_type(0x33, 3, 0x0, 3, 4, 0x00));
}

#[test]
fn reserved_encodings_expand_to_sentinel() {
    // All-zero parcel (C.ADDI4SPN with zero immediate).
    assert_eq!(expand(0x0000), 0);
    // C.ADDI4SPN with a zero immediate and nonzero rd'.
    assert_eq!(expand(c_addi4spn(8, 0)), 0);
    // C.LUI with rd = 0 or rd = 2-with-zero-imm.
    assert_eq!(expand(c_lui(0, 5)), 0);
    assert_eq!(expand(c_lui(6, 0)), 0);
    // C.SLLI with a zero shift.
    assert_eq!(expand(c_slli(5, 0)), 0);
    // C.JR with rs1 = 0.
    assert_eq!(expand(c_jr(0)), 0);
    // C.JAL slot is unavailable on this machine.
    assert_eq!(expand(0b001_0_0000000000_01), 0);
}

#[test]
fn expansion_then_decode_matches_direct_decode() {
    let pairs: &[(u16, u32)] = &[
        (c_addi(5, 1), addi(5, 5, 1)),
        (c_lw(9, 10, 16), lw(9, 10, 16)),
        (c_sw(9, 10, 16), sw(9, 10, 16)),
        (c_beqz(8, 8), beq(8, 0, 8)),
        (c_mv(3, 4), add(3, 0, 4)),
        (c_jr(1), jalr(0, 1, 0)),
    ];
    for &(compressed, base) in pairs {
        let expanded = expand(compressed);
        assert_eq!(expanded, base);
        let de = decode(expanded);
        let db = decode(base);
        assert_eq!(de.imm, db.imm);
        let ce = control_signals(&de);
        let cb = control_signals(&db);
        assert_eq!(ce.reg_write, cb.reg_write);
        assert_eq!(ce.mem_read, cb.mem_read);
        assert_eq!(ce.mem_write, cb.mem_write);
        assert_eq!(ce.branch, cb.branch);
        assert_eq!(ce.alu, cb.alu);
        assert_eq!(ce.width, cb.width);
    }
}

#[test]
fn mnemonics_name_the_compressed_form() {
    assert_eq!(mnemonic(c_addi(5, 1)), "C.ADDI");
    assert_eq!(mnemonic(c_lw(9, 10, 16)), "C.LW");
    assert_eq!(mnemonic(c_sw(9, 10, 16)), "C.SW");
    assert_eq!(mnemonic(c_mv(3, 4)), "C.MV");
    assert_eq!(mnemonic(c_add(3, 4)), "C.ADD");
    assert_eq!(mnemonic(c_jalr(5)), "C.JALR");
    assert_eq!(mnemonic(c_bnez(9, -6)), "C.BNEZ");
    assert_eq!(mnemonic(c_addi16sp(16)), "C.ADDI16SP");
    assert_eq!(mnemonic(c_lui(6, 5)), "C.LUI");
}

#[test]
fn mnemonic_agrees_with_expand_on_reserved_forms() {
    // Anything that expands to the sentinel names itself C.RESERVED, even
    // when the funct3 slot is assigned (all-zero C.ADDI4SPN, C.LUI rd=0).
    assert_eq!(mnemonic(0x0000), "C.RESERVED");
    assert_eq!(mnemonic(c_addi4spn(8, 0)), "C.RESERVED");
    assert_eq!(mnemonic(c_lui(0, 5)), "C.RESERVED");
    assert_eq!(mnemonic(c_slli(5, 0)), "C.RESERVED");
}
