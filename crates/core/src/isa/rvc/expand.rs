//! Compressed Instruction Expansion.
//!
//! Provides the `expand` function which converts a 16-bit compressed
//! instruction into its 32-bit uncompressed equivalent, and the quadrant
//! tables needed to name compressed forms in disassembly.

use super::constants::{q0, q1, q2, QUADRANT_0, QUADRANT_1, QUADRANT_2};
use crate::common::sign_extend;
use crate::isa::rv32f::opcodes as f_op;
use crate::isa::rv32i::{funct3, funct7, opcodes};

/// Returns whether a 16-bit fetch parcel is a compressed instruction.
#[inline]
pub fn is_compressed(half: u16) -> bool {
    (half & 0b11) != 0b11
}

/// Encodes a J-type word from a byte offset.
fn jal_word(rd: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 20) & 0x1) << 31
        | ((v >> 1) & 0x3FF) << 21
        | ((v >> 11) & 0x1) << 20
        | ((v >> 12) & 0xFF) << 12
        | rd << 7
        | opcodes::OP_JAL
}

/// Encodes a B-type word from a byte offset.
fn branch_word(f3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 12) & 0x1) << 31
        | ((v >> 5) & 0x3F) << 25
        | rs2 << 20
        | rs1 << 15
        | f3 << 12
        | ((v >> 1) & 0xF) << 8
        | ((v >> 11) & 0x1) << 7
        | opcodes::OP_BRANCH
}

/// Expands a 16-bit RVC instruction into its 32-bit equivalent.
///
/// Reserved or unsupported encodings (zero-immediate C.ADDI4SPN, C.LUI with
/// `rd` in {0, 2}, zero-shift or RV64-only shifts, C.JAL, C.EBREAK) return
/// the sentinel word 0.
pub fn expand(inst: u16) -> u32 {
    let op = inst & 0x3;
    let f3 = (inst >> 13) & 0x7;

    match op {
        QUADRANT_0 => match f3 {
            q0::C_ADDI4SPN => {
                let imm = ((inst >> 6) & 1) << 2
                    | ((inst >> 5) & 1) << 3
                    | ((inst >> 11) & 0x3) << 4
                    | ((inst >> 7) & 0xF) << 6;
                if imm == 0 {
                    return 0;
                }
                let rd = 8 + ((inst >> 2) & 0x7) as u32;
                (imm as u32) << 20
                    | (2 << 15)
                    | (funct3::ADD_SUB << 12)
                    | (rd << 7)
                    | opcodes::OP_IMM
            }
            q0::C_LW | q0::C_FLW => {
                let imm =
                    ((inst >> 6) & 1) << 2 | ((inst >> 10) & 0x7) << 3 | ((inst >> 5) & 1) << 6;
                let rs1 = 8 + ((inst >> 7) & 0x7) as u32;
                let rd = 8 + ((inst >> 2) & 0x7) as u32;
                let opcode = if f3 == q0::C_LW {
                    opcodes::OP_LOAD
                } else {
                    f_op::OP_LOAD_FP
                };
                (imm as u32) << 20 | (rs1 << 15) | (funct3::LW << 12) | (rd << 7) | opcode
            }
            q0::C_SW | q0::C_FSW => {
                let imm =
                    ((inst >> 6) & 1) << 2 | ((inst >> 10) & 0x7) << 3 | ((inst >> 5) & 1) << 6;
                let rs1 = 8 + ((inst >> 7) & 0x7) as u32;
                let rs2 = 8 + ((inst >> 2) & 0x7) as u32;
                let opcode = if f3 == q0::C_SW {
                    opcodes::OP_STORE
                } else {
                    f_op::OP_STORE_FP
                };
                ((imm as u32) >> 5) << 25
                    | (rs2 << 20)
                    | (rs1 << 15)
                    | (funct3::SW << 12)
                    | ((imm as u32) & 0x1F) << 7
                    | opcode
            }
            _ => 0,
        },

        QUADRANT_1 => match f3 {
            q1::C_ADDI => {
                let imm = sign_extend((((inst >> 2) & 0x1F) | ((inst >> 12) & 1) << 5) as i32, 6);
                let rd = ((inst >> 7) & 0x1F) as u32;
                ((imm as u32) & 0xFFF) << 20
                    | (rd << 15)
                    | (funct3::ADD_SUB << 12)
                    | (rd << 7)
                    | opcodes::OP_IMM
            }
            q1::C_JAL => 0,
            q1::C_LI => {
                let imm = sign_extend((((inst >> 2) & 0x1F) | ((inst >> 12) & 1) << 5) as i32, 6);
                let rd = ((inst >> 7) & 0x1F) as u32;
                ((imm as u32) & 0xFFF) << 20 | (funct3::ADD_SUB << 12) | (rd << 7) | opcodes::OP_IMM
            }
            q1::C_LUI_ADDI16SP => {
                let rd = ((inst >> 7) & 0x1F) as u32;
                if rd == 2 {
                    let imm = sign_extend(
                        (((inst >> 12) & 1) << 9
                            | ((inst >> 3) & 0x3) << 7
                            | ((inst >> 5) & 1) << 6
                            | ((inst >> 2) & 1) << 5
                            | ((inst >> 6) & 1) << 4) as i32,
                        10,
                    );
                    if imm == 0 {
                        return 0;
                    }
                    ((imm as u32) & 0xFFF) << 20
                        | (2 << 15)
                        | (funct3::ADD_SUB << 12)
                        | (2 << 7)
                        | opcodes::OP_IMM
                } else if rd == 0 {
                    0
                } else {
                    let imm = sign_extend(
                        (((inst >> 12) & 1) as i32) << 17 | (((inst >> 2) & 0x1F) as i32) << 12,
                        18,
                    );
                    if imm == 0 {
                        return 0;
                    }
                    ((imm as u32) & 0xFFFF_F000) | (rd << 7) | opcodes::OP_LUI
                }
            }
            q1::C_MISC_ALU => {
                let rd = 8 + ((inst >> 7) & 0x7) as u32;
                match (inst >> 10) & 0x3 {
                    0b00 | 0b01 => {
                        // C.SRLI / C.SRAI; shamt[5] and zero shifts are
                        // reserved on RV32.
                        if (inst >> 12) & 1 != 0 {
                            return 0;
                        }
                        let shamt = ((inst >> 2) & 0x1F) as u32;
                        if shamt == 0 {
                            return 0;
                        }
                        let f7 = if (inst >> 10) & 0x3 == 0b01 {
                            funct7::SRA
                        } else {
                            funct7::DEFAULT
                        };
                        (f7 << 25)
                            | (shamt << 20)
                            | (rd << 15)
                            | (funct3::SRL_SRA << 12)
                            | (rd << 7)
                            | opcodes::OP_IMM
                    }
                    0b10 => {
                        let imm =
                            sign_extend((((inst >> 2) & 0x1F) | ((inst >> 12) & 1) << 5) as i32, 6);
                        ((imm as u32) & 0xFFF) << 20
                            | (rd << 15)
                            | (funct3::AND << 12)
                            | (rd << 7)
                            | opcodes::OP_IMM
                    }
                    _ => {
                        if (inst >> 12) & 1 != 0 {
                            return 0;
                        }
                        let rs2 = 8 + ((inst >> 2) & 0x7) as u32;
                        let (f3, f7) = match (inst >> 5) & 0x3 {
                            0b00 => (funct3::ADD_SUB, funct7::SUB),
                            0b01 => (funct3::XOR, funct7::DEFAULT),
                            0b10 => (funct3::OR, funct7::DEFAULT),
                            _ => (funct3::AND, funct7::DEFAULT),
                        };
                        (f7 << 25)
                            | (rs2 << 20)
                            | (rd << 15)
                            | (f3 << 12)
                            | (rd << 7)
                            | opcodes::OP_REG
                    }
                }
            }
            q1::C_J => {
                let imm = sign_extend(
                    (((inst >> 12) & 1) << 11
                        | ((inst >> 11) & 1) << 4
                        | ((inst >> 9) & 0x3) << 8
                        | ((inst >> 8) & 1) << 10
                        | ((inst >> 7) & 1) << 6
                        | ((inst >> 6) & 1) << 7
                        | ((inst >> 3) & 0x7) << 1
                        | ((inst >> 2) & 1) << 5) as i32,
                    12,
                );
                jal_word(0, imm)
            }
            q1::C_BEQZ | q1::C_BNEZ => {
                let imm = sign_extend(
                    (((inst >> 12) & 1) << 8
                        | ((inst >> 10) & 0x3) << 3
                        | ((inst >> 5) & 0x3) << 6
                        | ((inst >> 3) & 0x3) << 1
                        | ((inst >> 2) & 1) << 5) as i32,
                    9,
                );
                let rs1 = 8 + ((inst >> 7) & 0x7) as u32;
                let f3 = if f3 == q1::C_BEQZ {
                    funct3::BEQ
                } else {
                    funct3::BNE
                };
                branch_word(f3, rs1, 0, imm)
            }
            _ => 0,
        },

        QUADRANT_2 => match f3 {
            q2::C_SLLI => {
                let rd = ((inst >> 7) & 0x1F) as u32;
                if (inst >> 12) & 1 != 0 {
                    return 0;
                }
                let shamt = ((inst >> 2) & 0x1F) as u32;
                if shamt == 0 || rd == 0 {
                    return 0;
                }
                (shamt << 20) | (rd << 15) | (funct3::SLL << 12) | (rd << 7) | opcodes::OP_IMM
            }
            q2::C_LWSP | q2::C_FLWSP => {
                let rd = ((inst >> 7) & 0x1F) as u32;
                if f3 == q2::C_LWSP && rd == 0 {
                    return 0;
                }
                let imm = ((inst >> 4) & 0x7) << 2 | ((inst >> 12) & 1) << 5 | ((inst >> 2) & 0x3) << 6;
                let opcode = if f3 == q2::C_LWSP {
                    opcodes::OP_LOAD
                } else {
                    f_op::OP_LOAD_FP
                };
                (imm as u32) << 20 | (2 << 15) | (funct3::LW << 12) | (rd << 7) | opcode
            }
            q2::C_MISC_ALU => {
                let rd = ((inst >> 7) & 0x1F) as u32;
                let rs2 = ((inst >> 2) & 0x1F) as u32;
                if (inst >> 12) & 1 == 0 {
                    if rs2 == 0 {
                        // C.JR
                        if rd == 0 {
                            return 0;
                        }
                        (rd << 15) | opcodes::OP_JALR
                    } else {
                        // C.MV
                        (rs2 << 20) | (funct3::ADD_SUB << 12) | (rd << 7) | opcodes::OP_REG
                    }
                } else if rs2 == 0 {
                    // C.JALR (C.EBREAK when rd is also zero — unsupported)
                    if rd == 0 {
                        return 0;
                    }
                    (rd << 15) | (1 << 7) | opcodes::OP_JALR
                } else {
                    // C.ADD
                    (rs2 << 20) | (rd << 15) | (funct3::ADD_SUB << 12) | (rd << 7) | opcodes::OP_REG
                }
            }
            q2::C_SWSP | q2::C_FSWSP => {
                let rs2 = ((inst >> 2) & 0x1F) as u32;
                let imm = ((inst >> 9) & 0xF) << 2 | ((inst >> 7) & 0x3) << 6;
                let opcode = if f3 == q2::C_SWSP {
                    opcodes::OP_STORE
                } else {
                    f_op::OP_STORE_FP
                };
                ((imm as u32) >> 5) << 25
                    | (rs2 << 20)
                    | (2 << 15)
                    | (funct3::SW << 12)
                    | ((imm as u32) & 0x1F) << 7
                    | opcode
            }
            _ => 0,
        },

        _ => 0,
    }
}

/// Returns the C.-prefixed mnemonic for a compressed encoding.
///
/// Used by the disassembler; any encoding that expands to the sentinel 0
/// (unassigned slots and reserved operand forms alike, e.g. the all-zero
/// C.ADDI4SPN) reports `C.RESERVED`.
pub fn mnemonic(inst: u16) -> &'static str {
    if expand(inst) == 0 {
        return "C.RESERVED";
    }
    let op = inst & 0x3;
    let f3 = (inst >> 13) & 0x7;
    match op {
        QUADRANT_0 => match f3 {
            q0::C_ADDI4SPN => "C.ADDI4SPN",
            q0::C_LW => "C.LW",
            q0::C_FLW => "C.FLW",
            q0::C_SW => "C.SW",
            q0::C_FSW => "C.FSW",
            _ => "C.RESERVED",
        },
        QUADRANT_1 => match f3 {
            q1::C_ADDI => "C.ADDI",
            q1::C_LI => "C.LI",
            q1::C_LUI_ADDI16SP => {
                if (inst >> 7) & 0x1F == 2 {
                    "C.ADDI16SP"
                } else {
                    "C.LUI"
                }
            }
            q1::C_MISC_ALU => match (inst >> 10) & 0x3 {
                0b00 => "C.SRLI",
                0b01 => "C.SRAI",
                0b10 => "C.ANDI",
                _ => match (inst >> 5) & 0x3 {
                    0b00 => "C.SUB",
                    0b01 => "C.XOR",
                    0b10 => "C.OR",
                    _ => "C.AND",
                },
            },
            q1::C_J => "C.J",
            q1::C_BEQZ => "C.BEQZ",
            q1::C_BNEZ => "C.BNEZ",
            _ => "C.RESERVED",
        },
        QUADRANT_2 => match f3 {
            q2::C_SLLI => "C.SLLI",
            q2::C_LWSP => "C.LWSP",
            q2::C_FLWSP => "C.FLWSP",
            q2::C_MISC_ALU => {
                let rs2 = (inst >> 2) & 0x1F;
                if (inst >> 12) & 1 == 0 {
                    if rs2 == 0 {
                        "C.JR"
                    } else {
                        "C.MV"
                    }
                } else if rs2 == 0 {
                    "C.JALR"
                } else {
                    "C.ADD"
                }
            }
            q2::C_SWSP => "C.SWSP",
            q2::C_FSWSP => "C.FSWSP",
            _ => "C.RESERVED",
        },
        _ => "C.RESERVED",
    }
}
