//! Instruction disassembler.
//!
//! Converts instruction encodings into the textual form used by the pipeline
//! log, the per-cycle snapshots, and test diagnostics: an upper-case
//! mnemonic followed by ABI register names and signed decimal immediates,
//! e.g. `ADDI t0, zero, 7` or `LW a0, 16(sp)`. A compressed instruction
//! renders as its C.-prefixed form followed by `[expanded: ...]`.

use crate::isa::abi::{freg, xreg};
use crate::isa::decode::{immediate, InstructionBits};
use crate::isa::rv32f::{funct3 as f_f3, funct7 as f_f7, opcodes as f_op};
use crate::isa::rv32i::{funct3 as i_f3, funct7 as i_f7, opcodes as i_op};
use crate::isa::rv32m::{funct3 as m_f3, opcodes as m_op};
use crate::isa::rvc;

/// Disassembles a 32-bit instruction into a human-readable string.
///
/// Unrecognised encodings render as `UNKNOWN`.
pub fn disassemble(inst: u32) -> String {
    let opcode = inst.opcode();
    let rd = inst.rd();
    let rs1 = inst.rs1();
    let rs2 = inst.rs2();
    let f3 = inst.funct3();
    let f7 = inst.funct7();
    let imm = immediate(inst, opcode);

    match opcode {
        i_op::OP_REG => {
            if f7 == m_op::M_EXTENSION {
                let mn = match f3 {
                    m_f3::MUL => "MUL",
                    m_f3::MULH => "MULH",
                    m_f3::MULHSU => "MULHSU",
                    m_f3::MULHU => "MULHU",
                    m_f3::DIV => "DIV",
                    m_f3::DIVU => "DIVU",
                    m_f3::REM => "REM",
                    _ => "REMU",
                };
                format!("{mn} {}, {}, {}", xreg(rd), xreg(rs1), xreg(rs2))
            } else {
                let mn = match f3 {
                    i_f3::ADD_SUB => {
                        if f7 == i_f7::SUB {
                            "SUB"
                        } else {
                            "ADD"
                        }
                    }
                    i_f3::SLL => "SLL",
                    i_f3::SLT => "SLT",
                    i_f3::SLTU => "SLTU",
                    i_f3::XOR => "XOR",
                    i_f3::SRL_SRA => {
                        if f7 == i_f7::SRA {
                            "SRA"
                        } else {
                            "SRL"
                        }
                    }
                    i_f3::OR => "OR",
                    _ => "AND",
                };
                format!("{mn} {}, {}, {}", xreg(rd), xreg(rs1), xreg(rs2))
            }
        }
        i_op::OP_IMM => {
            let mn = match f3 {
                i_f3::ADD_SUB => "ADDI",
                i_f3::SLT => "SLTI",
                i_f3::SLTU => "SLTIU",
                i_f3::XOR => "XORI",
                i_f3::OR => "ORI",
                i_f3::AND => "ANDI",
                i_f3::SLL => "SLLI",
                _ => {
                    if f7 == i_f7::SRA {
                        "SRAI"
                    } else {
                        "SRLI"
                    }
                }
            };
            format!("{mn} {}, {}, {imm}", xreg(rd), xreg(rs1))
        }
        i_op::OP_LOAD => {
            let mn = match f3 {
                i_f3::LB => "LB",
                i_f3::LH => "LH",
                i_f3::LW => "LW",
                i_f3::LBU => "LBU",
                i_f3::LHU => "LHU",
                _ => "LOAD",
            };
            format!("{mn} {}, {imm}({})", xreg(rd), xreg(rs1))
        }
        i_op::OP_STORE => {
            let mn = match f3 {
                i_f3::SB => "SB",
                i_f3::SH => "SH",
                i_f3::SW => "SW",
                _ => "STORE",
            };
            format!("{mn} {}, {imm}({})", xreg(rs2), xreg(rs1))
        }
        i_op::OP_BRANCH => {
            let mn = match f3 {
                i_f3::BEQ | i_f3::BEQ_RESERVED => "BEQ",
                i_f3::BNE => "BNE",
                i_f3::BLT => "BLT",
                i_f3::BGE => "BGE",
                i_f3::BLTU => "BLTU",
                i_f3::BGEU => "BGEU",
                _ => "BRANCH",
            };
            format!("{mn} {}, {}, {imm}", xreg(rs1), xreg(rs2))
        }
        i_op::OP_LUI => format!("LUI {}, {imm}", xreg(rd)),
        i_op::OP_AUIPC => format!("AUIPC {}, {imm}", xreg(rd)),
        i_op::OP_JAL => format!("JAL {}, {imm}", xreg(rd)),
        i_op::OP_JALR => format!("JALR {}, {imm}({})", xreg(rd), xreg(rs1)),
        f_op::OP_LOAD_FP => format!("FLW {}, {imm}({})", freg(rd), xreg(rs1)),
        f_op::OP_STORE_FP => format!("FSW {}, {imm}({})", freg(rs2), xreg(rs1)),
        f_op::OP_FP => disasm_op_fp(inst, rd, rs1, rs2, f3, f7),
        _ => "UNKNOWN".to_string(),
    }
}

/// Disassembles the OP_FP families.
fn disasm_op_fp(_inst: u32, rd: usize, rs1: usize, rs2: usize, f3: u32, f7: u32) -> String {
    match f7 {
        f_f7::FADD => format!("FADD.S {}, {}, {}", freg(rd), freg(rs1), freg(rs2)),
        f_f7::FSUB => format!("FSUB.S {}, {}, {}", freg(rd), freg(rs1), freg(rs2)),
        f_f7::FMUL => format!("FMUL.S {}, {}, {}", freg(rd), freg(rs1), freg(rs2)),
        f_f7::FDIV => format!("FDIV.S {}, {}, {}", freg(rd), freg(rs1), freg(rs2)),
        f_f7::FSQRT => format!("FSQRT.S {}, {}", freg(rd), freg(rs1)),
        f_f7::FSGNJ => {
            let mn = match f3 {
                f_f3::FSGNJ => "FSGNJ.S",
                f_f3::FSGNJN => "FSGNJN.S",
                _ => "FSGNJX.S",
            };
            format!("{mn} {}, {}, {}", freg(rd), freg(rs1), freg(rs2))
        }
        f_f7::FMIN_MAX => {
            let mn = if f3 == f_f3::FMIN { "FMIN.S" } else { "FMAX.S" };
            format!("{mn} {}, {}, {}", freg(rd), freg(rs1), freg(rs2))
        }
        f_f7::FCMP => {
            let mn = match f3 {
                f_f3::FEQ => "FEQ.S",
                f_f3::FLT => "FLT.S",
                _ => "FLE.S",
            };
            format!("{mn} {}, {}, {}", xreg(rd), freg(rs1), freg(rs2))
        }
        f_f7::FCVT_W_S => {
            let mn = if rs2 == 0 { "FCVT.W.S" } else { "FCVT.WU.S" };
            format!("{mn} {}, {}", xreg(rd), freg(rs1))
        }
        f_f7::FCVT_S_W => {
            let mn = if rs2 == 0 { "FCVT.S.W" } else { "FCVT.S.WU" };
            format!("{mn} {}, {}", freg(rd), xreg(rs1))
        }
        f_f7::FCLASS_MV_X_W => {
            let mn = if f3 == f_f3::FCLASS {
                "FCLASS.S"
            } else {
                "FMV.X.W"
            };
            format!("{mn} {}, {}", xreg(rd), freg(rs1))
        }
        f_f7::FMV_W_X => format!("FMV.W.X {}, {}", freg(rd), xreg(rs1)),
        _ => "UNKNOWN".to_string(),
    }
}

/// Disassembles a compressed instruction given its raw 16-bit encoding and
/// the 32-bit word it expanded to.
pub fn disassemble_compressed(raw: u16, expanded: u32) -> String {
    if expanded == 0 {
        return format!("{} [reserved]", rvc::mnemonic(raw));
    }
    format!("{} [expanded: {}]", rvc::mnemonic(raw), disassemble(expanded))
}
