//! Instruction Decode (ID) Stage.
//!
//! This stage performs the following:
//! 1. **Decoding:** Field extraction, immediate generation, and control
//!    signal generation for the instruction in IF/ID.
//! 2. **Load-use detection:** The one hazard forwarding cannot cover; it
//!    stalls IF/ID and injects a bubble into ID/EX.
//! 3. **Branch prediction:** Conditional branches consult the predictor and
//!    may redirect the PC, squashing the wrong-path fetch at the IF boundary.
//! 4. **Register read:** Integer and/or FP operands per the decoded signals.

use log::debug;

use crate::core::pipeline::hazards;
use crate::core::pipeline::latches::IdExEntry;
use crate::core::pipeline::signals::{AluOp, ControlSignals, FpOp, MemWidth, OpASrc, OpBSrc};
use crate::core::Cpu;
use crate::isa::decode::{decode, Decoded};
use crate::isa::rv32f::{funct3 as f_f3, funct7 as f_f7, opcodes as f_op};
use crate::isa::rv32i::{funct3 as i_f3, funct7 as i_f7, opcodes as i_op};
use crate::isa::rv32m::{funct3 as m_f3, opcodes as m_op};
use crate::isa::{abi, disasm};

/// Executes the instruction decode stage.
pub fn decode_stage(cpu: &mut Cpu) {
    if cpu.flush_flag {
        cpu.id_ex = IdExEntry::default();
        cpu.flush_flag = false;
        if cpu.debug {
            eprintln!("ID : flushed");
        }
        return;
    }
    if !cpu.if_id.valid {
        cpu.id_ex = IdExEntry::default();
        return;
    }

    let d = decode(cpu.if_id.raw);
    let ctrl = control_signals(&d);

    // Load-use hazard: the load still in ID/EX feeds this instruction. Hold
    // IF/ID, bubble ID/EX; forwarding covers everything else.
    if hazards::load_use_hazard(&cpu.id_ex, &d, &ctrl) {
        let load_rd = cpu.id_ex.rd;
        cpu.stall_flag = true;
        cpu.stall_this_cycle = true;
        cpu.id_ex = IdExEntry::default();
        if cpu.debug {
            eprintln!("ID : load-use hazard on {}, stalling", abi::xreg(load_rd));
        }
        return;
    }

    cpu.stats.note_instruction(d.opcode);

    // Conditional branches consult the predictor with the would-be taken
    // target. A taken prediction redirects the PC now; the fetch stage
    // squashes the wrong-path instruction at the IF boundary.
    if ctrl.branch {
        let taken_target = cpu.if_id.pc.wrapping_add(d.imm as u32);
        let (taken, predicted_pc) = cpu.predict_branch(cpu.if_id.pc, taken_target);
        cpu.predicted_taken = taken;
        cpu.predicted_target = predicted_pc;
        cpu.branch_pc = cpu.if_id.pc;
        if taken {
            cpu.pc = predicted_pc;
            cpu.flush_flag = true;
            cpu.flush_this_cycle = true;
        }
    }

    let rs1_data = if d.rs1 != 0 { cpu.regs.read(d.rs1) } else { 0 };
    let rs2_data = if d.rs2 != 0 { cpu.regs.read(d.rs2) } else { 0 };
    let fp_rs1_data = if ctrl.rs1_fp { cpu.regs.read_f(d.rs1) } else { 0 };
    let fp_rs2_data = if ctrl.rs2_fp { cpu.regs.read_f(d.rs2) } else { 0 };

    cpu.track_dependencies(&d, &ctrl);

    cpu.id_ex = IdExEntry {
        valid: true,
        pc: cpu.if_id.pc,
        inst: cpu.if_id.raw,
        is_compressed: cpu.if_id.is_compressed,
        compressed_raw: cpu.if_id.compressed_raw,
        opcode: d.opcode,
        rd: d.rd,
        rs1: d.rs1,
        rs2: d.rs2,
        funct3: d.funct3,
        funct7: d.funct7,
        rs1_data,
        rs2_data,
        fp_rs1_data,
        fp_rs2_data,
        imm: d.imm,
        ctrl,
    };

    if cpu.debug {
        eprintln!(
            "ID : pc={:#x} {} rs1_data={} rs2_data={} imm={}",
            cpu.if_id.pc,
            disasm::disassemble(cpu.if_id.raw),
            rs1_data as i32,
            rs2_data as i32,
            d.imm
        );
    }
}

/// Generates the control signals for a decoded instruction.
///
/// Unknown opcodes and unknown funct3/funct7 combinations for a known
/// opcode produce NOP signals (no register write, no memory effect).
pub fn control_signals(d: &Decoded) -> ControlSignals {
    let mut c = ControlSignals::default();
    let nop = ControlSignals::default();

    match d.opcode {
        i_op::OP_LUI => {
            c.reg_write = true;
            c.upper_imm = true;
            c.a_src = OpASrc::Zero;
            c.b_src = OpBSrc::Imm;
        }
        i_op::OP_AUIPC => {
            c.reg_write = true;
            c.upper_imm = true;
            c.a_src = OpASrc::Pc;
            c.b_src = OpBSrc::Imm;
        }
        i_op::OP_JAL => {
            c.reg_write = true;
            c.a_src = OpASrc::Zero;
            c.b_src = OpBSrc::Imm;
        }
        i_op::OP_JALR => {
            c.reg_write = true;
            c.b_src = OpBSrc::Imm;
        }
        i_op::OP_BRANCH => {
            c.branch = true;
            c.alu = match d.funct3 {
                i_f3::BEQ | i_f3::BEQ_RESERVED => AluOp::Beq,
                i_f3::BNE => AluOp::Bne,
                i_f3::BLT => AluOp::Blt,
                i_f3::BGE => AluOp::Bge,
                i_f3::BLTU => AluOp::Bltu,
                i_f3::BGEU => AluOp::Bgeu,
                _ => {
                    debug!("unknown branch funct3 {:#x}, decoding as NOP", d.funct3);
                    return nop;
                }
            };
        }
        i_op::OP_LOAD => {
            c.reg_write = true;
            c.mem_read = true;
            c.mem_to_reg = true;
            c.b_src = OpBSrc::Imm;
            let (width, signed) = match d.funct3 {
                i_f3::LB => (MemWidth::Byte, true),
                i_f3::LBU => (MemWidth::Byte, false),
                i_f3::LH => (MemWidth::Half, true),
                i_f3::LHU => (MemWidth::Half, false),
                i_f3::LW => (MemWidth::Word, true),
                _ => {
                    debug!("unknown load funct3 {:#x}, decoding as NOP", d.funct3);
                    return nop;
                }
            };
            c.width = width;
            c.signed_load = signed;
        }
        i_op::OP_STORE => {
            c.mem_write = true;
            c.b_src = OpBSrc::Imm;
            c.width = match d.funct3 {
                i_f3::SB => MemWidth::Byte,
                i_f3::SH => MemWidth::Half,
                i_f3::SW => MemWidth::Word,
                _ => {
                    debug!("unknown store funct3 {:#x}, decoding as NOP", d.funct3);
                    return nop;
                }
            };
        }
        i_op::OP_IMM => {
            c.reg_write = true;
            c.b_src = OpBSrc::Imm;
            c.alu = match d.funct3 {
                i_f3::ADD_SUB => AluOp::Add,
                i_f3::SLT => AluOp::Slt,
                i_f3::SLTU => AluOp::Sltu,
                i_f3::XOR => AluOp::Xor,
                i_f3::OR => AluOp::Or,
                i_f3::AND => AluOp::And,
                i_f3::SLL if d.funct7 == i_f7::DEFAULT => AluOp::Sll,
                i_f3::SRL_SRA if d.funct7 == i_f7::DEFAULT => AluOp::Srl,
                i_f3::SRL_SRA if d.funct7 == i_f7::SRA => AluOp::Sra,
                _ => {
                    debug!("unknown OP_IMM encoding, decoding as NOP");
                    return nop;
                }
            };
        }
        i_op::OP_REG => {
            c.reg_write = true;
            if d.funct7 == m_op::M_EXTENSION {
                c.alu = match d.funct3 {
                    m_f3::MUL => AluOp::Mul,
                    m_f3::MULH => AluOp::Mulh,
                    m_f3::MULHSU => AluOp::Mulhsu,
                    m_f3::MULHU => AluOp::Mulhu,
                    m_f3::DIV => AluOp::Div,
                    m_f3::DIVU => AluOp::Divu,
                    m_f3::REM => AluOp::Rem,
                    _ => AluOp::Remu,
                };
            } else {
                c.alu = match (d.funct3, d.funct7) {
                    (i_f3::ADD_SUB, i_f7::DEFAULT) => AluOp::Add,
                    (i_f3::ADD_SUB, i_f7::SUB) => AluOp::Sub,
                    (i_f3::SLL, i_f7::DEFAULT) => AluOp::Sll,
                    (i_f3::SLT, i_f7::DEFAULT) => AluOp::Slt,
                    (i_f3::SLTU, i_f7::DEFAULT) => AluOp::Sltu,
                    (i_f3::XOR, i_f7::DEFAULT) => AluOp::Xor,
                    (i_f3::SRL_SRA, i_f7::DEFAULT) => AluOp::Srl,
                    (i_f3::SRL_SRA, i_f7::SRA) => AluOp::Sra,
                    (i_f3::OR, i_f7::DEFAULT) => AluOp::Or,
                    (i_f3::AND, i_f7::DEFAULT) => AluOp::And,
                    _ => {
                        debug!("unknown OP_REG encoding, decoding as NOP");
                        return nop;
                    }
                };
            }
        }
        f_op::OP_LOAD_FP => {
            if d.funct3 != i_f3::LW {
                debug!("unknown FP load width {:#x}, decoding as NOP", d.funct3);
                return nop;
            }
            c.fp_reg_write = true;
            c.mem_read = true;
            c.mem_to_reg = true;
            c.b_src = OpBSrc::Imm;
            c.width = MemWidth::Word;
        }
        f_op::OP_STORE_FP => {
            if d.funct3 != i_f3::SW {
                debug!("unknown FP store width {:#x}, decoding as NOP", d.funct3);
                return nop;
            }
            c.mem_write = true;
            c.rs2_fp = true;
            c.b_src = OpBSrc::Imm;
            c.width = MemWidth::Word;
        }
        f_op::OP_FP => {
            c.rs1_fp = true;
            c.rs2_fp = true;
            c.fp_reg_write = true;
            c.fp_op = match d.funct7 {
                f_f7::FADD => FpOp::Add,
                f_f7::FSUB => FpOp::Sub,
                f_f7::FMUL => FpOp::Mul,
                f_f7::FDIV => FpOp::Div,
                f_f7::FSQRT => {
                    // rs2 is a fixed zero field, not a source.
                    c.rs2_fp = false;
                    FpOp::Sqrt
                }
                f_f7::FSGNJ => match d.funct3 {
                    f_f3::FSGNJ => FpOp::SgnJ,
                    f_f3::FSGNJN => FpOp::SgnJN,
                    f_f3::FSGNJX => FpOp::SgnJX,
                    _ => return nop,
                },
                f_f7::FMIN_MAX => match d.funct3 {
                    f_f3::FMIN => FpOp::Min,
                    f_f3::FMAX => FpOp::Max,
                    _ => return nop,
                },
                f_f7::FCMP => {
                    c.fp_reg_write = false;
                    c.reg_write = true;
                    match d.funct3 {
                        f_f3::FEQ => FpOp::Eq,
                        f_f3::FLT => FpOp::Lt,
                        f_f3::FLE => FpOp::Le,
                        _ => return nop,
                    }
                }
                f_f7::FCVT_W_S => {
                    // rs2 selects the signed/unsigned variant.
                    c.fp_reg_write = false;
                    c.reg_write = true;
                    c.rs2_fp = false;
                    match d.rs2 {
                        0 => FpOp::CvtWS,
                        1 => FpOp::CvtWuS,
                        _ => return nop,
                    }
                }
                f_f7::FCVT_S_W => {
                    c.rs1_fp = false;
                    c.rs2_fp = false;
                    match d.rs2 {
                        0 => FpOp::CvtSW,
                        1 => FpOp::CvtSWu,
                        _ => return nop,
                    }
                }
                f_f7::FCLASS_MV_X_W => {
                    c.fp_reg_write = false;
                    c.reg_write = true;
                    c.rs2_fp = false;
                    match d.funct3 {
                        f_f3::FMV_X_W => FpOp::MvXW,
                        f_f3::FCLASS => FpOp::Class,
                        _ => return nop,
                    }
                }
                f_f7::FMV_W_X => {
                    c.rs1_fp = false;
                    c.rs2_fp = false;
                    FpOp::MvWX
                }
                _ => {
                    debug!("unknown OP_FP funct7 {:#x}, decoding as NOP", d.funct7);
                    return nop;
                }
            };
        }
        _ => {
            debug!("unknown opcode {:#x}, decoding as NOP", d.opcode);
            return nop;
        }
    }
    c
}
