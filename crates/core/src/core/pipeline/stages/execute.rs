//! Execute (EX) Stage.
//!
//! Selects operands through the forwarding network, drives the ALU (and the
//! FPU for floating-point operations), resolves jumps and conditional
//! branches, and fills the EX/MEM latch. Forwarding reads only the
//! previous-cycle EX/MEM and MEM/WB snapshots taken at the top of the
//! cycle.

use crate::core::pipeline::hazards::{forward_fp, forward_int};
use crate::core::pipeline::latches::ExMemEntry;
use crate::core::pipeline::signals::{ControlSignals, FpOp, OpASrc, OpBSrc};
use crate::core::units::alu::Alu;
use crate::core::units::fpu::Fpu;
use crate::core::Cpu;
use crate::isa::rv32i::opcodes as i_op;

/// Executes the execute stage.
pub fn execute_stage(cpu: &mut Cpu) {
    if !cpu.id_ex.valid {
        cpu.ex_mem = ExMemEntry::default();
        return;
    }

    let entry = cpu.id_ex.clone();
    let ctrl = entry.ctrl;

    // Forwarded source values. rs2 is forwarded both as an ALU operand and
    // as store data.
    let rs1_fwd = forward_int(entry.rs1, entry.rs1_data, &cpu.ex_mem_prev, &cpu.mem_wb_prev);
    let rs2_fwd = forward_int(entry.rs2, entry.rs2_data, &cpu.ex_mem_prev, &cpu.mem_wb_prev);
    let fp_rs1_fwd = forward_fp(
        entry.rs1,
        entry.fp_rs1_data,
        &cpu.ex_mem_prev,
        &cpu.mem_wb_prev,
    );
    let fp_rs2_fwd = forward_fp(
        entry.rs2,
        entry.fp_rs2_data,
        &cpu.ex_mem_prev,
        &cpu.mem_wb_prev,
    );

    let op_a = match ctrl.a_src {
        OpASrc::Reg1 => rs1_fwd,
        OpASrc::Pc => entry.pc,
        OpASrc::Zero => 0,
    };
    let op_b = match ctrl.b_src {
        OpBSrc::Reg2 => rs2_fwd,
        OpBSrc::Imm => entry.imm as u32,
    };

    let alu_out = Alu::execute(ctrl.alu, op_a, op_b);
    let mut alu_result = alu_out.value;
    let mut fp_result = 0;

    if ctrl.fp_op != FpOp::None {
        let fp_a = if ctrl.rs1_fp { fp_rs1_fwd } else { rs1_fwd };
        let fpu_out = Fpu::execute(ctrl.fp_op, fp_a, fp_rs2_fwd);
        if ctrl.fp_reg_write {
            fp_result = fpu_out;
        } else {
            // Comparisons, classification, conversions to integer, and
            // FMV.X.W land in the integer register file.
            alu_result = fpu_out;
        }
    }

    // Jumps resolve here: write the link value, redirect, and squash the
    // wrong-path fetches.
    if entry.opcode == i_op::OP_JAL || entry.opcode == i_op::OP_JALR {
        let target = if entry.opcode == i_op::OP_JAL {
            entry.pc.wrapping_add(entry.imm as u32)
        } else {
            rs1_fwd.wrapping_add(entry.imm as u32) & !1
        };
        cpu.ex_mem = ExMemEntry {
            valid: true,
            pc: entry.pc,
            inst: entry.inst,
            rd: entry.rd,
            ctrl: ControlSignals {
                reg_write: true,
                ..ControlSignals::default()
            },
            alu_result: entry.pc.wrapping_add(4),
            fp_result: 0,
            rs2_data: 0,
            fp_rs2_data: 0,
        };
        cpu.pc = target;
        cpu.flush_flag = true;
        cpu.flush_this_cycle = true;
        cpu.stats.branch_taken += 1;
        if cpu.debug {
            eprintln!(
                "EX : jump at pc={:#x} target={target:#x} link={:#x}",
                entry.pc,
                entry.pc.wrapping_add(4)
            );
        }
        return;
    }

    // Conditional branches: judge the prediction made at ID.
    if ctrl.branch {
        let should_branch = alu_out.cond;
        let target = entry.pc.wrapping_add(entry.imm as u32);
        cpu.update_predictor(entry.pc, target, should_branch);

        if should_branch {
            cpu.stats.branch_taken += 1;
        } else {
            cpu.stats.branch_not_taken += 1;
        }

        let predicted_taken = cpu.predicted_taken && cpu.branch_pc == entry.pc;
        let prediction_correct = should_branch == predicted_taken
            && (!should_branch || target == cpu.predicted_target);

        if !prediction_correct {
            // Recover: the fall-through of a compressed branch is pc + 2.
            let step = if entry.is_compressed { 2 } else { 4 };
            cpu.pc = if should_branch {
                target
            } else {
                entry.pc.wrapping_add(step)
            };
            cpu.flush_flag = true;
            cpu.flush_this_cycle = true;
            cpu.stats.mispredictions += 1;
            if cpu.debug {
                eprintln!(
                    "EX : mispredicted branch at pc={:#x}, redirecting to {:#x}",
                    entry.pc, cpu.pc
                );
            }
        } else if cpu.debug {
            eprintln!(
                "EX : branch at pc={:#x} predicted correctly ({})",
                entry.pc,
                if should_branch { "taken" } else { "not taken" }
            );
        }
    }

    cpu.ex_mem = ExMemEntry {
        valid: true,
        pc: entry.pc,
        inst: entry.inst,
        rd: entry.rd,
        ctrl,
        alu_result,
        fp_result,
        rs2_data: rs2_fwd,
        fp_rs2_data: fp_rs2_fwd,
    };

    if cpu.debug {
        eprintln!(
            "EX : pc={:#x} a={} b={} result={}",
            entry.pc, op_a as i32, op_b as i32, alu_result as i32
        );
    }
}
