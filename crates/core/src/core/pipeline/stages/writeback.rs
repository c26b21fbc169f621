//! Writeback (WB) Stage.
//!
//! Retires the instruction in MEM/WB: writes the integer and/or FP register
//! file, records the register change, and maintains the PC-to-cycle and
//! PC-to-destination maps used for dependency tracing. Exactly one
//! instruction retires per cycle in which MEM/WB is valid.

use crate::core::Cpu;
use crate::isa::abi;

/// Executes the writeback stage.
pub fn writeback_stage(cpu: &mut Cpu) {
    if !cpu.mem_wb.valid {
        return;
    }

    let entry = cpu.mem_wb.clone();
    let ctrl = entry.ctrl;

    if ctrl.reg_write && entry.rd != 0 {
        let value = if ctrl.mem_to_reg {
            entry.mem_data
        } else {
            entry.alu_result
        };
        let old = cpu.regs.read(entry.rd);
        cpu.regs.write(entry.rd, value);
        cpu.log_register_change(entry.rd, old, value, entry.pc);
        if cpu.debug {
            eprintln!("WB : {} <- {}", abi::xreg(entry.rd), value as i32);
        }
    }

    if ctrl.fp_reg_write && entry.rd != 0 {
        let value = if ctrl.mem_to_reg {
            entry.mem_fp_data
        } else {
            entry.fp_result
        };
        cpu.regs.write_f(entry.rd, value);
        if cpu.debug {
            eprintln!("WB : {} <- {:#010x}", abi::freg(entry.rd), value);
        }
    }

    // One retirement per valid MEM/WB entry, register-writing or not.
    cpu.stats.instructions_retired += 1;

    cpu.note_retirement(entry.pc, entry.rd, ctrl.reg_write);
}
