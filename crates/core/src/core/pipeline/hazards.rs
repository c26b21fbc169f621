//! Pipeline hazard detection and forwarding logic.
//!
//! Data hazards are resolved by forwarding from the previous-cycle EX/MEM
//! and MEM/WB snapshots; the one case that cannot be bypassed is a load
//! immediately followed by a consumer of its destination (the load-use
//! hazard), which costs a single bubble.

use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, MemWbEntry};
use crate::core::pipeline::signals::{ControlSignals, OpASrc, OpBSrc};
use crate::isa::decode::Decoded;

/// Selects the integer value for source register `rs`.
///
/// Preference order: previous-cycle EX/MEM if it will write `rs`, then
/// previous-cycle MEM/WB (loaded data when `mem_to_reg`), then the value
/// read from the register file at decode time.
pub fn forward_int(
    rs: usize,
    id_value: u32,
    ex_mem_prev: &ExMemEntry,
    mem_wb_prev: &MemWbEntry,
) -> u32 {
    if ex_mem_prev.valid && ex_mem_prev.ctrl.reg_write && ex_mem_prev.rd != 0 && ex_mem_prev.rd == rs
    {
        return ex_mem_prev.alu_result;
    }
    if mem_wb_prev.valid && mem_wb_prev.ctrl.reg_write && mem_wb_prev.rd != 0 && mem_wb_prev.rd == rs
    {
        return if mem_wb_prev.ctrl.mem_to_reg {
            mem_wb_prev.mem_data
        } else {
            mem_wb_prev.alu_result
        };
    }
    id_value
}

/// Selects the floating-point bits for source register `rs`.
///
/// Same discipline as [`forward_int`], applied to the FP write enable and
/// the FP result / loaded-bits fields.
pub fn forward_fp(
    rs: usize,
    id_value: u32,
    ex_mem_prev: &ExMemEntry,
    mem_wb_prev: &MemWbEntry,
) -> u32 {
    if ex_mem_prev.valid
        && ex_mem_prev.ctrl.fp_reg_write
        && ex_mem_prev.rd != 0
        && ex_mem_prev.rd == rs
    {
        return ex_mem_prev.fp_result;
    }
    if mem_wb_prev.valid
        && mem_wb_prev.ctrl.fp_reg_write
        && mem_wb_prev.rd != 0
        && mem_wb_prev.rd == rs
    {
        return if mem_wb_prev.ctrl.mem_to_reg {
            mem_wb_prev.mem_fp_data
        } else {
            mem_wb_prev.fp_result
        };
    }
    id_value
}

/// Whether the decoded instruction reads integer register `rs1`.
///
/// Derived from the control signals rather than the raw field: LUI, AUIPC,
/// and JAL do not read `rs1`, and FP-sourced operands are not integer reads.
pub fn reads_int_rs1(ctrl: &ControlSignals) -> bool {
    ctrl.a_src == OpASrc::Reg1 && !ctrl.rs1_fp
}

/// Whether the decoded instruction reads integer register `rs2`.
///
/// An I-type immediate aliases the `rs2` field, so the field alone is not
/// evidence of a read; the operand-B selector and the store enable are.
pub fn reads_int_rs2(ctrl: &ControlSignals) -> bool {
    !ctrl.rs2_fp && (ctrl.b_src == OpBSrc::Reg2 || ctrl.mem_write)
}

/// Detects the load-use hazard for the instruction entering ID.
///
/// True when the instruction still sitting in ID/EX at decode time is a
/// load whose destination is actually consumed by the incoming instruction
/// (integer or FP). The decode stage reacts by stalling IF/ID and injecting
/// a bubble into ID/EX.
pub fn load_use_hazard(id_ex: &IdExEntry, d: &Decoded, ctrl: &ControlSignals) -> bool {
    if !id_ex.valid || !id_ex.ctrl.mem_read || id_ex.rd == 0 {
        return false;
    }

    if id_ex.ctrl.reg_write {
        if reads_int_rs1(ctrl) && d.rs1 != 0 && d.rs1 == id_ex.rd {
            return true;
        }
        if reads_int_rs2(ctrl) && d.rs2 != 0 && d.rs2 == id_ex.rd {
            return true;
        }
    }

    if id_ex.ctrl.fp_reg_write {
        if ctrl.rs1_fp && d.rs1 == id_ex.rd {
            return true;
        }
        if ctrl.rs2_fp && d.rs2 == id_ex.rd {
            return true;
        }
    }

    false
}
