//! Memory (MEM) Stage.
//!
//! Performs at most one data-memory access per cycle through the configured
//! data-memory device, samples the cache counters around the access to
//! attribute a hit or miss to it, and fills the MEM/WB latch. Failed
//! accesses never abort the pipeline: a failed load yields zero and a
//! failed store is dropped (both reported through the memory-access log).

use crate::core::pipeline::latches::MemWbEntry;
use crate::core::Cpu;

/// Executes the memory stage.
pub fn memory_stage(cpu: &mut Cpu) {
    if !cpu.ex_mem.valid {
        cpu.mem_wb = MemWbEntry::default();
        return;
    }

    let entry = cpu.ex_mem.clone();
    let ctrl = entry.ctrl;
    let addr = entry.alu_result;
    let mut mem_data = 0;
    let mut mem_fp_data = 0;

    if ctrl.mem_read {
        let before = cpu.cache_sample();
        let value = cpu.read_memory(addr, ctrl.width, ctrl.signed_load);
        cpu.stats.memory_reads += 1;
        let cache_hit = cpu.cache_hit_since(before);

        if ctrl.fp_reg_write {
            mem_fp_data = value;
        } else {
            mem_data = value;
        }
        cpu.log_memory_access(addr, ctrl.width, false, value, entry.pc, cache_hit);
        if cpu.debug {
            eprintln!("MEM: load addr={addr:#x} -> {}", value as i32);
        }
    } else if ctrl.mem_write {
        // FSW stores the FP bit pattern through the integer data path.
        let data = if ctrl.rs2_fp {
            entry.fp_rs2_data
        } else {
            entry.rs2_data
        };
        let before = cpu.cache_sample();
        cpu.write_memory(addr, data, ctrl.width);
        cpu.stats.memory_writes += 1;
        let cache_hit = cpu.cache_hit_since(before);

        cpu.log_memory_access(addr, ctrl.width, true, data, entry.pc, cache_hit);
        if cpu.debug {
            eprintln!("MEM: store addr={addr:#x} <- {}", data as i32);
        }
    }

    cpu.mem_wb = MemWbEntry {
        valid: true,
        pc: entry.pc,
        inst: entry.inst,
        rd: entry.rd,
        ctrl,
        alu_result: entry.alu_result,
        fp_result: entry.fp_result,
        mem_data,
        mem_fp_data,
    };
}
