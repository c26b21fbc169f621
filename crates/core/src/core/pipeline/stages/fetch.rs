//! Instruction Fetch (IF) Stage.
//!
//! Reads the next instruction from the program image at the current PC,
//! expanding 16-bit compressed encodings to their 32-bit equivalents, and
//! advances the PC by the instruction size. An all-zero fetch or a reserved
//! compressed encoding leaves IF/ID invalid (NOP/end marker) while PC still
//! advances.

use crate::core::pipeline::latches::IfIdEntry;
use crate::core::Cpu;
use crate::isa::rvc;

/// Executes the instruction fetch stage.
pub fn fetch_stage(cpu: &mut Cpu) {
    if cpu.stall_flag {
        if cpu.debug {
            eprintln!("IF : stalled, holding IF/ID");
        }
        return;
    }
    if cpu.flush_flag {
        cpu.if_id = IfIdEntry::default();
        cpu.flush_flag = false;
        if cpu.debug {
            eprintln!("IF : flushed");
        }
        return;
    }
    if cpu.pc >= cpu.max_pc {
        cpu.if_id = IfIdEntry::default();
        return;
    }

    let Some(half) = cpu.fetch_half(cpu.pc) else {
        // Truncated image; step past it so the run can drain.
        cpu.pc = cpu.max_pc;
        cpu.if_id = IfIdEntry::default();
        return;
    };

    if rvc::is_compressed(half) {
        let pc = cpu.pc;
        cpu.pc = cpu.pc.wrapping_add(2);
        let expanded = rvc::expand(half);
        if expanded == 0 {
            cpu.if_id = IfIdEntry::default();
            return;
        }
        cpu.if_id = IfIdEntry {
            valid: true,
            pc,
            raw: expanded,
            is_compressed: true,
            compressed_raw: half,
        };
        if cpu.debug {
            eprintln!("IF : pc={pc:#x} compressed {half:#06x} -> {expanded:#010x}");
        }
        return;
    }

    let Some(word) = cpu.fetch_word(cpu.pc) else {
        cpu.pc = cpu.max_pc;
        cpu.if_id = IfIdEntry::default();
        return;
    };
    let pc = cpu.pc;
    cpu.pc = cpu.pc.wrapping_add(4);
    if word == 0 {
        cpu.if_id = IfIdEntry::default();
        return;
    }
    cpu.if_id = IfIdEntry {
        valid: true,
        pc,
        raw: word,
        is_compressed: false,
        compressed_raw: 0,
    };
    if cpu.debug {
        eprintln!("IF : pc={pc:#x} inst={word:#010x}");
    }
}
