//! Per-cycle trace capture.
//!
//! Three append-only logs grow during a run until cleared by the host:
//! 1. **Pipeline snapshots:** One record per cycle with the end-of-cycle
//!    state of every latch, for viewers and the `--log` text sink.
//! 2. **Memory accesses:** Every data-memory access with its address,
//!    width, direction, value, and cache-hit attribution.
//! 3. **Register changes:** Every integer register write with old and new
//!    values and the producing PC.
//!
//! Decode additionally emits read-after-write dependency records by
//! consulting the PC-to-destination map maintained at writeback, limited to
//! a configurable producer/consumer cycle window.

use std::collections::HashMap;
use std::fmt;

/// View of one pipeline latch inside a snapshot.
#[derive(Clone, Debug, Default)]
pub struct StageView {
    /// Whether the latch held an instruction at the end of the cycle.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Instruction encoding, when one is latched.
    pub instruction: Option<u32>,
    /// Disassembled mnemonic and operands.
    pub disassembly: String,
    /// Stage datum where meaningful (ALU result, writeback value).
    pub datum: Option<u32>,
}

/// Snapshot of the whole pipeline at the end of one cycle.
#[derive(Clone, Debug, Default)]
pub struct PipelineSnapshot {
    /// Cycle number, starting at 1.
    pub cycle: u64,
    /// Whether a load-use stall occurred during this cycle.
    pub stall: bool,
    /// Whether a control-transfer flush occurred during this cycle.
    pub flush: bool,
    /// IF/ID latch view.
    pub if_id: StageView,
    /// ID/EX latch view.
    pub id_ex: StageView,
    /// EX/MEM latch view.
    pub ex_mem: StageView,
    /// MEM/WB latch view.
    pub mem_wb: StageView,
}

impl fmt::Display for PipelineSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn stage(f: &mut fmt::Formatter<'_>, name: &str, view: &StageView) -> fmt::Result {
            write!(f, "{name}: ")?;
            if !view.valid {
                return writeln!(f, "Empty");
            }
            write!(f, "PC={:#010x}", view.pc)?;
            if let Some(inst) = view.instruction {
                write!(f, ", Inst={inst:#010x}")?;
            }
            if !view.disassembly.is_empty() {
                write!(f, " ({})", view.disassembly)?;
            }
            if let Some(datum) = view.datum {
                write!(f, ", Data={}", datum as i32)?;
            }
            writeln!(f)
        }

        writeln!(f, "=== Cycle {} ===", self.cycle)?;
        stage(f, "IF/ID ", &self.if_id)?;
        stage(f, "ID/EX ", &self.id_ex)?;
        stage(f, "EX/MEM", &self.ex_mem)?;
        stage(f, "MEM/WB", &self.mem_wb)?;
        writeln!(
            f,
            "Control: stall={}, flush={}",
            self.stall, self.flush
        )
    }
}

/// One data-memory access issued by the memory stage.
#[derive(Clone, Debug)]
pub struct MemoryAccess {
    /// Cycle of the access.
    pub cycle: u64,
    /// Byte address.
    pub address: u32,
    /// Access width in bytes.
    pub width: u32,
    /// Whether the access was a store.
    pub is_write: bool,
    /// Value read or written (zero for a failed read).
    pub value: u32,
    /// PC of the instruction performing the access.
    pub pc: u32,
    /// Whether the outermost cache served the access as a hit.
    pub cache_hit: bool,
}

/// One integer register change retired by the writeback stage.
#[derive(Clone, Debug)]
pub struct RegisterChange {
    /// Cycle of the write.
    pub cycle: u64,
    /// Register index.
    pub reg: usize,
    /// Value before the write.
    pub old_value: u32,
    /// Value after the write.
    pub new_value: u32,
    /// PC of the producing instruction.
    pub pc: u32,
}

/// A read-after-write dependency detected at decode time.
#[derive(Clone, Debug)]
pub struct RawDependency {
    /// PC of the producing instruction.
    pub producer_pc: u32,
    /// PC of the consuming instruction.
    pub consumer_pc: u32,
    /// Register carrying the dependency.
    pub reg: usize,
    /// Cycle in which the producer retired.
    pub producer_cycle: u64,
    /// Cycle in which the consumer decoded.
    pub consumer_cycle: u64,
}

/// Container for all trace records of a run.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    /// Per-cycle pipeline snapshots.
    pub pipeline: Vec<PipelineSnapshot>,
    /// Memory-access log.
    pub memory: Vec<MemoryAccess>,
    /// Register-change log.
    pub registers: Vec<RegisterChange>,
    /// Read-after-write dependency records.
    pub dependencies: Vec<RawDependency>,
    /// Retirement cycle of the last instruction at each PC.
    pub pc_to_cycle: HashMap<u32, u64>,
    /// Destination register of the last register-writing instruction at
    /// each PC.
    pub pc_to_rd: HashMap<u32, usize>,
}

impl Trace {
    /// Discards every record and map entry.
    pub fn clear(&mut self) {
        self.pipeline.clear();
        self.memory.clear();
        self.registers.clear();
        self.dependencies.clear();
        self.pc_to_cycle.clear();
        self.pc_to_rd.clear();
    }
}
