//! Simulation statistics collection and reporting.
//!
//! This module tracks performance counters for the simulator. It provides:
//! 1. **Cycle accounting:** Total cycles, retired instructions, stalls, flushes.
//! 2. **Instruction mix:** Counts by category (R/I/load/store/branch/jump/upper-immediate).
//! 3. **Branch behaviour:** Taken/not-taken outcomes and mispredictions.
//! 4. **Memory:** Reads, writes, and sampled cache hit/miss counters.
//! 5. **Derived metrics:** CPI, cache hit rate, and pipeline utilization.

use crate::isa::rv32f::opcodes as f_op;
use crate::isa::rv32i::opcodes as i_op;

/// Aggregate counters for one simulation run.
#[derive(Clone, Debug, Default)]
pub struct CpuStatistics {
    /// Total simulated cycles.
    pub total_cycles: u64,
    /// Instructions retired in the writeback stage.
    pub instructions_retired: u64,
    /// Instructions accepted by the decode stage.
    pub total_instructions: u64,

    /// Register-register (R-type and FP computational) instructions decoded.
    pub r_type_count: u64,
    /// Immediate-arithmetic instructions decoded.
    pub i_type_count: u64,
    /// Load instructions decoded (integer and FP).
    pub load_count: u64,
    /// Store instructions decoded (integer and FP).
    pub store_count: u64,
    /// Conditional branch instructions decoded.
    pub branch_count: u64,
    /// Jump instructions decoded (JAL, JALR).
    pub jump_count: u64,
    /// Upper-immediate instructions decoded (LUI, AUIPC).
    pub lui_auipc_count: u64,

    /// Cycles in which the pipeline stalled for a load-use hazard.
    pub stall_cycles: u64,
    /// Cycles in which a control-transfer flush occurred.
    pub flush_cycles: u64,

    /// Control transfers that were taken (including jumps).
    pub branch_taken: u64,
    /// Conditional branches that were not taken.
    pub branch_not_taken: u64,
    /// Conditional branches whose prediction was wrong.
    pub mispredictions: u64,

    /// Cache hits sampled from the data-memory device.
    pub cache_hits: u64,
    /// Cache misses sampled from the data-memory device.
    pub cache_misses: u64,
    /// Data-memory read accesses issued by the memory stage.
    pub memory_reads: u64,
    /// Data-memory write accesses issued by the memory stage.
    pub memory_writes: u64,
}

impl CpuStatistics {
    /// Tallies a decoded instruction by opcode category.
    pub fn note_instruction(&mut self, opcode: u32) {
        self.total_instructions += 1;
        match opcode {
            i_op::OP_REG | f_op::OP_FP => self.r_type_count += 1,
            i_op::OP_IMM => self.i_type_count += 1,
            i_op::OP_LOAD | f_op::OP_LOAD_FP => self.load_count += 1,
            i_op::OP_STORE | f_op::OP_STORE_FP => self.store_count += 1,
            i_op::OP_BRANCH => self.branch_count += 1,
            i_op::OP_JAL | i_op::OP_JALR => self.jump_count += 1,
            i_op::OP_LUI | i_op::OP_AUIPC => self.lui_auipc_count += 1,
            _ => {}
        }
    }

    /// Cycles per retired instruction.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            return 0.0;
        }
        self.total_cycles as f64 / self.instructions_retired as f64
    }

    /// Cache hit rate in percent; 0 when no cache access happened.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64 * 100.0
    }

    /// Retired instructions per cycle.
    pub fn utilization(&self) -> f64 {
        if self.total_cycles == 0 {
            return 0.0;
        }
        self.instructions_retired as f64 / self.total_cycles as f64
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!("==========================================================");
        println!("PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("cycles                   {}", self.total_cycles);
        println!("instructions_retired     {}", self.instructions_retired);
        println!("cpi                      {:.4}", self.cpi());
        println!("utilization              {:.4}", self.utilization());
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!("  op.r_type              {}", self.r_type_count);
        println!("  op.i_type              {}", self.i_type_count);
        println!("  op.load                {}", self.load_count);
        println!("  op.store               {}", self.store_count);
        println!("  op.branch              {}", self.branch_count);
        println!("  op.jump                {}", self.jump_count);
        println!("  op.upper_imm           {}", self.lui_auipc_count);
        println!("----------------------------------------------------------");
        println!("CONTROL FLOW");
        println!("  stall_cycles           {}", self.stall_cycles);
        println!("  flush_cycles           {}", self.flush_cycles);
        println!("  branch.taken           {}", self.branch_taken);
        println!("  branch.not_taken       {}", self.branch_not_taken);
        println!("  branch.mispredictions  {}", self.mispredictions);
        println!("----------------------------------------------------------");
        println!("MEMORY");
        println!("  mem.reads              {}", self.memory_reads);
        println!("  mem.writes             {}", self.memory_writes);
        println!("  cache.hits             {}", self.cache_hits);
        println!("  cache.misses           {}", self.cache_misses);
        println!("  cache.hit_rate         {:.2}%", self.cache_hit_rate());
        println!("==========================================================");
    }
}
