//! Pipeline latch structures for inter-stage communication.
//!
//! Each latch carries a `valid` flag plus the information needed by later
//! stages. The engine additionally keeps previous-cycle copies of the
//! EX/MEM and MEM/WB latches; those copies are read only by the Execute
//! stage's forwarding logic and are never mutated during the cycle that
//! reads them.

use crate::core::pipeline::signals::ControlSignals;

/// Entry in the IF/ID pipeline latch (Fetch to Decode).
#[derive(Clone, Default, Debug)]
pub struct IfIdEntry {
    /// Whether the latch holds an instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding (already expanded if compressed).
    pub raw: u32,
    /// Whether the instruction was fetched as a 16-bit compressed encoding.
    pub is_compressed: bool,
    /// Original 16-bit encoding when `is_compressed`.
    pub compressed_raw: u16,
}

/// Entry in the ID/EX pipeline latch (Decode to Execute).
#[derive(Clone, Default, Debug)]
pub struct IdExEntry {
    /// Whether the latch holds an instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding.
    pub inst: u32,
    /// Whether the instruction was fetched compressed.
    pub is_compressed: bool,
    /// Original 16-bit encoding when `is_compressed`.
    pub compressed_raw: u16,
    /// Major opcode.
    pub opcode: u32,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Minor function code.
    pub funct3: u32,
    /// Major function code.
    pub funct7: u32,
    /// Integer value read for `rs1` at decode time.
    pub rs1_data: u32,
    /// Integer value read for `rs2` at decode time.
    pub rs2_data: u32,
    /// Floating-point bits read for `rs1` at decode time.
    pub fp_rs1_data: u32,
    /// Floating-point bits read for `rs2` at decode time.
    pub fp_rs2_data: u32,
    /// Sign-extended immediate (byte offset for control transfers).
    pub imm: i32,
    /// Control signals for downstream stages.
    pub ctrl: ControlSignals,
}

/// Entry in the EX/MEM pipeline latch (Execute to Memory).
#[derive(Clone, Default, Debug)]
pub struct ExMemEntry {
    /// Whether the latch holds an instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding.
    pub inst: u32,
    /// Destination register index.
    pub rd: usize,
    /// Control signals for downstream stages.
    pub ctrl: ControlSignals,
    /// ALU result (also the address for memory operations, and the link
    /// value for jumps).
    pub alu_result: u32,
    /// FPU result bits (for FP register writers).
    pub fp_result: u32,
    /// Forwarded integer `rs2` value (store data).
    pub rs2_data: u32,
    /// Forwarded floating-point `rs2` bits (FSW store data).
    pub fp_rs2_data: u32,
}

/// Entry in the MEM/WB pipeline latch (Memory to Writeback).
#[derive(Clone, Default, Debug)]
pub struct MemWbEntry {
    /// Whether the latch holds an instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding.
    pub inst: u32,
    /// Destination register index.
    pub rd: usize,
    /// Control signals for the writeback stage.
    pub ctrl: ControlSignals,
    /// ALU result (for non-load instructions).
    pub alu_result: u32,
    /// FPU result bits (for FP register writers).
    pub fp_result: u32,
    /// Value loaded from memory (integer loads).
    pub mem_data: u32,
    /// Bits loaded from memory (FLW).
    pub mem_fp_data: u32,
}
