//! RISC-V Base Integer (I) Function Codes (funct7).
//!
//! The `funct7` field (bits 31-25) selects between alternate R-type
//! operations sharing the same funct3 (ADD vs SUB, SRL vs SRA).

/// Default encoding (ADD, SLL, SRL, ...).
pub const DEFAULT: u32 = 0b0000000;

/// Subtract (with funct3 ADD_SUB).
pub const SUB: u32 = 0b0100000;

/// Shift Right Arithmetic (with funct3 SRL_SRA).
pub const SRA: u32 = 0b0100000;
