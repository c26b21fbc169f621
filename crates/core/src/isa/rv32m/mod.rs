//! Multiply/divide extension (RV32M) encoding constants.

/// Function codes (funct3 field).
pub mod funct3;

/// Opcode-level markers (funct7 discriminant).
pub mod opcodes;
