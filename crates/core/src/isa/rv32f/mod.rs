//! Single-precision floating-point extension (RV32F) encoding constants.

/// Function codes (funct3 field).
pub mod funct3;

/// Function codes (funct7 field).
pub mod funct7;

/// Major opcodes.
pub mod opcodes;
