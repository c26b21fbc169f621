//! RISC-V Single-Precision Floating-Point (F) Opcodes.

/// Floating-point load (FLW).
pub const OP_LOAD_FP: u32 = 0b0000111;

/// Floating-point store (FSW).
pub const OP_STORE_FP: u32 = 0b0100111;

/// Floating-point computational and move instructions.
pub const OP_FP: u32 = 0b1010011;
