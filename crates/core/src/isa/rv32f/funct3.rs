//! RISC-V Single-Precision Floating-Point (F) Function Codes (funct3).

/// Sign injection (copy sign).
pub const FSGNJ: u32 = 0b000;
/// Sign injection (negated sign).
pub const FSGNJN: u32 = 0b001;
/// Sign injection (XORed sign).
pub const FSGNJX: u32 = 0b010;

/// Minimum.
pub const FMIN: u32 = 0b000;
/// Maximum.
pub const FMAX: u32 = 0b001;

/// Equality comparison.
pub const FEQ: u32 = 0b010;
/// Less-than comparison.
pub const FLT: u32 = 0b001;
/// Less-than-or-equal comparison.
pub const FLE: u32 = 0b000;

/// Bit-pattern move to integer register.
pub const FMV_X_W: u32 = 0b000;
/// Classification.
pub const FCLASS: u32 = 0b001;
