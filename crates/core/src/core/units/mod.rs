//! Functional units used by the pipeline stages.

/// Integer arithmetic logic unit.
pub mod alu;

/// Branch prediction unit.
pub mod bru;

/// Data-cache family.
pub mod cache;

/// Single-precision floating-point unit.
pub mod fpu;
