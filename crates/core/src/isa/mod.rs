//! Instruction-set definitions for the simulated RV32IMFC machine.
//!
//! This module contains everything that depends only on instruction
//! encodings, independent of pipeline state:
//! 1. **Decode:** Field extraction and immediate generation.
//! 2. **Constants:** Opcode and function-code tables for RV32I, M, and F.
//! 3. **Compressed:** Expansion of 16-bit RVC encodings to 32-bit forms.
//! 4. **Disassembly:** Mnemonic rendering for logs and the viewer.

/// ABI register name constants.
pub mod abi;

/// Instruction field extraction and immediate generation.
pub mod decode;

/// Disassembler for log and snapshot rendering.
pub mod disasm;

/// Base integer instruction set constants (RV32I).
pub mod rv32i;

/// Single-precision floating-point extension constants (RV32F).
pub mod rv32f;

/// Multiply/divide extension constants (RV32M).
pub mod rv32m;

/// Compressed instruction extension (RV32C).
pub mod rvc;
