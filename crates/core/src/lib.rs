//! Cycle-accurate RV32 pipeline simulator library.
//!
//! This crate implements a cycle-accurate simulator for the RV32IMFC subset
//! with the following:
//! 1. **Core:** Five-stage in-order pipeline (fetch, decode, execute, memory,
//!    writeback) with forwarding, load-use stalling, and branch prediction.
//! 2. **Memory:** A data-memory capability implemented by a flat backing
//!    store and a family of write-through caches layered over it.
//! 3. **ISA:** Field extraction, immediate generation, compressed (RVC)
//!    expansion, and disassembly for RV32I/M/F.
//! 4. **Simulation:** Configuration, statistics collection, and per-cycle
//!    trace capture for external viewers and log sinks.

/// Common types and helpers (access sizes, little-endian packing, sign extension).
pub mod common;
/// Simulator configuration (defaults, scheme enums, hierarchical config structures).
pub mod config;
/// CPU core (register files, pipeline, ALU, FPU, cache, branch prediction).
pub mod core;
/// Instruction set (decode, ABI, RV32I/M/F constants, RVC expansion, disassembly).
pub mod isa;
/// Data-memory capability and the flat backing store.
pub mod mem;
/// Program-image loading.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Per-cycle pipeline snapshots, memory/register logs, and dependency records.
pub mod trace;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; owns the pipeline, data memory, predictor, stats, and trace.
pub use crate::core::Cpu;
