//! Pipeline stage implementations.
//!
//! One module per stage. Stages are free functions over the CPU state and
//! are driven in reverse order (WB, MEM, EX, ID, IF) by the engine's
//! `cycle_step`, so that a value retired in WB is visible to ID's register
//! read within the same cycle and EX sees stable previous-cycle snapshots.

/// Instruction Decode (ID).
pub mod decode;

/// Execute (EX).
pub mod execute;

/// Instruction Fetch (IF).
pub mod fetch;

/// Memory access (MEM).
pub mod memory;

/// Writeback (WB).
pub mod writeback;

pub use decode::decode_stage;
pub use execute::execute_stage;
pub use fetch::fetch_stage;
pub use memory::memory_stage;
pub use writeback::writeback_stage;
