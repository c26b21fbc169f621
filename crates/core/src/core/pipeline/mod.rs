//! Instruction pipeline implementation.
//!
//! This module contains the five-stage in-order pipeline. It includes the
//! following components:
//! 1. **Latches:** Inter-stage buffers (IF/ID, ID/EX, EX/MEM, MEM/WB).
//! 2. **Signals:** Control signals generated during instruction decode.
//! 3. **Hazards:** Forwarding selection and load-use detection.
//! 4. **Stages:** Fetch, Decode, Execute, Memory, and Writeback.

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Inter-stage pipeline latches.
pub mod latches;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage implementations.
pub mod stages;
