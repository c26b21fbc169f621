//! ISA-level suites.

/// Field extraction and immediate generation.
pub mod decode_properties;


/// Compressed-instruction expansion.
pub mod rvc_expansion;
