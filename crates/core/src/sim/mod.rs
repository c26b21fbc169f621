//! Simulation-level services: program loading.

/// Hex program-image loader.
pub mod loader;

pub use loader::{load_file, parse_hex_image, LoadError};
