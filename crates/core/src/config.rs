//! Configuration system for the pipeline simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline constants (memory size, predictor tables, cycle budget).
//! 2. **Structures:** Hierarchical config for memory, cache, predictor, and tracing.
//! 3. **Enums:** Cache scheme and branch-predictor selection.
//!
//! Configuration is supplied as JSON (`--config`) or assembled from CLI
//! flags; use `Config::default()` for the baseline machine.

use serde::Deserialize;

/// Default configuration constants for the simulator.
mod defaults {
    /// Data-memory size in bytes (4 KiB).
    pub const MEMORY_SIZE: usize = 4096;

    /// Cache total size in bytes when a cache is enabled.
    pub const CACHE_SIZE: u32 = 256;

    /// Cache line size in bytes.
    pub const CACHE_LINE: u32 = 32;

    /// Predictor counter/selector table entries.
    pub const PREDICTOR_TABLE_SIZE: usize = 2048;

    /// GShare global-history length in bits.
    pub const PREDICTOR_HISTORY_BITS: u32 = 12;

    /// Producer/consumer window for dependency records, in cycles.
    pub const DEPENDENCY_WINDOW: u64 = 10;

    /// Cycle budget for a run.
    pub const MAX_CYCLES: u64 = 10_000;
}

/// Data-cache organisation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheScheme {
    /// No cache; the pipeline talks straight to the backing store.
    #[default]
    None,
    /// Direct-mapped (one way per set).
    DirectMapped,
    /// Fully associative with LRU replacement.
    FullyAssociative,
    /// 2-way set-associative with per-set LRU.
    TwoWay,
    /// 4-way set-associative with per-set LRU.
    FourWay,
    /// 8-way set-associative with per-set LRU.
    EightWay,
}

impl CacheScheme {
    /// Associativity of the scheme, `None` when no cache is configured and
    /// 0 for fully associative (every line in one set).
    pub fn ways(self) -> Option<usize> {
        match self {
            CacheScheme::None => None,
            CacheScheme::DirectMapped => Some(1),
            CacheScheme::FullyAssociative => Some(0),
            CacheScheme::TwoWay => Some(2),
            CacheScheme::FourWay => Some(4),
            CacheScheme::EightWay => Some(8),
        }
    }
}

/// Branch prediction schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictorKind {
    /// Always predict not-taken.
    #[default]
    AlwaysNotTaken,
    /// Always predict taken.
    AlwaysTaken,
    /// 2-bit saturating counter table indexed by PC.
    Bimodal,
    /// Global-history predictor (PC XOR history index).
    GShare,
    /// Bimodal/gshare hybrid with a per-PC selector.
    Tournament,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Data-memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Data-cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Branch-predictor configuration.
    #[serde(default)]
    pub predictor: PredictorConfig,

    /// Trace and run-control configuration.
    #[serde(default)]
    pub trace: TraceConfig,
}

/// Data-memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Backing-store size in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,
}

impl MemoryConfig {
    /// Returns the default backing-store size.
    fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEMORY_SIZE,
        }
    }
}

/// Data-cache configuration.
///
/// `total_size` and `line_size` must be powers of two, and the derived set
/// count must be a power of two as well.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Cache organisation scheme.
    #[serde(default)]
    pub scheme: CacheScheme,

    /// Total cache size in bytes.
    #[serde(default = "CacheConfig::default_total_size")]
    pub total_size: u32,

    /// Line size in bytes.
    #[serde(default = "CacheConfig::default_line_size")]
    pub line_size: u32,
}

impl CacheConfig {
    /// Returns the default total cache size.
    fn default_total_size() -> u32 {
        defaults::CACHE_SIZE
    }

    /// Returns the default cache line size.
    fn default_line_size() -> u32 {
        defaults::CACHE_LINE
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            scheme: CacheScheme::None,
            total_size: defaults::CACHE_SIZE,
            line_size: defaults::CACHE_LINE,
        }
    }
}

/// Branch-predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// Prediction scheme.
    #[serde(default)]
    pub kind: PredictorKind,

    /// Counter/selector table entries (power of two).
    #[serde(default = "PredictorConfig::default_table_size")]
    pub table_size: usize,

    /// Global-history length for gshare/tournament, in bits.
    #[serde(default = "PredictorConfig::default_history_bits")]
    pub history_bits: u32,
}

impl PredictorConfig {
    /// Returns the default predictor table size.
    fn default_table_size() -> usize {
        defaults::PREDICTOR_TABLE_SIZE
    }

    /// Returns the default global-history length.
    fn default_history_bits() -> u32 {
        defaults::PREDICTOR_HISTORY_BITS
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            kind: PredictorKind::AlwaysNotTaken,
            table_size: defaults::PREDICTOR_TABLE_SIZE,
            history_bits: defaults::PREDICTOR_HISTORY_BITS,
        }
    }
}

/// Trace and run-control configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceConfig {
    /// Capture memory/register/dependency logs (snapshots are always kept).
    #[serde(default = "TraceConfig::default_enabled")]
    pub enabled: bool,

    /// Producer/consumer window for dependency records, in cycles.
    #[serde(default = "TraceConfig::default_dependency_window")]
    pub dependency_window: u64,

    /// Cycle budget for a run.
    #[serde(default = "TraceConfig::default_max_cycles")]
    pub max_cycles: u64,
}

impl TraceConfig {
    /// Returns the default trace enablement.
    fn default_enabled() -> bool {
        true
    }

    /// Returns the default dependency window.
    fn default_dependency_window() -> u64 {
        defaults::DEPENDENCY_WINDOW
    }

    /// Returns the default cycle budget.
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dependency_window: defaults::DEPENDENCY_WINDOW,
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}
