//! Error taxonomy for lattice caches.
//!
//! - [`ConfigError`]: rejected at construction, before any cache use.
//! - [`LatticeError::OutOfBounds`], [`LatticeError::InvalidLevel`],
//!   [`LatticeError::InvalidRadius`]: per-call, the call had no side effect.
//! - [`LatticeError::IndexDesync`]: the spatial index and bucket store
//!   disagree. This is a bug, never a transient condition.
//! - [`LatticeError::ResourceExhausted`]: a table allocation failed; the
//!   previous table is still installed.

use thiserror::Error;

use crate::types::{Axis, LatticeCoord};

/// Invalid construction parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("dimension along {axis} must be positive")]
  ZeroDimension { axis: Axis },

  #[error("table size {0} is not a positive power of two")]
  TableSizeNotPowerOfTwo(usize),

  #[error("table size {requested} exceeds the maximum of {max} buckets")]
  TableSizeTooLarge { requested: usize, max: usize },

  #[error("table size {requested} cannot hold {entries} entries under load factor {max_load_factor}")]
  TableTooSmall {
    requested: usize,
    entries: usize,
    max_load_factor: f64,
  },

  #[error("max load factor {0} must lie in (0, 1]")]
  LoadFactorOutOfRange(f64),

  #[error("octree leaf capacity must be at least 1")]
  LeafCapacityZero,

  #[error("a hierarchy needs at least one level")]
  NoLevels,

  #[error("{requested} levels requested, at most {max} are supported")]
  TooManyLevels { requested: u32, max: u32 },
}

/// Errors returned by cache operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error("coordinate {value} on axis {axis} is out of bounds (must be < {bound})")]
  OutOfBounds { axis: Axis, value: u32, bound: u32 },

  #[error("level {level} is out of range (cache has {num_levels} levels)")]
  InvalidLevel { level: u32, num_levels: u32 },

  #[error("radius {0} must be finite and non-negative")]
  InvalidRadius(f64),

  #[error("spatial index returned {coord} but the bucket store has no entry for it")]
  IndexDesync { coord: LatticeCoord },

  #[error("could not allocate a table of {requested} buckets")]
  ResourceExhausted { requested: usize },
}

pub type Result<T> = std::result::Result<T, LatticeError>;
