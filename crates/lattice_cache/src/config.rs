//! Construction parameters for lattice caches.

use crate::constants::{DEFAULT_MAX_LOAD_FACTOR, DEFAULT_TABLE_SIZE, MAX_LEVELS};
use crate::error::ConfigError;
use crate::octree::OctreeConfig;
use crate::table::{validate_load_factor, validate_table_size};
use crate::types::Dimensions;

/// Configuration for a [`LatticeCache`](crate::LatticeCache).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeCacheConfig {
  /// Coordinate domain; every axis must be positive.
  pub dimensions: Dimensions,

  /// Initial bucket count; a power of two.
  #[cfg_attr(feature = "serde", serde(default = "default_initial_size"))]
  pub initial_size: usize,

  /// Load factor bound in `(0, 1]`.
  #[cfg_attr(feature = "serde", serde(default = "default_max_load_factor"))]
  pub max_load_factor: f64,

  /// Maintain a spatial index for range queries. Without it `get_range`
  /// scans every entry.
  #[cfg_attr(feature = "serde", serde(default = "default_use_octree"))]
  pub use_octree: bool,

  #[cfg_attr(feature = "serde", serde(default))]
  pub octree: OctreeConfig,
}

#[cfg(feature = "serde")]
fn default_initial_size() -> usize {
  DEFAULT_TABLE_SIZE
}

#[cfg(feature = "serde")]
fn default_max_load_factor() -> f64 {
  DEFAULT_MAX_LOAD_FACTOR
}

#[cfg(feature = "serde")]
fn default_use_octree() -> bool {
  true
}

impl LatticeCacheConfig {
  /// Defaults for the given domain: 1024 buckets, load factor 0.75,
  /// octree enabled.
  pub fn new(dimensions: Dimensions) -> Self {
    Self {
      dimensions,
      initial_size: DEFAULT_TABLE_SIZE,
      max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
      use_octree: true,
      octree: OctreeConfig::default(),
    }
  }

  pub fn with_initial_size(mut self, initial_size: usize) -> Self {
    self.initial_size = initial_size;
    self
  }

  pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
    self.max_load_factor = max_load_factor;
    self
  }

  pub fn with_octree(mut self, use_octree: bool) -> Self {
    self.use_octree = use_octree;
    self
  }

  pub fn with_octree_config(mut self, octree: OctreeConfig) -> Self {
    self.octree = octree;
    self
  }

  /// Check every parameter, reporting the first problem.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if let Some(axis) = self.dimensions.zero_axis() {
      return Err(ConfigError::ZeroDimension { axis });
    }
    validate_table_size(self.initial_size)?;
    validate_load_factor(self.max_load_factor)?;
    if self.use_octree {
      self.octree.validate()?;
    }
    Ok(())
  }
}

/// Configuration for a [`HierarchicalLatticeCache`](crate::HierarchicalLatticeCache).
///
/// Every level shares `base`'s table and octree settings; only the
/// dimensions shrink.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HierarchyConfig {
  pub base: LatticeCacheConfig,
  pub num_levels: u32,
}

impl HierarchyConfig {
  pub fn new(dimensions: Dimensions, num_levels: u32) -> Self {
    Self {
      base: LatticeCacheConfig::new(dimensions),
      num_levels,
    }
  }

  pub fn with_base(mut self, base: LatticeCacheConfig) -> Self {
    self.base = base;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.num_levels == 0 {
      return Err(ConfigError::NoLevels);
    }
    if self.num_levels > MAX_LEVELS {
      return Err(ConfigError::TooManyLevels {
        requested: self.num_levels,
        max: MAX_LEVELS,
      });
    }
    self.base.validate()
  }

  /// Configuration of the cache at `level`.
  pub fn level(&self, level: u32) -> LatticeCacheConfig {
    LatticeCacheConfig {
      dimensions: self.base.dimensions.scaled_down(level),
      ..self.base
    }
  }
}
