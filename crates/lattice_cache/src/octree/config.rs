//! OctreeConfig - split/merge thresholds for the spatial index.

use crate::constants::{DEFAULT_LEAF_CAPACITY, DEFAULT_MAX_DEPTH};
use crate::error::ConfigError;

/// Thresholds for octree subdivision.
///
/// A leaf splits once it holds more than `leaf_capacity` coordinates and
/// sits above `max_depth`. A branch collapses back into a leaf when all of
/// its children are leaves holding `leaf_capacity` coordinates or fewer in
/// total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OctreeConfig {
  /// Coordinates a leaf may hold before it splits.
  pub leaf_capacity: usize,

  /// Deepest level a leaf may be split to (root = 0).
  ///
  /// A `u32` domain bisects down to single cells within 32 levels, so
  /// larger values behave like 32.
  pub max_depth: u32,
}

impl OctreeConfig {
  pub fn with_leaf_capacity(mut self, leaf_capacity: usize) -> Self {
    self.leaf_capacity = leaf_capacity;
    self
  }

  pub fn with_max_depth(mut self, max_depth: u32) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.leaf_capacity == 0 {
      return Err(ConfigError::LeafCapacityZero);
    }
    Ok(())
  }

  /// Depth of a balanced tree holding `entries` coordinates: the smallest
  /// `d` with `leaf_capacity * 8^d >= entries`, capped at `max_depth`.
  pub fn balanced_depth(&self, entries: usize) -> u32 {
    let mut depth = 0;
    let mut capacity = self.leaf_capacity.max(1);
    while capacity < entries && depth < self.max_depth {
      capacity = capacity.saturating_mul(8);
      depth += 1;
    }
    depth
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      leaf_capacity: DEFAULT_LEAF_CAPACITY,
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
