//! Spatial index over occupied lattice coordinates.
//!
//! The [`Octree`] mirrors the key set of a cache's bucket store and answers
//! radius queries without touching the store. Only the owning cache mutates
//! it, so insert/remove are crate-private.
//!
//! # Layout
//!
//! The root covers the whole domain `[0, W) × [0, H) × [0, D)`. Branches
//! bisect every axis at `min + extent / 2`; octant bit 0 selects the upper
//! x half, bit 1 y, bit 2 z. Non-cubic domains simply produce non-cubic
//! (sometimes empty) children.
//!
//! # Module Structure
//!
//! - [`bounds`]: `CellBounds` - half-open integer boxes, sphere tests
//! - [`config`]: `OctreeConfig` - split/merge thresholds
//! - [`node`]: `OctreeNode` - recursive leaf/branch storage

pub mod bounds;
pub mod config;
pub mod node;

// Re-exports
pub use bounds::CellBounds;
pub use config::OctreeConfig;
pub use node::OctreeNode;

use crate::stats::OctreeStatistics;
use crate::types::{Dimensions, LatticeCoord};

/// Octree over a fixed lattice domain.
#[derive(Clone, Debug)]
pub struct Octree {
  root: OctreeNode,
  bounds: CellBounds,
  config: OctreeConfig,
  len: usize,
}

impl Octree {
  pub fn new(dimensions: &Dimensions, config: OctreeConfig) -> Self {
    Self {
      root: OctreeNode::default(),
      bounds: CellBounds::from_dimensions(dimensions),
      config,
      len: 0,
    }
  }

  #[inline]
  pub fn bounds(&self) -> &CellBounds {
    &self.bounds
  }

  #[inline]
  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  /// Indexed coordinates.
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn contains(&self, coord: &LatticeCoord) -> bool {
    self.bounds.contains(coord) && self.root.contains(coord, &self.bounds)
  }

  /// Index `coord`. Returns false if it was already indexed or lies
  /// outside the domain.
  pub(crate) fn insert(&mut self, coord: LatticeCoord) -> bool {
    if self.contains(&coord) || !self.bounds.contains(&coord) {
      return false;
    }
    self.root.insert(coord, &self.bounds, 0, &self.config);
    self.len += 1;
    true
  }

  /// Drop `coord` from the index. Returns false if it was not indexed.
  pub(crate) fn remove(&mut self, coord: &LatticeCoord) -> bool {
    if !self.bounds.contains(coord) {
      return false;
    }
    let removed = self.root.remove(coord, &self.bounds, &self.config);
    if removed {
      self.len -= 1;
    }
    removed
  }

  pub(crate) fn clear(&mut self) {
    self.root = OctreeNode::default();
    self.len = 0;
  }

  /// Replace the index contents with `coords`.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::rebuild"))]
  pub(crate) fn rebuild(&mut self, coords: impl IntoIterator<Item = LatticeCoord>) {
    self.clear();
    for coord in coords {
      self.insert(coord);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
      len = self.len,
      nodes = self.root.node_count(),
      "rebuilt octree"
    );
  }

  /// Coordinates within `radius_sq` (squared distance, inclusive) of
  /// `center`, in no particular order.
  ///
  /// `center` may lie outside the domain.
  pub fn query_range(&self, center: &LatticeCoord, radius_sq: u128) -> Vec<LatticeCoord> {
    let mut out = Vec::new();
    if self.bounds.intersects_sphere(center, radius_sq) {
      self.root.query(center, radius_sq, &self.bounds, &mut out);
    }
    out
  }

  /// Every indexed coordinate, in tree order.
  pub fn coords(&self) -> Vec<LatticeCoord> {
    let mut out = Vec::with_capacity(self.len);
    self.root.collect(&mut out);
    out
  }

  pub fn statistics(&self) -> OctreeStatistics {
    OctreeStatistics {
      node_count: self.root.node_count(),
      leaf_count: self.root.leaf_count(),
      depth: self.root.depth(),
      len: self.len,
    }
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
