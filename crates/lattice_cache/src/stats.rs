//! Read-only statistics snapshots.

/// Spatial index shape at observation time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctreeStatistics {
  /// Branches plus leaves.
  pub node_count: usize,
  pub leaf_count: usize,
  /// Levels below the root (0 for a single leaf).
  pub depth: u32,
  /// Indexed coordinates.
  pub len: usize,
}

/// Snapshot of a [`LatticeCache`](crate::LatticeCache).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStatistics {
  pub entry_count: usize,
  pub table_size: usize,
  /// `entry_count / table_size`.
  pub load_factor: f64,
  /// Non-matching entries examined by lookups, inserts and removals since
  /// construction.
  pub collision_count: u64,
  pub max_chain_length: usize,
  /// Mean length of non-empty buckets.
  pub avg_chain_length: f64,
  pub occupied_buckets: usize,
  pub resize_count: u32,
  /// `None` when the cache runs without a spatial index.
  pub octree: Option<OctreeStatistics>,
}

impl CacheStatistics {
  /// Collisions per stored entry (0 when empty).
  pub fn collision_rate(&self) -> f64 {
    if self.entry_count == 0 {
      0.0
    } else {
      self.collision_count as f64 / self.entry_count as f64
    }
  }
}
