//! LatticeCache - bucket store plus spatial index behind one API.
//!
//! The cache is the only code path that mutates either structure, so the
//! octree always holds exactly the bucket store's key set:
//!
//! - `set` inserts into the store, then indexes the coordinate if it is new
//!   (overwrites leave the index alone).
//! - `remove`/`delete` drop the coordinate from both.
//! - A resize (automatic or explicit) rebuilds the index from the store.
//!
//! Point reads (`get`, `contains`) never touch the octree. Range reads walk
//! the octree and resolve each hit through the store; a hit the store cannot
//! resolve is reported as [`LatticeError::IndexDesync`].

use crate::config::LatticeCacheConfig;
use crate::error::{LatticeError, Result};
use crate::observer::{CacheObserver, CollisionEvent, NoopObserver, ResizeEvent};
use crate::octree::Octree;
use crate::stats::CacheStatistics;
use crate::table::{BucketTable, Growth, Probe};
use crate::types::{radius_squared, Dimensions, LatticeCoord};

/// Spatial key-value cache over a bounded 3D lattice.
///
/// `O` receives collision and resize events from write paths; the default
/// [`NoopObserver`] ignores them.
pub struct LatticeCache<V, O: CacheObserver = NoopObserver> {
  config: LatticeCacheConfig,
  table: BucketTable<V>,
  octree: Option<Octree>,
  observer: O,
}

impl<V> LatticeCache<V> {
  /// Create an empty cache. Fails if `config` does not validate.
  pub fn new(config: LatticeCacheConfig) -> Result<Self> {
    Self::with_observer(config, NoopObserver)
  }
}

impl<V, O: CacheObserver> LatticeCache<V, O> {
  /// Create an empty cache reporting to `observer`.
  pub fn with_observer(config: LatticeCacheConfig, observer: O) -> Result<Self> {
    config.validate()?;
    let table = BucketTable::new(config.initial_size, config.max_load_factor)?;
    let octree = config
      .use_octree
      .then(|| Octree::new(&config.dimensions, config.octree));
    Ok(Self {
      config,
      table,
      octree,
      observer,
    })
  }

  #[inline]
  pub fn config(&self) -> &LatticeCacheConfig {
    &self.config
  }

  #[inline]
  pub fn dimensions(&self) -> Dimensions {
    self.config.dimensions
  }

  /// Current bucket count.
  #[inline]
  pub fn table_size(&self) -> usize {
    self.table.table_size()
  }

  #[inline]
  pub fn max_load_factor(&self) -> f64 {
    self.table.max_load_factor()
  }

  #[inline]
  pub fn uses_octree(&self) -> bool {
    self.octree.is_some()
  }

  /// The spatial index, if enabled. Read-only.
  #[inline]
  pub fn octree(&self) -> Option<&Octree> {
    self.octree.as_ref()
  }

  #[inline]
  pub fn observer(&self) -> &O {
    &self.observer
  }

  #[inline]
  pub fn observer_mut(&mut self) -> &mut O {
    &mut self.observer
  }

  /// Stored entries.
  #[inline]
  pub fn len(&self) -> usize {
    self.table.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }

  /// Store `value` at `coord`, returning the value it replaced.
  ///
  /// May grow the table first; a failed allocation leaves the cache as it
  /// was and returns [`LatticeError::ResourceExhausted`].
  pub fn set(&mut self, coord: LatticeCoord, value: V) -> Result<Option<V>> {
    self.config.dimensions.check(&coord)?;
    let outcome = self.table.insert(coord, value)?;
    self.notify_collision(coord, outcome.probe);

    if let Some(growth) = outcome.growth {
      // The rebuild already picks up `coord`.
      self.after_resize(growth);
    } else if outcome.previous.is_none() {
      if let Some(octree) = self.octree.as_mut() {
        octree.insert(coord);
      }
    }
    Ok(outcome.previous)
  }

  /// Value stored at `coord`.
  pub fn get(&self, coord: LatticeCoord) -> Result<Option<&V>> {
    self.config.dimensions.check(&coord)?;
    Ok(self.table.get(&coord))
  }

  pub fn get_mut(&mut self, coord: LatticeCoord) -> Result<Option<&mut V>> {
    self.config.dimensions.check(&coord)?;
    Ok(self.table.get_mut(&coord))
  }

  pub fn contains(&self, coord: LatticeCoord) -> Result<bool> {
    self.config.dimensions.check(&coord)?;
    Ok(self.table.contains(&coord))
  }

  /// Remove `coord`, returning its value.
  pub fn remove(&mut self, coord: LatticeCoord) -> Result<Option<V>> {
    self.config.dimensions.check(&coord)?;
    let (removed, probe) = self.table.remove(&coord);
    self.notify_collision(coord, probe);

    if removed.is_some() {
      if let Some(octree) = self.octree.as_mut() {
        let indexed = octree.remove(&coord);
        debug_assert!(indexed, "{} was stored but not indexed", coord);
      }
    }
    Ok(removed)
  }

  /// Remove `coord`. Returns true if an entry existed.
  pub fn delete(&mut self, coord: LatticeCoord) -> Result<bool> {
    Ok(self.remove(coord)?.is_some())
  }

  /// Entries within `radius` (Euclidean, inclusive) of `center`, unordered.
  ///
  /// `center` may lie outside the domain. Uses the octree when enabled,
  /// otherwise a full scan.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "cache::get_range"))]
  pub fn get_range(&self, center: LatticeCoord, radius: f64) -> Result<Vec<(LatticeCoord, &V)>> {
    let radius_sq = radius_squared(radius)?;
    let Some(octree) = self.octree.as_ref() else {
      return Ok(self.scan(&center, radius_sq));
    };
    octree
      .query_range(&center, radius_sq)
      .into_iter()
      .map(|coord| self.resolve(coord))
      .collect()
  }

  /// [`Self::get_range`] by scanning every entry, regardless of the octree.
  pub fn get_range_linear(
    &self,
    center: LatticeCoord,
    radius: f64,
  ) -> Result<Vec<(LatticeCoord, &V)>> {
    let radius_sq = radius_squared(radius)?;
    Ok(self.scan(&center, radius_sq))
  }

  fn scan(&self, center: &LatticeCoord, radius_sq: u128) -> Vec<(LatticeCoord, &V)> {
    self
      .table
      .iter()
      .filter(|entry| entry.coord.distance_squared(center) <= radius_sq)
      .map(|entry| (entry.coord, &entry.value))
      .collect()
  }

  fn resolve(&self, coord: LatticeCoord) -> Result<(LatticeCoord, &V)> {
    match self.table.get(&coord) {
      Some(value) => Ok((coord, value)),
      None => {
        #[cfg(feature = "tracing")]
        tracing::error!(%coord, "octree hit has no bucket store entry");
        Err(LatticeError::IndexDesync { coord })
      }
    }
  }

  /// Rehash into exactly `new_size` buckets and rebuild the octree.
  ///
  /// `new_size` must be a power of two that keeps the current entries
  /// within the load factor bound.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "cache::resize"))]
  pub fn resize(&mut self, new_size: usize) -> Result<()> {
    let growth = self.table.resize(new_size)?;
    self.after_resize(growth);
    Ok(())
  }

  /// Remove every entry. The table keeps its current size.
  pub fn clear(&mut self) {
    self.table.clear();
    if let Some(octree) = self.octree.as_mut() {
      octree.clear();
    }
  }

  /// Every `(coordinate, value)` pair in bucket order.
  pub fn iter(&self) -> impl Iterator<Item = (LatticeCoord, &V)> {
    self.table.iter().map(|entry| (entry.coord, &entry.value))
  }

  /// Verify that the octree indexes exactly the stored coordinates.
  pub fn check_consistency(&self) -> Result<()> {
    let Some(octree) = self.octree.as_ref() else {
      return Ok(());
    };
    if let Some(coord) = self.table.coords().find(|coord| !octree.contains(coord)) {
      return Err(LatticeError::IndexDesync { coord });
    }
    if octree.len() != self.table.len() {
      if let Some(coord) = octree
        .coords()
        .into_iter()
        .find(|coord| !self.table.contains(coord))
      {
        return Err(LatticeError::IndexDesync { coord });
      }
    }
    Ok(())
  }

  /// Snapshot of table and index statistics.
  pub fn get_statistics(&self) -> CacheStatistics {
    CacheStatistics {
      entry_count: self.table.len(),
      table_size: self.table.table_size(),
      load_factor: self.table.load_factor(),
      collision_count: self.table.collision_count(),
      max_chain_length: self.table.max_chain_length(),
      avg_chain_length: self.table.avg_chain_length(),
      occupied_buckets: self.table.occupied_buckets(),
      resize_count: self.table.resize_count(),
      octree: self.octree.as_ref().map(Octree::statistics),
    }
  }

  fn notify_collision(&mut self, coord: LatticeCoord, probe: Probe) {
    if probe.chain_depth > 0 {
      self.observer.on_collision(&CollisionEvent {
        coord,
        slot: probe.slot,
        chain_depth: probe.chain_depth,
      });
    }
  }

  fn after_resize(&mut self, growth: Growth) {
    if let Some(octree) = self.octree.as_mut() {
      octree.rebuild(self.table.coords());
    }
    self.observer.on_resize(&ResizeEvent {
      old_size: growth.old_size,
      new_size: growth.new_size,
      entry_count: self.table.len(),
      elapsed_us: growth.elapsed_us,
    });
  }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
