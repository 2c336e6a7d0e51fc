//! Multi-resolution cache: one independent [`LatticeCache`] per level.
//!
//! Callers always pass base-resolution coordinates. Level `L` floor-divides
//! each component by `2^L` before delegating, so the `2^L`-wide block of base
//! coordinates around a point shares one entry at that level.
//!
//! ```text
//! level 0: 128 x 128 x 128   (64, 65, 66) -> (64, 65, 66)
//! level 1:  64 x  64 x  64   (64, 65, 66) -> (32, 32, 33)
//! level 2:  32 x  32 x  32   (64, 65, 66) -> (16, 16, 16)
//! ```

use crate::cache::LatticeCache;
use crate::config::HierarchyConfig;
use crate::error::{LatticeError, Result};
use crate::stats::CacheStatistics;
use crate::types::{Dimensions, LatticeCoord};

/// Stack of lattice caches at power-of-two resolutions.
pub struct HierarchicalLatticeCache<V> {
  config: HierarchyConfig,
  levels: Vec<LatticeCache<V>>,
}

impl<V> HierarchicalLatticeCache<V> {
  /// Create `config.num_levels` empty caches.
  pub fn new(config: HierarchyConfig) -> Result<Self> {
    config.validate()?;
    let levels = (0..config.num_levels)
      .map(|level| LatticeCache::new(config.level(level)))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { config, levels })
  }

  #[inline]
  pub fn config(&self) -> &HierarchyConfig {
    &self.config
  }

  #[inline]
  pub fn num_levels(&self) -> u32 {
    self.config.num_levels
  }

  #[inline]
  pub fn base_dimensions(&self) -> Dimensions {
    self.config.base.dimensions
  }

  /// Cache backing `level`.
  pub fn level(&self, level: u32) -> Result<&LatticeCache<V>> {
    self
      .levels
      .get(level as usize)
      .ok_or(LatticeError::InvalidLevel {
        level,
        num_levels: self.num_levels(),
      })
  }

  fn level_mut(&mut self, level: u32) -> Result<&mut LatticeCache<V>> {
    let num_levels = self.num_levels();
    self
      .levels
      .get_mut(level as usize)
      .ok_or(LatticeError::InvalidLevel { level, num_levels })
  }

  pub fn level_dimensions(&self, level: u32) -> Result<Dimensions> {
    Ok(self.level(level)?.dimensions())
  }

  pub fn level_statistics(&self, level: u32) -> Result<CacheStatistics> {
    Ok(self.level(level)?.get_statistics())
  }

  /// Map a base-resolution coordinate to `level`.
  ///
  /// The coordinate must lie in the base domain. Near a base dimension that
  /// is not a multiple of `2^level` the result can fall outside the level's
  /// (floor-divided) domain; level operations then report `OutOfBounds`.
  pub fn scale_to_level(&self, coord: LatticeCoord, level: u32) -> Result<LatticeCoord> {
    self.level(level)?;
    self.base_dimensions().check(&coord)?;
    Ok(coord.scaled_down(level))
  }

  /// Store `value` for the block containing `coord` at `level`.
  pub fn set(&mut self, coord: LatticeCoord, value: V, level: u32) -> Result<Option<V>> {
    let scaled = self.scale_to_level(coord, level)?;
    self.level_mut(level)?.set(scaled, value)
  }

  /// Value for the block containing `coord` at `level`.
  pub fn get_hierarchical(&self, coord: LatticeCoord, level: u32) -> Result<Option<&V>> {
    let scaled = self.scale_to_level(coord, level)?;
    self.level(level)?.get(scaled)
  }

  pub fn delete(&mut self, coord: LatticeCoord, level: u32) -> Result<bool> {
    let scaled = self.scale_to_level(coord, level)?;
    self.level_mut(level)?.delete(scaled)
  }

  /// Range query at `level`, with `center` and `radius` given at base
  /// resolution. Results are in level coordinates.
  ///
  /// `center` may lie outside the base domain.
  pub fn get_range_at_level(
    &self,
    center: LatticeCoord,
    radius: f64,
    level: u32,
  ) -> Result<Vec<(LatticeCoord, &V)>> {
    let cache = self.level(level)?;
    let scale = 2f64.powi(level as i32);
    cache.get_range(center.scaled_down(level), radius / scale)
  }

  /// Entries across all levels.
  pub fn len(&self) -> usize {
    self.levels.iter().map(LatticeCache::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.levels.iter().all(LatticeCache::is_empty)
  }

  /// Empty every level.
  pub fn clear(&mut self) {
    self.levels.iter_mut().for_each(LatticeCache::clear);
  }
}

#[cfg(test)]
#[path = "hierarchy_test.rs"]
mod hierarchy_test;
