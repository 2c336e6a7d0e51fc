//! Bucket store - chained hash table keyed by lattice coordinates.
//!
//! Buckets are small inline vectors; the slot for a coordinate is always
//! recomputed from [`hash_coord`] (entries do not cache their hash).
//!
//! # Collision Accounting
//!
//! Every access (lookup, insert, remove) walks a bucket until it finds the
//! coordinate or reaches the end. Each entry examined that is *not* the
//! target counts as one collision; inserting a new coordinate into a bucket
//! with `k` entries therefore counts `k`.
//!
//! # Growth
//!
//! An insert of a new coordinate that would push the load factor above the
//! bound first grows the table (doubling until the bound holds), then
//! inserts. The replacement table is fully allocated before the old one is
//! touched, so a failed allocation leaves the store unchanged.

use std::cell::Cell;

use smallvec::SmallVec;
use web_time::Instant;

use crate::constants::MAX_TABLE_SIZE;
use crate::error::{ConfigError, LatticeError, Result};
use crate::hash::hash_coord;
use crate::types::LatticeCoord;

/// Stored (coordinate, value) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<V> {
  pub coord: LatticeCoord,
  pub value: V,
}

type Bucket<V> = SmallVec<[Entry<V>; 2]>;

/// Where an access landed and how many other entries it had to pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Probe {
  /// Bucket index.
  pub slot: usize,
  /// Non-matching entries examined.
  pub chain_depth: usize,
}

/// A completed table resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Growth {
  pub old_size: usize,
  pub new_size: usize,
  /// Rehash time in microseconds.
  pub elapsed_us: u64,
}

/// Result of [`BucketTable::insert`].
#[derive(Debug)]
pub struct InsertOutcome<V> {
  /// Value previously stored at the coordinate, if any.
  pub previous: Option<V>,
  pub probe: Probe,
  /// Set when the insert had to grow the table first.
  pub growth: Option<Growth>,
}

/// Validate a table size: positive power of two, at most [`MAX_TABLE_SIZE`].
pub fn validate_table_size(table_size: usize) -> std::result::Result<(), ConfigError> {
  if !table_size.is_power_of_two() {
    return Err(ConfigError::TableSizeNotPowerOfTwo(table_size));
  }
  if table_size > MAX_TABLE_SIZE {
    return Err(ConfigError::TableSizeTooLarge {
      requested: table_size,
      max: MAX_TABLE_SIZE,
    });
  }
  Ok(())
}

/// Validate a load factor bound in `(0, 1]`.
pub fn validate_load_factor(max_load_factor: f64) -> std::result::Result<(), ConfigError> {
  if max_load_factor > 0.0 && max_load_factor <= 1.0 {
    Ok(())
  } else {
    Err(ConfigError::LoadFactorOutOfRange(max_load_factor))
  }
}

#[inline]
fn exceeds(entries: usize, table_size: usize, max_load_factor: f64) -> bool {
  entries as f64 / table_size as f64 > max_load_factor
}

fn allocate_buckets<V>(table_size: usize) -> Result<Vec<Bucket<V>>> {
  let mut buckets = Vec::new();
  buckets
    .try_reserve_exact(table_size)
    .map_err(|_| LatticeError::ResourceExhausted {
      requested: table_size,
    })?;
  buckets.resize_with(table_size, SmallVec::new);
  Ok(buckets)
}

/// Chained hash table over lattice coordinates.
pub struct BucketTable<V> {
  buckets: Vec<Bucket<V>>,
  len: usize,
  max_load_factor: f64,
  collisions: Cell<u64>,
  resizes: u32,
}

impl<V> BucketTable<V> {
  /// Create an empty table with `table_size` buckets.
  pub fn new(table_size: usize, max_load_factor: f64) -> Result<Self> {
    validate_table_size(table_size)?;
    validate_load_factor(max_load_factor)?;
    Ok(Self {
      buckets: allocate_buckets(table_size)?,
      len: 0,
      max_load_factor,
      collisions: Cell::new(0),
      resizes: 0,
    })
  }

  /// Number of stored entries.
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Number of buckets (always a power of two).
  #[inline]
  pub fn table_size(&self) -> usize {
    self.buckets.len()
  }

  #[inline]
  pub fn max_load_factor(&self) -> f64 {
    self.max_load_factor
  }

  /// Entries per bucket.
  #[inline]
  pub fn load_factor(&self) -> f64 {
    self.len as f64 / self.table_size() as f64
  }

  /// Collisions counted since construction.
  #[inline]
  pub fn collision_count(&self) -> u64 {
    self.collisions.get()
  }

  /// Completed resizes since construction.
  #[inline]
  pub fn resize_count(&self) -> u32 {
    self.resizes
  }

  #[inline]
  fn slot_of(&self, coord: &LatticeCoord) -> usize {
    hash_coord(coord, self.table_size())
  }

  #[inline]
  fn record(&self, chain_depth: usize) {
    if chain_depth > 0 {
      self.collisions.set(self.collisions.get() + chain_depth as u64);
    }
  }

  /// Locate `coord`: (slot, position in bucket if present, probe).
  fn find(&self, coord: &LatticeCoord) -> (Option<usize>, Probe) {
    let slot = self.slot_of(coord);
    let bucket = &self.buckets[slot];
    let position = bucket.iter().position(|entry| entry.coord == *coord);
    let chain_depth = position.unwrap_or(bucket.len());
    self.record(chain_depth);
    (position, Probe { slot, chain_depth })
  }

  /// Look up the value for `coord`.
  pub fn get(&self, coord: &LatticeCoord) -> Option<&V> {
    let (position, probe) = self.find(coord);
    position.map(|i| &self.buckets[probe.slot][i].value)
  }

  /// Look up the value for `coord` mutably.
  pub fn get_mut(&mut self, coord: &LatticeCoord) -> Option<&mut V> {
    let (position, probe) = self.find(coord);
    position.map(move |i| &mut self.buckets[probe.slot][i].value)
  }

  /// Check if `coord` is stored.
  pub fn contains(&self, coord: &LatticeCoord) -> bool {
    self.find(coord).0.is_some()
  }

  /// Insert or overwrite the value at `coord`.
  ///
  /// Overwrites never resize. New coordinates grow the table first when
  /// the post-insert load factor would exceed the bound.
  pub fn insert(&mut self, coord: LatticeCoord, value: V) -> Result<InsertOutcome<V>> {
    let (position, probe) = self.find(&coord);
    if let Some(i) = position {
      let previous = std::mem::replace(&mut self.buckets[probe.slot][i].value, value);
      return Ok(InsertOutcome {
        previous: Some(previous),
        probe,
        growth: None,
      });
    }

    let growth = if exceeds(self.len + 1, self.table_size(), self.max_load_factor) {
      let target = self.grown_size(self.len + 1)?;
      Some(self.rehash(target)?)
    } else {
      None
    };

    let slot = self.slot_of(&coord);
    let bucket = &mut self.buckets[slot];
    let chain_depth = bucket.len();
    bucket.push(Entry { coord, value });
    self.len += 1;

    // The pre-growth probe was against the old layout.
    let probe = if growth.is_some() {
      self.record(chain_depth);
      Probe { slot, chain_depth }
    } else {
      probe
    };

    Ok(InsertOutcome {
      previous: None,
      probe,
      growth,
    })
  }

  /// Remove `coord`, returning its value and the probe that found it.
  pub fn remove(&mut self, coord: &LatticeCoord) -> (Option<V>, Probe) {
    let (position, probe) = self.find(coord);
    let removed = position.map(|i| {
      self.len -= 1;
      self.buckets[probe.slot].swap_remove(i).value
    });
    (removed, probe)
  }

  /// Resize to exactly `new_size` buckets.
  ///
  /// `new_size` must be a valid table size that keeps the current entries
  /// within the load factor bound. Shrinking is allowed.
  pub fn resize(&mut self, new_size: usize) -> Result<Growth> {
    validate_table_size(new_size)?;
    if exceeds(self.len, new_size, self.max_load_factor) {
      return Err(
        ConfigError::TableTooSmall {
          requested: new_size,
          entries: self.len,
          max_load_factor: self.max_load_factor,
        }
        .into(),
      );
    }
    self.rehash(new_size)
  }

  /// Remove all entries, keeping the current table size.
  pub fn clear(&mut self) {
    for bucket in &mut self.buckets {
      bucket.clear();
    }
    self.len = 0;
  }

  /// Smallest doubling of the current size that holds `entries`.
  fn grown_size(&self, entries: usize) -> Result<usize> {
    let mut size = self.table_size();
    while exceeds(entries, size, self.max_load_factor) {
      size = size
        .checked_mul(2)
        .filter(|s| *s <= MAX_TABLE_SIZE)
        .ok_or(LatticeError::ResourceExhausted {
          requested: size.saturating_mul(2),
        })?;
    }
    Ok(size)
  }

  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "table::rehash"))]
  fn rehash(&mut self, new_size: usize) -> Result<Growth> {
    let start = Instant::now();
    let old_size = self.table_size();
    let mut buckets = allocate_buckets::<V>(new_size)?;

    for bucket in std::mem::take(&mut self.buckets) {
      for entry in bucket {
        let slot = hash_coord(&entry.coord, new_size);
        buckets[slot].push(entry);
      }
    }
    self.buckets = buckets;
    self.resizes += 1;

    let growth = Growth {
      old_size,
      new_size,
      elapsed_us: start.elapsed().as_micros() as u64,
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
      old_size,
      new_size,
      entries = self.len,
      elapsed_us = growth.elapsed_us,
      "rehashed lattice table"
    );

    Ok(growth)
  }

  /// Iterate over stored entries in bucket order.
  pub fn iter(&self) -> impl Iterator<Item = &Entry<V>> {
    self.buckets.iter().flat_map(|bucket| bucket.iter())
  }

  /// Iterate over stored coordinates in bucket order.
  pub fn coords(&self) -> impl Iterator<Item = LatticeCoord> + '_ {
    self.iter().map(|entry| entry.coord)
  }

  /// Entries currently sharing `slot`.
  pub fn chain_length(&self, slot: usize) -> usize {
    self.buckets.get(slot).map_or(0, |bucket| bucket.len())
  }

  /// Longest bucket at observation time.
  pub fn max_chain_length(&self) -> usize {
    self.buckets.iter().map(|bucket| bucket.len()).max().unwrap_or(0)
  }

  /// Buckets holding at least one entry.
  pub fn occupied_buckets(&self) -> usize {
    self.buckets.iter().filter(|bucket| !bucket.is_empty()).count()
  }

  /// Mean length of non-empty buckets (0 when empty).
  pub fn avg_chain_length(&self) -> f64 {
    let occupied = self.occupied_buckets();
    if occupied == 0 {
      0.0
    } else {
      self.len as f64 / occupied as f64
    }
  }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
