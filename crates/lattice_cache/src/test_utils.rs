//! Deterministic coordinate generation shared by unit tests.
//!
//! SplitMix64 keeps generated coordinate sets identical across platforms
//! and `rand` releases, which the statistical tests rely on.

use std::collections::HashSet;

use crate::types::{Dimensions, LatticeCoord};

/// Seeded SplitMix64 stream of lattice coordinates.
pub struct CoordStream {
  state: u64,
}

impl CoordStream {
  pub fn new(seed: u64) -> Self {
    Self { state: seed }
  }

  pub fn next_u64(&mut self) -> u64 {
    self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = self.state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
  }

  /// Uniform value in `[0, bound)`.
  pub fn below(&mut self, bound: u32) -> u32 {
    ((self.next_u64() as u128 * bound as u128) >> 64) as u32
  }

  pub fn next_coord(&mut self, dims: &Dimensions) -> LatticeCoord {
    let x = self.below(dims.width);
    let y = self.below(dims.height);
    let z = self.below(dims.depth);
    LatticeCoord::new(x, y, z)
  }

  /// `count` distinct coordinates in generation order.
  pub fn distinct(seed: u64, count: usize, dims: &Dimensions) -> Vec<LatticeCoord> {
    let mut stream = Self::new(seed);
    let mut seen = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
      let coord = stream.next_coord(dims);
      if seen.insert(coord) {
        out.push(coord);
      }
    }
    out
  }
}
