//! Lattice hash - maps 3D lattice coordinates to table slots.
//!
//! ```text
//! slot = floor(frac(x·α₁ + y·α₂ + z·α₃) · table_size)
//! ```
//!
//! The fractional sum is accumulated in 0.64 fixed point (wrapping `u64`
//! arithmetic is exactly `mod 1`), then scaled by a 128-bit multiply and a
//! 64-bit right shift. For a power-of-two `table_size` this is the top
//! `log2(table_size)` bits of the fraction.
//!
//! Translation coherence: shifting a coordinate by a fixed offset always
//! moves its slot by the same amount (±1), so neighborhoods keep their
//! shape in the table. See [`offset_slot`].

use crate::constants::{ALPHA_X, ALPHA_Y, ALPHA_Z};
use crate::types::LatticeCoord;

/// 0.64 fixed-point fractional part of `x·α₁ + y·α₂ + z·α₃`.
#[inline(always)]
pub fn fractional_sum(x: u32, y: u32, z: u32) -> u64 {
  (x as u64)
    .wrapping_mul(ALPHA_X)
    .wrapping_add((y as u64).wrapping_mul(ALPHA_Y))
    .wrapping_add((z as u64).wrapping_mul(ALPHA_Z))
}

/// Scale a 0.64 fixed-point fraction into `[0, table_size)`.
#[inline(always)]
fn scale_fraction(fraction: u64, table_size: usize) -> usize {
  ((fraction as u128 * table_size as u128) >> 64) as usize
}

/// Hash a lattice point into `[0, table_size)`.
///
/// `table_size` must be a positive power of two; caches validate this at
/// construction, so it is only debug-asserted here.
#[inline]
pub fn hash3d(x: u32, y: u32, z: u32, table_size: usize) -> usize {
  debug_assert!(
    table_size.is_power_of_two(),
    "table size {} must be a power of two",
    table_size
  );
  scale_fraction(fractional_sum(x, y, z), table_size)
}

/// [`hash3d`] for a [`LatticeCoord`].
#[inline]
pub fn hash_coord(coord: &LatticeCoord, table_size: usize) -> usize {
  hash3d(coord.x, coord.y, coord.z, table_size)
}

/// Slot displacement produced by a coordinate offset.
///
/// For any `c` with `c + offset` on the lattice,
/// `hash(c + offset) - hash(c) (mod table_size)` is either this value or
/// one more.
pub fn offset_slot(offset: [i64; 3], table_size: usize) -> usize {
  let fraction = (offset[0] as u64)
    .wrapping_mul(ALPHA_X)
    .wrapping_add((offset[1] as u64).wrapping_mul(ALPHA_Y))
    .wrapping_add((offset[2] as u64).wrapping_mul(ALPHA_Z));
  scale_fraction(fraction, table_size)
}

#[cfg(test)]
#[path = "hash_test.rs"]
mod hash_test;
