//! Hash multipliers and configuration defaults.
//!
//! # Hash Multipliers
//!
//! The lattice hash is a three-axis Weyl sum: each axis has an irrational
//! multiplier `α` and the slot is taken from `frac(x·α₁ + y·α₂ + z·α₃)`.
//!
//! The multipliers come from the family of "harmonious" ratios, the real
//! roots of `x^(d+1) = x + 1`:
//!
//! ```text
//!   d = 1   x² = x + 1   golden ratio     φ  ≈ 1.6180
//!   d = 2   x³ = x + 1   plastic constant ρ  ≈ 1.3247
//!   d = 3   x⁴ = x + 1   lattice ratio    g  ≈ 1.2207
//! ```
//!
//! with `α_i = frac(g^-i)` for `i = 1, 2, 3`. The three powers of `g` are
//! linearly independent over the rationals together with 1, so no small
//! integer offset `(dx, dy, dz)` maps to the same fractional sum.
//! (For the cubic ρ, `ρ^-2 + ρ^-3 = 1` exactly, which makes `(x, y, z)`
//! and `(x, y + 1, z + 1)` land in the same slot.)
//!
//! # Fixed Point
//!
//! Multipliers are stored as 0.64 fixed-point fractions: `α · 2^64`. A
//! wrapping `u64` multiply-accumulate is exactly `frac(Σ coord·α)` in the
//! same representation, independent of platform floating point.

/// Real root of `x⁴ = x + 1` (for reference; the hash uses the
/// fixed-point multipliers below).
pub const LATTICE_RATIO: f64 = 1.220_744_084_605_759_6;

/// Fixed-point multiplier for the X axis: `floor(frac(g^-1) · 2^64)`.
pub const ALPHA_X: u64 = 0xd1b5_4a32_d192_ed03;

/// Fixed-point multiplier for the Y axis: `floor(frac(g^-2) · 2^64)`.
pub const ALPHA_Y: u64 = 0xabc9_8388_fb8f_ac02;

/// Fixed-point multiplier for the Z axis: `floor(frac(g^-3) · 2^64)`.
pub const ALPHA_Z: u64 = 0x8cb9_2ba7_2f3d_8dd7;

/// All three multipliers in axis order.
pub const HASH_MULTIPLIERS: [u64; 3] = [ALPHA_X, ALPHA_Y, ALPHA_Z];

// =============================================================================
// Table defaults
// =============================================================================

/// Default number of buckets in a fresh table.
pub const DEFAULT_TABLE_SIZE: usize = 1024;

/// Default load factor bound (entries / buckets).
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Largest table the bucket store will grow to (2^31 buckets).
pub const MAX_TABLE_SIZE: usize = 1 << 31;

// =============================================================================
// Octree defaults
// =============================================================================

/// Coordinates a leaf may hold before it splits into 8 octants.
///
/// With 16 per leaf the tree depth stays close to `log8(n / 16) + 1`
/// for spatially spread data.
pub const DEFAULT_LEAF_CAPACITY: usize = 16;

/// Deepest level the octree will split to.
///
/// 32 halvings reduce any `u32` extent to a single cell, so the default
/// never stops a split that could still separate coordinates.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

// =============================================================================
// Hierarchy limits
// =============================================================================

/// Maximum number of resolution levels (level L scales by `2^L`, L < 32).
pub const MAX_LEVELS: u32 = 32;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
