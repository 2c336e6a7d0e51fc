//! Core value types: lattice coordinates, lattice dimensions, and axes.

use std::fmt;

use glam::UVec3;

use crate::error::{LatticeError, Result};

/// Coordinate axis, used to name the offending axis in errors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
  X,
  Y,
  Z,
}

impl Axis {
  /// All axes in storage order.
  pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Axis::X => "x",
      Axis::Y => "y",
      Axis::Z => "z",
    };
    f.write_str(name)
  }
}

/// Lattice coordinate - immutable value type.
///
/// Components are non-negative; whether a coordinate is valid for a cache
/// depends on that cache's [`Dimensions`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeCoord {
  pub x: u32,
  pub y: u32,
  pub z: u32,
}

impl LatticeCoord {
  /// The lattice origin (0, 0, 0).
  pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

  /// Create a coordinate.
  #[inline]
  pub const fn new(x: u32, y: u32, z: u32) -> Self {
    Self { x, y, z }
  }

  /// Component along `axis`.
  #[inline]
  pub fn get(&self, axis: Axis) -> u32 {
    match axis {
      Axis::X => self.x,
      Axis::Y => self.y,
      Axis::Z => self.z,
    }
  }

  #[inline]
  pub fn as_uvec3(&self) -> UVec3 {
    UVec3::new(self.x, self.y, self.z)
  }

  /// Exact squared Euclidean distance.
  ///
  /// Per-axis differences fit in `u32`, so the sum of three squares always
  /// fits in `u128` without overflow.
  #[inline]
  pub fn distance_squared(&self, other: &LatticeCoord) -> u128 {
    let dx = self.x.abs_diff(other.x) as u128;
    let dy = self.y.abs_diff(other.y) as u128;
    let dz = self.z.abs_diff(other.z) as u128;
    dx * dx + dy * dy + dz * dz
  }

  /// Floor-divide every component by `2^level`.
  ///
  /// Levels of 32 or more map every coordinate to the origin.
  #[inline]
  pub fn scaled_down(&self, level: u32) -> Self {
    Self {
      x: self.x.checked_shr(level).unwrap_or(0),
      y: self.y.checked_shr(level).unwrap_or(0),
      z: self.z.checked_shr(level).unwrap_or(0),
    }
  }
}

impl fmt::Display for LatticeCoord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {}, {})", self.x, self.y, self.z)
  }
}

impl From<(u32, u32, u32)> for LatticeCoord {
  fn from((x, y, z): (u32, u32, u32)) -> Self {
    Self::new(x, y, z)
  }
}

impl From<[u32; 3]> for LatticeCoord {
  fn from([x, y, z]: [u32; 3]) -> Self {
    Self::new(x, y, z)
  }
}

impl From<UVec3> for LatticeCoord {
  fn from(v: UVec3) -> Self {
    Self::new(v.x, v.y, v.z)
  }
}

/// Extent of the coordinate domain `[0, width) × [0, height) × [0, depth)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
  pub width: u32,
  pub height: u32,
  pub depth: u32,
}

impl Dimensions {
  #[inline]
  pub const fn new(width: u32, height: u32, depth: u32) -> Self {
    Self {
      width,
      height,
      depth,
    }
  }

  /// Cube with the same extent on every axis.
  #[inline]
  pub const fn cube(size: u32) -> Self {
    Self::new(size, size, size)
  }

  /// Extent along `axis`.
  #[inline]
  pub fn extent(&self, axis: Axis) -> u32 {
    match axis {
      Axis::X => self.width,
      Axis::Y => self.height,
      Axis::Z => self.depth,
    }
  }

  /// Number of lattice points in the domain.
  pub fn volume(&self) -> u64 {
    self.width as u64 * self.height as u64 * self.depth as u64
  }

  #[inline]
  pub fn as_uvec3(&self) -> UVec3 {
    UVec3::new(self.width, self.height, self.depth)
  }

  /// Check if a coordinate lies inside the domain.
  #[inline]
  pub fn contains(&self, coord: &LatticeCoord) -> bool {
    coord.x < self.width && coord.y < self.height && coord.z < self.depth
  }

  /// Validate a coordinate, naming the first offending axis.
  pub fn check(&self, coord: &LatticeCoord) -> Result<()> {
    for axis in Axis::ALL {
      let value = coord.get(axis);
      let bound = self.extent(axis);
      if value >= bound {
        return Err(LatticeError::OutOfBounds { axis, value, bound });
      }
    }
    Ok(())
  }

  /// First axis with a zero extent, if any.
  pub fn zero_axis(&self) -> Option<Axis> {
    Axis::ALL.into_iter().find(|axis| self.extent(*axis) == 0)
  }

  /// Dimensions at hierarchical `level`: every extent floor-divided by
  /// `2^level`, clamped to at least 1.
  pub fn scaled_down(&self, level: u32) -> Self {
    let scale = |extent: u32| extent.checked_shr(level).unwrap_or(0).max(1);
    Self::new(scale(self.width), scale(self.height), scale(self.depth))
  }
}

impl fmt::Display for Dimensions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}x{}", self.width, self.height, self.depth)
  }
}

impl From<(u32, u32, u32)> for Dimensions {
  fn from((width, height, depth): (u32, u32, u32)) -> Self {
    Self::new(width, height, depth)
  }
}

/// Convert a query radius into an inclusive squared-distance bound.
///
/// Returns the largest integer `k` with `sqrt(k) <= radius` in `f64`, so
/// `distance² <= k` agrees with `distance <= radius` even when `radius` is
/// itself a rounded square root (`3f64.sqrt()` reaches `(1, 1, 1)`). Bounds
/// past 2^53 skip the correction and huge radii saturate to `u128::MAX`.
pub fn radius_squared(radius: f64) -> Result<u128> {
  if !radius.is_finite() || radius < 0.0 {
    return Err(LatticeError::InvalidRadius(radius));
  }
  let approx = (radius * radius).floor();
  if approx >= EXACT_INTEGER_LIMIT {
    return Ok(approx as u128);
  }

  // `radius * radius` is off by at most an ulp, so each loop runs a step or two.
  let mut bound = approx as u64;
  while bound > 0 && (bound as f64).sqrt() > radius {
    bound -= 1;
  }
  while ((bound + 1) as f64).sqrt() <= radius {
    bound += 1;
  }
  Ok(u128::from(bound))
}

/// 2^53: every integer below is exact in `f64`.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
