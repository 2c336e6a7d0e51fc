//! Half-open integer boxes over the lattice.

use glam::UVec3;

use crate::types::{Dimensions, LatticeCoord};

/// Axis-aligned lattice box covering `[min, max)` on every axis.
///
/// A box with `min == max` on any axis is empty. Child boxes are never
/// stored; they are derived from the parent with [`CellBounds::child`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellBounds {
	/// Minimum corner (inclusive).
	pub min: UVec3,
	/// Maximum corner (exclusive).
	pub max: UVec3,
}

impl CellBounds {
	/// Create a box from its corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: UVec3, max: UVec3) -> Self {
		debug_assert!(
			min.cmple(max).all(),
			"bounds min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Box covering an entire coordinate domain.
	pub fn from_dimensions(dimensions: &Dimensions) -> Self {
		Self::new(UVec3::ZERO, dimensions.as_uvec3())
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.min.cmpge(self.max).any()
	}

	#[inline]
	pub fn contains(&self, coord: &LatticeCoord) -> bool {
		let p = coord.as_uvec3();
		p.cmpge(self.min).all() && p.cmplt(self.max).all()
	}

	/// Cells per axis.
	#[inline]
	pub fn extent(&self) -> UVec3 {
		self.max - self.min
	}

	/// Split point per axis: the first cell of the upper half.
	#[inline]
	pub fn midpoint(&self) -> UVec3 {
		self.min + self.extent() / 2
	}

	/// Bisecting still separates cells on at least one axis.
	#[inline]
	pub fn can_split(&self) -> bool {
		self.extent().cmpge(UVec3::splat(2)).any()
	}

	/// Octant index of a contained coordinate.
	///
	/// Bit 0: x in the upper half, bit 1: y, bit 2: z.
	#[inline]
	pub fn octant_of(&self, coord: &LatticeCoord) -> usize {
		let upper = coord.as_uvec3().cmpge(self.midpoint());
		(upper.x as usize) | ((upper.y as usize) << 1) | ((upper.z as usize) << 2)
	}

	/// Box of child `octant` (0-7, same bit layout as [`Self::octant_of`]).
	pub fn child(&self, octant: usize) -> Self {
		debug_assert!(octant < 8, "octant {} out of range", octant);
		let mid = self.midpoint();
		let pick = |bit: usize, lo: u32, mid: u32, hi: u32| {
			if octant & bit == 0 {
				(lo, mid)
			} else {
				(mid, hi)
			}
		};
		let (x0, x1) = pick(1, self.min.x, mid.x, self.max.x);
		let (y0, y1) = pick(2, self.min.y, mid.y, self.max.y);
		let (z0, z1) = pick(4, self.min.z, mid.z, self.max.z);
		Self::new(UVec3::new(x0, y0, z0), UVec3::new(x1, y1, z1))
	}

	/// Squared distance from `point` to the nearest cell of this box.
	///
	/// Zero when the box contains the point. Meaningless for empty boxes.
	pub fn distance_squared_to(&self, point: &LatticeCoord) -> u128 {
		let p = point.as_uvec3().to_array();
		let lo = self.min.to_array();
		let hi = self.max.to_array();
		(0..3)
			.map(|axis| {
				let nearest = p[axis].clamp(lo[axis], hi[axis].saturating_sub(1).max(lo[axis]));
				let d = nearest.abs_diff(p[axis]) as u128;
				d * d
			})
			.sum()
	}

	/// Box holds a cell within `radius_sq` (squared) of `center`.
	#[inline]
	pub fn intersects_sphere(&self, center: &LatticeCoord, radius_sq: u128) -> bool {
		!self.is_empty() && self.distance_squared_to(center) <= radius_sq
	}
}
