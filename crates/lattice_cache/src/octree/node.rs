//! OctreeNode - recursive leaf/branch storage for occupied coordinates.
//!
//! Nodes do not store their bounds. Every operation takes the node's
//! [`CellBounds`] and depth from the caller and derives child bounds on the
//! way down, so a branch is just eight children.

use smallvec::SmallVec;

use super::bounds::CellBounds;
use super::config::OctreeConfig;
use crate::types::LatticeCoord;

pub type LeafCoords = SmallVec<[LatticeCoord; 4]>;

/// Octree node.
///
/// Children of a branch are indexed by octant (see
/// [`CellBounds::octant_of`]).
#[derive(Clone, Debug)]
pub enum OctreeNode {
  Leaf(LeafCoords),
  Branch(Box<[OctreeNode; 8]>),
}

impl Default for OctreeNode {
  fn default() -> Self {
    OctreeNode::Leaf(LeafCoords::new())
  }
}

impl OctreeNode {
  #[inline]
  pub fn is_leaf(&self) -> bool {
    matches!(self, OctreeNode::Leaf(_))
  }

  /// Add a coordinate known to be absent from this subtree.
  pub fn insert(
    &mut self,
    coord: LatticeCoord,
    bounds: &CellBounds,
    depth: u32,
    config: &OctreeConfig,
  ) {
    match self {
      OctreeNode::Leaf(coords) => {
        coords.push(coord);
        if coords.len() > config.leaf_capacity && depth < config.max_depth && bounds.can_split() {
          self.split(bounds, depth, config);
        }
      }
      OctreeNode::Branch(children) => {
        let octant = bounds.octant_of(&coord);
        children[octant].insert(coord, &bounds.child(octant), depth + 1, config);
      }
    }
  }

  /// Turn a leaf into a branch, redistributing its coordinates.
  ///
  /// Children that still overflow split in turn.
  fn split(&mut self, bounds: &CellBounds, depth: u32, config: &OctreeConfig) {
    let OctreeNode::Leaf(coords) = self else {
      return;
    };
    let coords = std::mem::take(coords);
    let mut children: Box<[OctreeNode; 8]> = Box::default();
    for coord in coords {
      let octant = bounds.octant_of(&coord);
      children[octant].insert(coord, &bounds.child(octant), depth + 1, config);
    }
    *self = OctreeNode::Branch(children);
  }

  /// Remove a coordinate. Returns false if it was not present.
  ///
  /// Branches left with few enough coordinates collapse on the way back up.
  pub fn remove(&mut self, coord: &LatticeCoord, bounds: &CellBounds, config: &OctreeConfig) -> bool {
    match self {
      OctreeNode::Leaf(coords) => match coords.iter().position(|c| c == coord) {
        Some(i) => {
          coords.swap_remove(i);
          true
        }
        None => false,
      },
      OctreeNode::Branch(children) => {
        let octant = bounds.octant_of(coord);
        let removed = children[octant].remove(coord, &bounds.child(octant), config);
        if removed {
          self.try_merge(config);
        }
        removed
      }
    }
  }

  /// Collapse a branch of leaves holding at most `leaf_capacity` coordinates.
  fn try_merge(&mut self, config: &OctreeConfig) {
    let OctreeNode::Branch(children) = self else {
      return;
    };
    let mut total = 0;
    for child in children.iter() {
      match child {
        OctreeNode::Leaf(coords) => total += coords.len(),
        OctreeNode::Branch(_) => return,
      }
    }
    if total > config.leaf_capacity {
      return;
    }

    let mut merged = LeafCoords::with_capacity(total);
    for child in children.iter_mut() {
      if let OctreeNode::Leaf(coords) = child {
        merged.extend(coords.drain(..));
      }
    }
    *self = OctreeNode::Leaf(merged);
  }

  pub fn contains(&self, coord: &LatticeCoord, bounds: &CellBounds) -> bool {
    match self {
      OctreeNode::Leaf(coords) => coords.contains(coord),
      OctreeNode::Branch(children) => {
        let octant = bounds.octant_of(coord);
        children[octant].contains(coord, &bounds.child(octant))
      }
    }
  }

  /// Append every stored coordinate within `radius_sq` of `center`.
  ///
  /// Children whose box cannot reach the sphere are skipped without being
  /// visited.
  pub fn query(
    &self,
    center: &LatticeCoord,
    radius_sq: u128,
    bounds: &CellBounds,
    out: &mut Vec<LatticeCoord>,
  ) {
    match self {
      OctreeNode::Leaf(coords) => {
        out.extend(
          coords
            .iter()
            .filter(|coord| coord.distance_squared(center) <= radius_sq)
            .copied(),
        );
      }
      OctreeNode::Branch(children) => {
        for (octant, child) in children.iter().enumerate() {
          let child_bounds = bounds.child(octant);
          if child_bounds.intersects_sphere(center, radius_sq) {
            child.query(center, radius_sq, &child_bounds, out);
          }
        }
      }
    }
  }

  /// Append every stored coordinate.
  pub fn collect(&self, out: &mut Vec<LatticeCoord>) {
    match self {
      OctreeNode::Leaf(coords) => out.extend_from_slice(coords),
      OctreeNode::Branch(children) => children.iter().for_each(|child| child.collect(out)),
    }
  }

  /// Coordinates stored in this subtree.
  pub fn len(&self) -> usize {
    match self {
      OctreeNode::Leaf(coords) => coords.len(),
      OctreeNode::Branch(children) => children.iter().map(OctreeNode::len).sum(),
    }
  }

  pub fn is_empty(&self) -> bool {
    match self {
      OctreeNode::Leaf(coords) => coords.is_empty(),
      OctreeNode::Branch(children) => children.iter().all(OctreeNode::is_empty),
    }
  }

  /// Nodes in this subtree, itself included.
  pub fn node_count(&self) -> usize {
    match self {
      OctreeNode::Leaf(_) => 1,
      OctreeNode::Branch(children) => 1 + children.iter().map(OctreeNode::node_count).sum::<usize>(),
    }
  }

  pub fn leaf_count(&self) -> usize {
    match self {
      OctreeNode::Leaf(_) => 1,
      OctreeNode::Branch(children) => children.iter().map(OctreeNode::leaf_count).sum(),
    }
  }

  /// Levels below this node (a leaf has depth 0).
  pub fn depth(&self) -> u32 {
    match self {
      OctreeNode::Leaf(_) => 0,
      OctreeNode::Branch(children) => 1 + children.iter().map(OctreeNode::depth).max().unwrap_or(0),
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
