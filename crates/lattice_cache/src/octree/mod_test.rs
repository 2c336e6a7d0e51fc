use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::test_utils::CoordStream;

fn linear_range(coords: &[LatticeCoord], center: &LatticeCoord, radius_sq: u128) -> Vec<LatticeCoord> {
  let mut out: Vec<_> = coords
    .iter()
    .filter(|c| c.distance_squared(center) <= radius_sq)
    .copied()
    .collect();
  out.sort();
  out
}

fn sorted(mut coords: Vec<LatticeCoord>) -> Vec<LatticeCoord> {
  coords.sort();
  coords
}

fn populated(dims: Dimensions, coords: &[LatticeCoord]) -> Octree {
  let mut tree = Octree::new(&dims, OctreeConfig::default());
  for coord in coords {
    assert!(tree.insert(*coord));
  }
  tree
}

// =========================================================================
// Batch 1: Occupancy Mirror
// =========================================================================

#[test]
fn test_insert_is_idempotent() {
  let mut tree = Octree::new(&Dimensions::cube(10), OctreeConfig::default());
  let c = LatticeCoord::new(1, 2, 3);
  assert!(tree.insert(c));
  assert!(!tree.insert(c), "second insert of the same coordinate");
  assert_eq!(tree.len(), 1);
  assert!(tree.contains(&c));
}

#[test]
fn test_out_of_domain_coordinates_are_rejected() {
  let mut tree = Octree::new(&Dimensions::new(4, 5, 6), OctreeConfig::default());
  assert!(!tree.insert(LatticeCoord::new(4, 0, 0)));
  assert!(!tree.contains(&LatticeCoord::new(0, 0, 6)));
  assert!(!tree.remove(&LatticeCoord::new(0, 5, 0)));
  assert!(tree.is_empty());
}

#[test]
fn test_remove_then_query_excludes_coordinate() {
  let dims = Dimensions::cube(20);
  let coords = CoordStream::distinct(3, 200, &dims);
  let mut tree = populated(dims, &coords);

  let gone = coords[17];
  assert!(tree.remove(&gone));
  assert!(!tree.remove(&gone));
  assert_eq!(tree.len(), 199);
  assert!(!tree.query_range(&gone, 0).contains(&gone));
  assert!(!tree.query_range(&gone, 50).contains(&gone));
}

#[test]
fn test_rebuild_replaces_contents() {
  let dims = Dimensions::cube(32);
  let first = CoordStream::distinct(1, 100, &dims);
  let second = CoordStream::distinct(2, 60, &dims);
  let mut tree = populated(dims, &first);

  tree.rebuild(second.iter().copied());
  assert_eq!(tree.len(), 60);
  assert_eq!(sorted(tree.coords()), sorted(second));
}

#[test]
fn test_clear_resets_to_single_leaf() {
  let dims = Dimensions::cube(50);
  let mut tree = populated(dims, &CoordStream::distinct(5, 500, &dims));
  tree.clear();
  assert!(tree.is_empty());
  assert_eq!(
    tree.statistics(),
    OctreeStatistics {
      node_count: 1,
      leaf_count: 1,
      depth: 0,
      len: 0
    }
  );
}

// =========================================================================
// Batch 2: Shape
// =========================================================================

/// 1000 spread-out points in 100^3: node count stays well below entry count
/// and depth stays close to log8(entries / leaf_capacity).
#[test]
fn test_spread_points_keep_tree_compact() {
  let dims = Dimensions::cube(100);
  let coords = CoordStream::distinct(42, 1000, &dims);
  let tree = populated(dims, &coords);
  let stats = tree.statistics();

  assert_eq!(stats.len, 1000);
  assert!(
    stats.node_count <= coords.len() / 2,
    "node count {} should be O(entries), not one node per entry",
    stats.node_count
  );
  let balanced = tree.config().balanced_depth(coords.len());
  assert!(
    stats.depth <= balanced + 2,
    "depth {} vs balanced {}",
    stats.depth,
    balanced
  );
}

/// Removing every coordinate merges the tree back into its root.
#[test]
fn test_remove_all_merges_to_root() {
  let dims = Dimensions::cube(64);
  let coords = CoordStream::distinct(9, 800, &dims);
  let mut tree = populated(dims, &coords);
  assert!(tree.statistics().depth > 0);

  for coord in &coords {
    assert!(tree.remove(coord));
  }
  assert_eq!(tree.statistics().node_count, 1);
  assert!(tree.is_empty());
}

// =========================================================================
// Batch 3: Range Query Equivalence
// =========================================================================

#[test]
fn test_concrete_scenario_matches_linear_scan() {
  let dims = Dimensions::cube(100);
  let coords = CoordStream::distinct(42, 1000, &dims);
  let tree = populated(dims, &coords);

  let center = LatticeCoord::new(50, 50, 50);
  let found = sorted(tree.query_range(&center, 100));
  assert_eq!(found, linear_range(&coords, &center, 100));
}

#[test]
fn test_random_queries_match_linear_scan() {
  let mut rng = StdRng::seed_from_u64(0x1a77_1ce);
  let dims = Dimensions::new(60, 35, 90);
  let coords = CoordStream::distinct(11, 1500, &dims);
  let tree = populated(dims, &coords);

  for _ in 0..200 {
    // Centers may fall outside the domain.
    let center = LatticeCoord::new(
      rng.random_range(0..80),
      rng.random_range(0..50),
      rng.random_range(0..110),
    );
    let radius_sq = rng.random_range(0..400u128);
    let found = tree.query_range(&center, radius_sq);
    let unique: HashSet<_> = found.iter().collect();
    assert_eq!(unique.len(), found.len(), "query returned duplicates");
    assert_eq!(
      sorted(found),
      linear_range(&coords, &center, radius_sq),
      "center {} radius_sq {}",
      center,
      radius_sq
    );
  }
}

#[test]
fn test_zero_radius_returns_exact_match_only() {
  let dims = Dimensions::cube(16);
  let coords = CoordStream::distinct(4, 300, &dims);
  let tree = populated(dims, &coords);

  assert_eq!(tree.query_range(&coords[0], 0), vec![coords[0]]);

  let absent = (0..16)
    .map(|x| LatticeCoord::new(x, 0, 0))
    .find(|c| !coords.contains(c));
  if let Some(absent) = absent {
    assert!(tree.query_range(&absent, 0).is_empty());
  }
}

#[test]
fn test_ties_at_radius_are_inclusive() {
  let dims = Dimensions::cube(32);
  let center = LatticeCoord::new(10, 10, 10);
  let on_sphere = LatticeCoord::new(13, 14, 10); // 3-4-5 triangle
  let outside = LatticeCoord::new(13, 14, 11);
  let tree = populated(dims, &[on_sphere, outside]);

  assert_eq!(tree.query_range(&center, 25), vec![on_sphere]);
}

#[test]
fn test_far_center_returns_nothing() {
  let dims = Dimensions::cube(10);
  let tree = populated(dims, &CoordStream::distinct(8, 100, &dims));
  assert!(tree
    .query_range(&LatticeCoord::new(1000, 1000, 1000), 100)
    .is_empty());
}
