use super::*;
use crate::config::LatticeCacheConfig;
use crate::error::ConfigError;
use crate::types::Axis;

fn hierarchy<V>(dims: (u32, u32, u32), num_levels: u32) -> HierarchicalLatticeCache<V> {
  HierarchicalLatticeCache::new(HierarchyConfig::new(dims.into(), num_levels)).unwrap()
}

fn at(x: u32, y: u32, z: u32) -> LatticeCoord {
  LatticeCoord::new(x, y, z)
}

// =========================================================================
// Batch 1: Construction
// =========================================================================

#[test]
fn test_levels_are_created() {
  let cache = hierarchy::<&str>((128, 128, 128), 3);
  assert_eq!(cache.num_levels(), 3);
  assert_eq!(cache.base_dimensions(), Dimensions::cube(128));
  assert!(cache.is_empty());
}

#[test]
fn test_invalid_level_counts() {
  let dims = Dimensions::cube(128);
  assert_eq!(
    HierarchicalLatticeCache::<u8>::new(HierarchyConfig::new(dims, 0)).err(),
    Some(LatticeError::Config(ConfigError::NoLevels))
  );
  assert!(HierarchicalLatticeCache::<u8>::new(HierarchyConfig::new(dims, 40)).is_err());
}

#[test]
fn test_invalid_base_dimensions() {
  let config = HierarchyConfig::new(Dimensions::new(128, 0, 128), 3);
  assert_eq!(
    HierarchicalLatticeCache::<u8>::new(config).err(),
    Some(LatticeError::Config(ConfigError::ZeroDimension { axis: Axis::Y }))
  );
}

/// Levels past the base size clamp to a single cell per axis.
#[test]
fn test_deep_levels_clamp_to_one() {
  let cache = hierarchy::<u8>((8, 8, 8), 5);
  assert_eq!(cache.level_dimensions(3).unwrap(), Dimensions::cube(1));
  assert_eq!(cache.level_dimensions(4).unwrap(), Dimensions::cube(1));
}

#[test]
fn test_levels_inherit_base_settings() {
  let base = LatticeCacheConfig::new(Dimensions::cube(64))
    .with_initial_size(32)
    .with_octree(false);
  let config = HierarchyConfig::new(base.dimensions, 3).with_base(base);
  let cache = HierarchicalLatticeCache::<u8>::new(config).unwrap();
  for level in 0..3 {
    let level_cache = cache.level(level).unwrap();
    assert_eq!(level_cache.table_size(), 32);
    assert!(!level_cache.uses_octree());
  }
}

// =========================================================================
// Batch 2: Set / Get per Level
// =========================================================================

#[test]
fn test_set_and_get_each_level() {
  let mut cache = hierarchy((128, 128, 128), 3);
  for (level, value) in ["fine", "medium", "coarse"].into_iter().enumerate() {
    cache.set(at(64, 64, 64), value, level as u32).unwrap();
  }
  assert_eq!(cache.get_hierarchical(at(64, 64, 64), 0).unwrap(), Some(&"fine"));
  assert_eq!(cache.get_hierarchical(at(64, 64, 64), 1).unwrap(), Some(&"medium"));
  assert_eq!(cache.get_hierarchical(at(64, 64, 64), 2).unwrap(), Some(&"coarse"));
  assert_eq!(cache.len(), 3);
}

#[test]
fn test_get_missing_returns_none() {
  let cache = hierarchy::<&str>((128, 128, 128), 3);
  assert_eq!(cache.get_hierarchical(at(64, 64, 64), 0).unwrap(), None);
}

#[test]
fn test_set_updates_existing_value() {
  let mut cache = hierarchy((128, 128, 128), 3);
  assert_eq!(cache.set(at(64, 64, 64), "old", 0).unwrap(), None);
  assert_eq!(cache.set(at(64, 64, 64), "new", 0).unwrap(), Some("old"));
  assert_eq!(cache.get_hierarchical(at(64, 64, 64), 0).unwrap(), Some(&"new"));
}

#[test]
fn test_boundary_coordinates() {
  let mut cache = hierarchy((128, 128, 128), 3);
  cache.set(at(0, 0, 0), "origin", 0).unwrap();
  cache.set(at(127, 127, 127), "max", 0).unwrap();
  assert_eq!(cache.get_hierarchical(at(0, 0, 0), 0).unwrap(), Some(&"origin"));
  assert_eq!(cache.get_hierarchical(at(127, 127, 127), 2).unwrap(), None);
  assert_eq!(cache.get_hierarchical(at(127, 127, 127), 0).unwrap(), Some(&"max"));
}

#[test]
fn test_delete_at_level() {
  let mut cache = hierarchy((64, 64, 64), 2);
  cache.set(at(10, 10, 10), 1, 0).unwrap();
  cache.set(at(10, 10, 10), 2, 1).unwrap();

  // (11, 11, 11) shares the level-1 block of (10, 10, 10).
  assert!(cache.delete(at(11, 11, 11), 1).unwrap());
  assert_eq!(cache.get_hierarchical(at(10, 10, 10), 1).unwrap(), None);
  assert_eq!(cache.get_hierarchical(at(10, 10, 10), 0).unwrap(), Some(&1));
  assert!(!cache.delete(at(11, 11, 11), 0).unwrap());
}

#[test]
fn test_clear_empties_every_level() {
  let mut cache = hierarchy((32, 32, 32), 3);
  for level in 0..3 {
    cache.set(at(5, 5, 5), level, level).unwrap();
  }
  cache.clear();
  assert!(cache.is_empty());
}

// =========================================================================
// Batch 3: Coordinate Scaling
// =========================================================================

/// Base coordinates in the same 2x2x2 block share one level-1 entry.
#[test]
fn test_level_1_block_overwrite() {
  let mut cache = hierarchy((128, 128, 128), 3);
  cache.set(at(64, 64, 64), "value", 1).unwrap();
  cache.set(at(65, 65, 65), "updated", 1).unwrap();

  assert_eq!(cache.get_hierarchical(at(64, 64, 64), 1).unwrap(), Some(&"updated"));
  assert_eq!(cache.get_hierarchical(at(65, 65, 65), 1).unwrap(), Some(&"updated"));
  assert_eq!(cache.level(1).unwrap().len(), 1);
}

#[test]
fn test_level_2_block_lookup() {
  let mut cache = hierarchy((128, 128, 128), 3);
  cache.set(at(64, 64, 64), "value", 2).unwrap();
  for offset in 0..4 {
    let c = at(64 + offset, 64 + offset, 64 + offset);
    assert_eq!(cache.get_hierarchical(c, 2).unwrap(), Some(&"value"), "{}", c);
  }
  assert_eq!(cache.get_hierarchical(at(68, 64, 64), 2).unwrap(), None);
}

#[test]
fn test_scaling_keeps_levels_independent() {
  let mut cache = hierarchy((128, 128, 128), 3);
  cache.set(at(64, 64, 64), "level0", 0).unwrap();
  cache.set(at(64, 64, 64), "level1", 1).unwrap();
  cache.set(at(65, 65, 65), "level0_other", 0).unwrap();

  assert_eq!(cache.get_hierarchical(at(65, 65, 65), 0).unwrap(), Some(&"level0_other"));
  assert_eq!(cache.get_hierarchical(at(64, 64, 64), 0).unwrap(), Some(&"level0"));
  assert_eq!(cache.get_hierarchical(at(65, 65, 65), 1).unwrap(), Some(&"level1"));
}

#[test]
fn test_scale_to_level() {
  let cache = hierarchy::<u8>((128, 128, 128), 3);
  assert_eq!(cache.scale_to_level(at(64, 65, 66), 0).unwrap(), at(64, 65, 66));
  assert_eq!(cache.scale_to_level(at(64, 65, 66), 1).unwrap(), at(32, 32, 33));
  assert_eq!(cache.scale_to_level(at(64, 65, 66), 2).unwrap(), at(16, 16, 16));
}

#[test]
fn test_base_coordinates_are_validated_before_scaling() {
  let mut cache = hierarchy((128, 64, 32), 3);
  // (40 >> 2) = 10 would fit level 2's depth of 8 after scaling, but 40 is
  // outside the base depth of 32.
  let err = cache.set(at(0, 0, 40), 1, 2).unwrap_err();
  assert_eq!(
    err,
    LatticeError::OutOfBounds {
      axis: Axis::Z,
      value: 40,
      bound: 32
    }
  );
}

/// 100 >> 3 = 12 cells, but base 99 scales to 12: the trailing partial
/// block has no cell at that level.
#[test]
fn test_trailing_partial_block_is_out_of_bounds() {
  let mut cache = hierarchy((100, 100, 100), 4);
  assert_eq!(cache.level_dimensions(3).unwrap(), Dimensions::cube(12));
  assert!(matches!(
    cache.set(at(99, 0, 0), 1, 3),
    Err(LatticeError::OutOfBounds {
      axis: Axis::X,
      value: 12,
      bound: 12
    })
  ));
  assert!(cache.set(at(95, 0, 0), 1, 3).is_ok());
}

// =========================================================================
// Batch 4: Invalid Levels and Level Info
// =========================================================================

#[test]
fn test_invalid_level_everywhere() {
  let mut cache = hierarchy::<u8>((128, 128, 128), 3);
  let expected = LatticeError::InvalidLevel {
    level: 3,
    num_levels: 3,
  };
  assert_eq!(cache.set(at(1, 1, 1), 0, 3).unwrap_err(), expected);
  assert_eq!(cache.get_hierarchical(at(1, 1, 1), 3).unwrap_err(), expected);
  assert_eq!(cache.delete(at(1, 1, 1), 3).unwrap_err(), expected);
  assert_eq!(cache.level_dimensions(3).unwrap_err(), expected);
  assert_eq!(cache.level_statistics(3).unwrap_err(), expected);
  assert_eq!(cache.scale_to_level(at(1, 1, 1), 3).unwrap_err(), expected);
  assert!(cache.get_range_at_level(at(1, 1, 1), 1.0, 3).is_err());
  assert!(cache.level(5).is_err());
}

#[test]
fn test_level_dimensions() {
  let cache = hierarchy::<u8>((128, 128, 128), 4);
  assert_eq!(cache.level_dimensions(0).unwrap(), Dimensions::cube(128));
  assert_eq!(cache.level_dimensions(1).unwrap(), Dimensions::cube(64));
  assert_eq!(cache.level_dimensions(2).unwrap(), Dimensions::cube(32));
  assert_eq!(cache.level_dimensions(3).unwrap(), Dimensions::cube(16));
}

#[test]
fn test_non_power_of_two_dimensions() {
  let mut cache = hierarchy((100, 100, 100), 3);
  assert_eq!(cache.level_dimensions(1).unwrap(), Dimensions::cube(50));
  assert_eq!(cache.level_dimensions(2).unwrap(), Dimensions::cube(25));
  cache.set(at(50, 50, 50), "value", 0).unwrap();
  assert_eq!(cache.get_hierarchical(at(50, 50, 50), 0).unwrap(), Some(&"value"));
}

#[test]
fn test_asymmetric_dimensions() {
  let mut cache = hierarchy((128, 64, 32), 3);
  assert_eq!(cache.level_dimensions(1).unwrap(), Dimensions::new(64, 32, 16));
  assert_eq!(cache.level_dimensions(2).unwrap(), Dimensions::new(32, 16, 8));
  cache.set(at(64, 32, 16), "value", 2).unwrap();
  assert_eq!(cache.get_hierarchical(at(64, 32, 16), 2).unwrap(), Some(&"value"));
}

#[test]
fn test_level_statistics() {
  let mut cache = hierarchy((128, 128, 128), 3);
  let empty = cache.level_statistics(0).unwrap();
  assert_eq!(empty.load_factor, 0.0);
  assert_eq!(empty.collision_count, 0);

  cache.set(at(64, 64, 64), "value1", 0).unwrap();
  cache.set(at(32, 32, 32), "value2", 0).unwrap();
  let stats = cache.level_statistics(0).unwrap();
  assert_eq!(stats.entry_count, 2);
  assert!(stats.load_factor > 0.0);
  assert_eq!(cache.level_statistics(1).unwrap().entry_count, 0);
}

// =========================================================================
// Batch 5: Range Queries per Level
// =========================================================================

#[test]
fn test_range_at_level_scales_center_and_radius() {
  let mut cache = hierarchy((128, 128, 128), 3);
  cache.set(at(64, 64, 64), 'a', 1).unwrap(); // level 1: (32, 32, 32)
  cache.set(at(70, 64, 64), 'b', 1).unwrap(); // level 1: (35, 32, 32)
  cache.set(at(80, 64, 64), 'c', 1).unwrap(); // level 1: (40, 32, 32)

  // Base radius 6 -> level radius 3.
  let mut hits = cache.get_range_at_level(at(64, 64, 64), 6.0, 1).unwrap();
  hits.sort_by_key(|(coord, _)| *coord);
  assert_eq!(hits, vec![(at(32, 32, 32), &'a'), (at(35, 32, 32), &'b')]);

  // Nothing was written at level 0.
  assert!(cache.get_range_at_level(at(64, 64, 64), 6.0, 0).unwrap().is_empty());
}

#[test]
fn test_range_at_level_rejects_bad_radius() {
  let cache = hierarchy::<u8>((16, 16, 16), 2);
  assert!(matches!(
    cache.get_range_at_level(at(1, 1, 1), -2.0, 1),
    Err(LatticeError::InvalidRadius(_))
  ));
}
