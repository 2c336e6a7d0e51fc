//! lattice_cache - Spatial key-value cache keyed by 3D lattice coordinates
//!
//! Values live in a chained hash table addressed by a spatially coherent
//! lattice hash, while an octree tracks the same key set to answer radius
//! queries without scanning the table. A hierarchical variant keeps one cache
//! per power-of-two resolution for coarse-to-fine workloads.
//!
//! # Features
//!
//! - **Lattice Hash**: fixed-point multiplicative hash over three
//!   irrational multipliers; deterministic across platforms
//! - **Bucket Store**: chained buckets with automatic doubling under a load
//!   factor bound
//! - **Spatial Index**: octree with split/merge thresholds and sphere pruning
//! - **Hierarchical Cache**: independent caches at `W>>L × H>>L × D>>L`
//! - **Observers**: collision/resize notifications, with an optional
//!   metrics collector (`metrics` feature)
//!
//! # Example
//!
//! ```ignore
//! use lattice_cache::{Dimensions, LatticeCache, LatticeCacheConfig, LatticeCoord};
//!
//! let config = LatticeCacheConfig::new(Dimensions::cube(100));
//! let mut cache = LatticeCache::new(config)?;
//!
//! cache.set(LatticeCoord::new(50, 50, 50), 0.25)?;
//! cache.set(LatticeCoord::new(52, 50, 50), 0.5)?;
//!
//! for (coord, value) in cache.get_range(LatticeCoord::new(50, 50, 50), 3.0)? {
//!     println!("{coord}: {value}");
//! }
//! ```

pub mod constants;
pub mod error;
pub mod hash;
pub mod types;

// Re-export commonly used items
pub use constants::{DEFAULT_MAX_LOAD_FACTOR, DEFAULT_TABLE_SIZE, HASH_MULTIPLIERS};
pub use error::{ConfigError, LatticeError, Result};
pub use hash::{hash3d, hash_coord};
pub use types::{radius_squared, Axis, Dimensions, LatticeCoord};

// Bucket store
pub mod table;
pub use table::{BucketTable, Entry};

// Spatial index
pub mod octree;
pub use octree::{Octree, OctreeConfig};

// Configuration and statistics
pub mod config;
pub mod stats;
pub use config::{HierarchyConfig, LatticeCacheConfig};
pub use stats::{CacheStatistics, OctreeStatistics};

// Observer hooks and metrics collection
pub mod metrics;
pub mod observer;
pub use observer::{CacheObserver, CollisionEvent, NoopObserver, ResizeEvent};

// Caches
pub mod cache;
pub mod hierarchy;
pub use cache::LatticeCache;
pub use hierarchy::HierarchicalLatticeCache;

#[cfg(test)]
mod test_utils;
