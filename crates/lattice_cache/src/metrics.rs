//! Collision and resize metrics for lattice caches.
//!
//! Feature-gated and runtime-toggled: without the `metrics` feature every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use lattice_cache::metrics::{CacheMetrics, COLLECT_METRICS};
//! use lattice_cache::{LatticeCache, LatticeCacheConfig};
//!
//! // Compile with --features metrics
//! let config = LatticeCacheConfig::new((100, 100, 100).into());
//! let mut cache = LatticeCache::with_observer(config, CacheMetrics::new())?;
//! cache.set((1, 2, 3).into(), 0.5)?;
//!
//! println!("collisions: {}", cache.observer().total_collisions);
//!
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::observer::{CacheObserver, CollisionEvent, ResizeEvent};

/// Chain-depth histogram buckets; the last one also counts deeper chains.
pub const DEPTH_BUCKETS: usize = 16;

/// Resize timings kept by [`CacheMetrics`].
pub const RESIZE_HISTORY: usize = 64;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Rolling window of recent values (e.g. resize timings).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    /// Get the number of values in the window.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the window is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear all values.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }

}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    /// Compute the sum of all values.
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    /// Compute the average of all values.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Smallest and largest value, if any.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.buffer.iter().min()?;
        let max = self.buffer.iter().max()?;
        Some((*min, *max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(RESIZE_HISTORY)
    }
}

/// Collision and resize statistics gathered through [`CacheObserver`].
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    // Collisions
    /// Collision events by chain depth (index = depth, last bucket saturates).
    pub collisions_by_depth: [u64; DEPTH_BUCKETS],
    /// Sum of chain depths over all collision events.
    pub total_collisions: u64,

    // Resizes
    /// Rolling window of rehash times in microseconds.
    pub resize_timings: RollingWindow<u64>,
    /// Last rehash time in microseconds.
    pub last_resize_us: u64,
    /// Table size after the last resize (0 before any).
    pub table_size: usize,
    /// Resizes seen this session.
    pub total_resizes: u64,
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self {
            collisions_by_depth: [0; DEPTH_BUCKETS],
            total_collisions: 0,
            resize_timings: RollingWindow::default(),
            last_resize_us: 0,
            table_size: 0,
            total_resizes: 0,
        }
    }
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the histogram and timing history.
    pub fn reset(&mut self) {
        self.collisions_by_depth.fill(0);
        self.resize_timings.clear();
        self.last_resize_us = 0;
        // total_collisions and total_resizes are cumulative
    }

    /// Record one collision at `chain_depth`.
    pub fn record_collision(&mut self, chain_depth: usize) {
        if !is_enabled() || chain_depth == 0 {
            return;
        }
        let bucket = chain_depth.min(DEPTH_BUCKETS - 1);
        self.collisions_by_depth[bucket] += 1;
        self.total_collisions += chain_depth as u64;
    }

    /// Record a completed resize.
    pub fn record_resize(&mut self, new_size: usize, elapsed_us: u64) {
        if !is_enabled() {
            return;
        }
        self.resize_timings.push(elapsed_us);
        self.last_resize_us = elapsed_us;
        self.table_size = new_size;
        self.total_resizes += 1;
    }

    /// Collision events across all depths.
    pub fn collision_events(&self) -> u64 {
        self.collisions_by_depth.iter().sum()
    }

    /// Deepest histogram bucket with any events.
    pub fn max_depth_seen(&self) -> Option<usize> {
        self.collisions_by_depth.iter().rposition(|count| *count > 0)
    }

    pub fn avg_resize_us(&self) -> f64 {
        self.resize_timings.average()
    }
}

impl CacheObserver for CacheMetrics {
    fn on_collision(&mut self, event: &CollisionEvent) {
        self.record_collision(event.chain_depth);
    }

    fn on_resize(&mut self, event: &ResizeEvent) {
        self.record_resize(event.new_size, event.elapsed_us);
    }
}
