//! Injected notifier for cache write-path events.
//!
//! A [`LatticeCache`](crate::LatticeCache) is generic over its observer, so
//! the default [`NoopObserver`] compiles away entirely. Observers only see
//! `set`/`delete`/`resize`; point reads never notify.

use crate::types::LatticeCoord;

/// A write had to walk past other entries in its bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionEvent {
  pub coord: LatticeCoord,
  pub slot: usize,
  /// Non-matching entries examined (always >= 1).
  pub chain_depth: usize,
}

/// A completed table resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeEvent {
  pub old_size: usize,
  pub new_size: usize,
  pub entry_count: usize,
  /// Rehash time in microseconds.
  pub elapsed_us: u64,
}

/// Receives cache events. Both methods default to doing nothing.
pub trait CacheObserver {
  fn on_collision(&mut self, _event: &CollisionEvent) {}

  fn on_resize(&mut self, _event: &ResizeEvent) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoopObserver;

impl CacheObserver for NoopObserver {}

impl<O: CacheObserver + ?Sized> CacheObserver for Box<O> {
  fn on_collision(&mut self, event: &CollisionEvent) {
    (**self).on_collision(event);
  }

  fn on_resize(&mut self, event: &ResizeEvent) {
    (**self).on_resize(event);
  }
}

impl<O: CacheObserver + ?Sized> CacheObserver for &mut O {
  fn on_collision(&mut self, event: &CollisionEvent) {
    (**self).on_collision(event);
  }

  fn on_resize(&mut self, event: &ResizeEvent) {
    (**self).on_resize(event);
  }
}
