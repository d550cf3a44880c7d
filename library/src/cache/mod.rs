use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::model::forest::Forest;
use crate::model::parameters::ForestKey;

pub const DEFAULT_FOREST_CACHE_SIZE: usize = 32;
/// Segments held across all cached forests (about 100 MB of lines).
pub const DEFAULT_CACHE_SEGMENT_BUDGET: usize = 1 << 21;

struct CachedForests {
  forests: LruCache<ForestKey, Arc<Forest>>,
  segments: usize,
}

/// Recently built forests, bounded both by entry count and by the total
/// number of segments held. A capacity or budget of zero turns the cache off.
pub struct ForestCache {
  inner: Option<Mutex<CachedForests>>,
  segment_budget: usize,
}

impl ForestCache {
  pub fn new(capacity: usize, segment_budget: usize) -> Self {
    let inner = NonZeroUsize::new(capacity)
      .filter(|_| segment_budget > 0)
      .map(|cap| {
        Mutex::new(CachedForests {
          forests: LruCache::new(cap),
          segments: 0,
        })
      });
    Self {
      inner,
      segment_budget,
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.inner.is_some()
  }

  pub fn get(&self, key: &ForestKey) -> Option<Arc<Forest>> {
    let inner = self.inner.as_ref()?;
    inner.lock().ok()?.forests.get(key).cloned()
  }

  /// Forests larger than the whole segment budget are never kept.
  pub fn put(&self, key: ForestKey, forest: Arc<Forest>) {
    let Some(inner) = &self.inner else {
      return;
    };
    let size = forest.count();
    if size > self.segment_budget {
      debug!("Forest of {} segments exceeds cache budget; not cached", size);
      return;
    }
    let Ok(mut cached) = inner.lock() else {
      return;
    };

    if let Some((_, replaced)) = cached.forests.push(key, forest) {
      cached.segments -= replaced.count();
    }
    cached.segments += size;
    while cached.segments > self.segment_budget {
      match cached.forests.pop_lru() {
        Some((_, evicted)) => cached.segments -= evicted.count(),
        None => break,
      }
    }
  }

  pub fn len(&self) -> usize {
    self
      .inner
      .as_ref()
      .and_then(|inner| inner.lock().ok().map(|c| c.forests.len()))
      .unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Segments currently held across all cached forests.
  pub fn segments(&self) -> usize {
    self
      .inner
      .as_ref()
      .and_then(|inner| inner.lock().ok().map(|c| c.segments))
      .unwrap_or(0)
  }
}

impl Default for ForestCache {
  fn default() -> Self {
    Self::new(DEFAULT_FOREST_CACHE_SIZE, DEFAULT_CACHE_SEGMENT_BUDGET)
  }
}
