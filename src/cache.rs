//! Bounded memoization for coordinate transforms

use std::sync::Arc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use crossbeam::queue::SegQueue;

use crate::config::DEFAULT_CACHE_CAPACITY;

/// Which way a cached transform went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Projected (easting, northing) to WGS-84 (lat, lon)
    Forward,
    /// WGS-84 (lat, lon) to projected (easting, northing)
    Inverse,
}

/// Cache key: the raw bits of both inputs plus the direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    a: u64,
    b: u64,
    direction: Direction,
}

impl CacheKey {
    /// Builds a key from two input values
    pub fn new(a: f64, b: f64, direction: Direction) -> Self {
        Self {
            a: a.to_bits(),
            b: b.to_bits(),
            direction,
        }
    }
}

/// Concurrent FIFO cache for transform results.
///
/// Eviction follows insertion order only; reads never refresh an entry.
/// The first value stored for a key is kept, so repeated lookups return
/// identical bits.
pub struct TransformCache {
    entries: Arc<DashMap<CacheKey, (f64, f64)>>,
    order: Arc<SegQueue<CacheKey>>,
    capacity: usize,
}

impl TransformCache {
    /// Creates a new transform cache
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries (clamped to at least 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            order: Arc::new(SegQueue::new()),
            capacity: capacity.max(1),
        }
    }

    /// Gets a cached value
    pub fn get(&self, key: &CacheKey) -> Option<(f64, f64)> {
        self.entries.get(key).map(|entry| *entry.value())
    }

    /// Stores a value unless the key is already present, then evicts the
    /// oldest entries down to capacity. Returns the value held for the key.
    pub fn insert(&self, key: CacheKey, value: (f64, f64)) -> (f64, f64) {
        // The entry guard holds a shard lock; release it before evicting.
        let stored = match self.entries.entry(key) {
            Entry::Occupied(existing) => return *existing.get(),
            Entry::Vacant(slot) => {
                slot.insert(value);
                self.order.push(key);
                value
            }
        };

        while self.entries.len() > self.capacity {
            match self.order.pop() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        stored
    }

    /// Returns the cached value or computes, stores and returns it.
    /// Errors from `compute` are passed through and never cached.
    pub fn get_or_try_insert_with<E, F>(&self, key: CacheKey, compute: F) -> Result<(f64, f64), E>
    where
        F: FnOnce() -> Result<(f64, f64), E>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        let value = compute()?;
        Ok(self.insert(key, value))
    }

    /// Clears the cache
    pub fn clear(&self) {
        self.entries.clear();

        while self.order.pop().is_some() {}
    }

    /// Returns the current number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Clone for TransformCache {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            order: Arc::clone(&self.order),
            capacity: self.capacity,
        }
    }
}

impl Default for TransformCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: usize) -> CacheKey {
        CacheKey::new(i as f64, 0.0, Direction::Forward)
    }

    #[test]
    fn test_cache_basic() {
        let cache = TransformCache::new(2);

        cache.insert(key(0), (1.0, 2.0));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key(0)), Some((1.0, 2.0)));
    }

    #[test]
    fn test_direction_is_part_of_key() {
        let cache = TransformCache::new(4);

        cache.insert(CacheKey::new(1.0, 2.0, Direction::Forward), (10.0, 20.0));
        cache.insert(CacheKey::new(1.0, 2.0, Direction::Inverse), (30.0, 40.0));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&CacheKey::new(1.0, 2.0, Direction::Inverse)), Some((30.0, 40.0)));
    }

    #[test]
    fn test_cache_fifo_eviction() {
        let cache = TransformCache::new(2);

        cache.insert(key(0), (0.0, 0.0));
        cache.insert(key(1), (1.0, 1.0));
        // A read must not protect the oldest entry.
        assert!(cache.get(&key(0)).is_some());
        cache.insert(key(2), (2.0, 2.0));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(0)).is_none());
        assert!(cache.get(&key(1)).is_some());
        assert!(cache.get(&key(2)).is_some());
    }

    #[test]
    fn test_first_value_wins() {
        let cache = TransformCache::new(4);

        cache.insert(key(0), (1.0, 1.0));
        let held = cache.insert(key(0), (9.0, 9.0));

        assert_eq!(held, (1.0, 1.0));
        assert_eq!(cache.get(&key(0)), Some((1.0, 1.0)));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = TransformCache::new(4);

        let result: Result<(f64, f64), &str> = cache.get_or_try_insert_with(key(0), || Err("boom"));
        assert!(result.is_err());
        assert!(cache.is_empty());

        let result: Result<(f64, f64), &str> = cache.get_or_try_insert_with(key(0), || Ok((3.0, 4.0)));
        assert_eq!(result, Ok((3.0, 4.0)));

        let result: Result<(f64, f64), &str> = cache.get_or_try_insert_with(key(0), || Ok((5.0, 6.0)));
        assert_eq!(result, Ok((3.0, 4.0)));
    }

    #[test]
    fn test_cache_concurrent_access() {
        use std::thread;

        let cache = TransformCache::new(100);

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let cache_clone = cache.clone();
                thread::spawn(move || {
                    for j in 0..100 {
                        cache_clone.insert(key(i * 100 + j), (i as f64, j as f64));
                        let _ = cache_clone.get(&key(i * 100 + j));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 100);
    }

    #[test]
    fn test_cache_clear() {
        let cache = TransformCache::new(10);

        cache.insert(key(0), (1.0, 1.0));
        cache.insert(key(1), (2.0, 2.0));

        assert_eq!(cache.len(), 2);

        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }
}
