//! Lock-free in-memory store of fetched DEM rasters

use std::sync::Arc;

use bytes::Bytes;
use crossbeam::queue::SegQueue;
use dashmap::DashMap;
use serde::Serialize;

use crate::dem::Dataset;
use crate::geometry::{BoundingBox, RASTER_DECIMALS};

/// Cache key: the provider-facing bounding box plus dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterKey {
    dataset: Dataset,
    // Box corners in units of 10^-RASTER_DECIMALS degrees
    corners: [i64; 4],
}

impl RasterKey {
    pub fn new(bbox: &BoundingBox, dataset: Dataset) -> Self {
        let scale = 10f64.powi(RASTER_DECIMALS as i32);
        let corners = bbox.to_array().map(|v| (v * scale).round() as i64);
        Self { dataset, corners }
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }
}

/// Bounded raster cache shared between request handlers
///
/// Eviction is first-in first-out: reads do not refresh an entry, and the
/// insertion queue holds each cached key exactly once.
pub struct DemCache {
    cache: Arc<DashMap<RasterKey, Bytes>>,
    order: Arc<SegQueue<RasterKey>>,
    max_entries: usize,
}

impl DemCache {
    /// Creates a new cache
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of rasters to keep (at least 1)
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            order: Arc::new(SegQueue::new()),
            max_entries: max_entries.max(1),
        }
    }

    pub fn get(&self, key: &RasterKey) -> Option<Bytes> {
        self.cache.get(key).map(|entry| entry.value().clone())
    }

    /// Stores a raster, evicting the oldest entries when full
    ///
    /// Replacing the bytes of a cached key keeps its place in the queue.
    pub fn put(&self, key: RasterKey, data: Bytes) {
        if self.cache.contains_key(&key) {
            self.cache.insert(key, data);
            return;
        }

        while self.cache.len() >= self.max_entries {
            match self.order.pop() {
                Some(old_key) => {
                    self.cache.remove(&old_key);
                }
                None => break,
            }
        }

        if self.cache.insert(key, data).is_none() {
            self.order.push(key);
        }
    }

    pub fn clear(&self) {
        self.cache.clear();

        while self.order.pop().is_some() {}
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let total_bytes: usize = self.cache.iter().map(|entry| entry.value().len()).sum();

        CacheStats {
            entry_count: self.cache.len(),
            total_bytes,
            max_entries: self.max_entries,
        }
    }
}

impl Clone for DemCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            order: Arc::clone(&self.order),
            max_entries: self.max_entries,
        }
    }
}

impl Default for DemCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_bytes: usize,
    pub max_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(offset: f64, dataset: Dataset) -> RasterKey {
        RasterKey::new(&BoundingBox::new(offset, 0.0, offset + 0.1, 0.1), dataset)
    }

    #[test]
    fn test_cache_basic() {
        let cache = DemCache::new(2);
        cache.put(key(0.0, Dataset::Cop30), Bytes::from_static(b"II*\0"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key(0.0, Dataset::Cop30)).unwrap(), Bytes::from_static(b"II*\0"));
        assert!(cache.get(&key(0.0, Dataset::SrtmGl1)).is_none());
    }

    #[test]
    fn test_key_ignores_sub_precision_noise() {
        let a = RasterKey::new(&BoundingBox::new(1.0, 2.0, 3.0, 4.0), Dataset::Cop30);
        let b = RasterKey::new(&BoundingBox::new(1.000000001, 2.0, 3.0, 4.0), Dataset::Cop30);
        assert_eq!(a, b);
        assert_eq!(a.dataset(), Dataset::Cop30);
    }

    #[test]
    fn test_cache_eviction() {
        let cache = DemCache::new(2);

        cache.put(key(0.0, Dataset::Cop30), Bytes::from_static(b"a"));
        cache.put(key(1.0, Dataset::Cop30), Bytes::from_static(b"b"));
        cache.put(key(2.0, Dataset::Cop30), Bytes::from_static(b"c"));

        assert!(cache.len() <= 2);
        assert!(cache.get(&key(2.0, Dataset::Cop30)).is_some());
    }

    #[test]
    fn test_reads_do_not_grow_queue() {
        let cache = DemCache::new(4);
        let k = key(0.0, Dataset::Cop30);
        cache.put(k, Bytes::from_static(b"a"));

        for _ in 0..10_000 {
            assert!(cache.get(&k).is_some());
        }
        cache.put(k, Bytes::from_static(b"a2"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.order.len(), 1);
    }

    #[test]
    fn test_eviction_is_first_in_first_out() {
        let cache = DemCache::new(2);
        let (a, b, c) = (
            key(0.0, Dataset::Cop30),
            key(1.0, Dataset::Cop30),
            key(2.0, Dataset::Cop30),
        );

        cache.put(a, Bytes::from_static(b"a"));
        cache.put(b, Bytes::from_static(b"b"));
        assert!(cache.get(&a).is_some());
        cache.put(c, Bytes::from_static(b"c"));

        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());
        assert!(cache.get(&c).is_some());
        assert_eq!(cache.order.len(), 2);
    }

    #[test]
    fn test_replacing_entry_does_not_evict() {
        let cache = DemCache::new(2);

        cache.put(key(0.0, Dataset::Cop30), Bytes::from_static(b"a"));
        cache.put(key(1.0, Dataset::Cop30), Bytes::from_static(b"b"));
        cache.put(key(1.0, Dataset::Cop30), Bytes::from_static(b"b2"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key(1.0, Dataset::Cop30)).unwrap(), Bytes::from_static(b"b2"));
    }

    #[test]
    fn test_cache_concurrent_access() {
        use std::thread;

        let cache = DemCache::new(50);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache_clone = cache.clone();
                thread::spawn(move || {
                    for j in 0..50 {
                        let k = key(i as f64 * 10.0 + j as f64 * 0.1, Dataset::Cop30);
                        cache_clone.put(k, Bytes::from(vec![i as u8, j as u8]));
                        let _ = cache_clone.get(&k);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Concurrent writers may each overshoot by one before evicting
        assert!(cache.len() <= 50 + 8);
    }

    #[test]
    fn test_cache_clear_and_stats() {
        let cache = DemCache::new(10);

        cache.put(key(0.0, Dataset::Cop30), Bytes::from_static(b"abc"));
        cache.put(key(1.0, Dataset::Cop90), Bytes::from_static(b"de"));

        let stats = cache.stats();
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.total_bytes, 5);
        assert_eq!(stats.max_entries, 10);

        cache.clear();
        assert!(cache.is_empty());
    }
}
