//! Bounded memory tier and the public two-tier cache facade.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use log::warn;

use super::disk::DiskStore;
use super::model::CachedImage;

/// Maximum entries held in the memory tier.
pub const MEMORY_COUNT_LIMIT: usize = 100;

/// Maximum total cost held in the memory tier (50 MiB).
pub const MEMORY_COST_LIMIT: usize = 50 * 1024 * 1024;

struct MemoryEntry {
    image: CachedImage,
    cost: usize,
    last_used: u64,
}

/// Count- and cost-bounded cache with least-recently-used eviction.
///
/// Eviction runs on insert until both ceilings hold again. The exact
/// eviction order is not part of the cache contract, only the ceilings are.
struct MemoryCache {
    entries: HashMap<String, MemoryEntry>,
    total_cost: usize,
    tick: u64,
    count_limit: usize,
    cost_limit: usize,
}

impl MemoryCache {
    fn new(count_limit: usize, cost_limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            total_cost: 0,
            tick: 0,
            count_limit,
            cost_limit,
        }
    }

    fn get(&mut self, key: &str) -> Option<CachedImage> {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        entry.last_used = tick;
        Some(entry.image.clone())
    }

    fn insert(&mut self, key: String, image: CachedImage) {
        self.tick += 1;
        let cost = image.cost();
        if let Some(previous) = self.entries.insert(
            key,
            MemoryEntry {
                image,
                cost,
                last_used: self.tick,
            },
        ) {
            self.total_cost -= previous.cost;
        }
        self.total_cost += cost;
        self.evict_over_capacity();
    }

    fn evict_over_capacity(&mut self) {
        while self.entries.len() > self.count_limit || self.total_cost > self.cost_limit {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                self.total_cost -= entry.cost;
            }
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.total_cost -= entry.cost;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.total_cost = 0;
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Two-tier image cache keyed by absolute URL string.
///
/// The memory tier is bounded ([`MEMORY_COUNT_LIMIT`], [`MEMORY_COST_LIMIT`])
/// and synchronous; the disk tier is unbounded, best-effort, and served by a
/// dedicated background actor so no disk I/O ever runs on the caller's task.
/// One long-lived instance is shared by every view that renders thumbnails.
pub struct ImageCache {
    memory: Mutex<MemoryCache>,
    disk: DiskStore,
}

impl ImageCache {
    /// Create a cache persisting to `cache_dir`.
    ///
    /// Must be called within a Tokio runtime; the disk actor is spawned
    /// immediately. The directory may be deleted externally at any time -
    /// the cache degrades to memory-only behavior until it is recreated.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            memory: Mutex::new(MemoryCache::new(MEMORY_COUNT_LIMIT, MEMORY_COST_LIMIT)),
            disk: DiskStore::spawn(cache_dir.into()),
        }
    }

    /// Look up an image: memory hit first, then read-through from disk
    /// (repopulating the memory tier), then `None`. A `None` means the
    /// caller should fetch over the network and [`set`](Self::set) the
    /// result.
    pub async fn get(&self, url: &str) -> Option<CachedImage> {
        if let Some(hit) = self.lock_memory().get(url) {
            return Some(hit);
        }

        let data = self.disk.read(self.disk.file_path(url)).await?;
        let image = CachedImage::from_encoded(data);
        self.lock_memory().insert(url.to_string(), image.clone());
        Some(image)
    }

    /// Insert an image. The memory tier is written synchronously, so the
    /// image is visible to subsequent `get` calls before the disk write
    /// completes; the disk write itself is enqueued best-effort.
    pub fn set(&self, image: CachedImage, url: &str) {
        let data = image.shared_data();
        self.lock_memory().insert(url.to_string(), image);
        self.disk.save(self.disk.file_path(url), data);
    }

    /// Drop the memory tier synchronously and enqueue delete-and-recreate of
    /// the disk directory.
    pub fn clear(&self) {
        self.lock_memory().clear();
        self.disk.clear();
    }

    /// Drop one entry from the memory tier synchronously and enqueue the
    /// disk file's deletion.
    pub fn remove(&self, url: &str) {
        self.lock_memory().remove(url);
        self.disk.remove(self.disk.file_path(url));
    }

    #[cfg(test)]
    fn memory_len(&self) -> usize {
        self.lock_memory().len()
    }

    fn lock_memory(&self) -> MutexGuard<'_, MemoryCache> {
        self.memory.lock().unwrap_or_else(|poisoned| {
            warn!("image cache memory mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(byte: u8, len: usize) -> CachedImage {
        CachedImage::from_encoded(vec![byte; len])
    }

    // ------------------------------------------------------------------
    // Memory tier
    // ------------------------------------------------------------------

    #[test]
    fn test_memory_count_limit_evicts_least_recently_used() {
        let mut cache = MemoryCache::new(2, usize::MAX);
        cache.insert("a".to_string(), image(1, 10));
        cache.insert("b".to_string(), image(2, 10));

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());

        cache.insert("c".to_string(), image(3, 10));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_memory_cost_limit_evicts_until_under_ceiling() {
        let mut cache = MemoryCache::new(usize::MAX, 100);
        cache.insert("a".to_string(), image(1, 60));
        cache.insert("b".to_string(), image(2, 60));

        // 120 bytes exceeds the 100-byte ceiling; the older entry goes.
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert_eq!(cache.total_cost, 60);
    }

    #[test]
    fn test_memory_overwrite_replaces_cost() {
        let mut cache = MemoryCache::new(10, 1000);
        cache.insert("a".to_string(), image(1, 100));
        cache.insert("a".to_string(), image(2, 40));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_cost, 40);
        assert_eq!(cache.get("a").unwrap().data(), &[2; 40][..]);
    }

    #[test]
    fn test_memory_remove_and_clear_release_cost() {
        let mut cache = MemoryCache::new(10, 1000);
        cache.insert("a".to_string(), image(1, 100));
        cache.insert("b".to_string(), image(2, 100));

        cache.remove("a");
        assert_eq!(cache.total_cost, 100);

        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.total_cost, 0);
    }

    // ------------------------------------------------------------------
    // Two-tier facade
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_set_is_immediately_visible_to_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::new(dir.path());

        let url = "https://example.com/logo.png";
        cache.set(CachedImage::new(vec![7; 64], 8, 8, 1), url);

        let hit = cache.get(url).await.unwrap();
        assert_eq!(hit.data(), &[7; 64][..]);
        assert_eq!(hit.width(), 8);
    }

    #[tokio::test]
    async fn test_clear_hides_entries_even_after_disk_write() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::new(dir.path());

        let url = "https://example.com/logo.png";
        cache.set(CachedImage::new(vec![7; 64], 8, 8, 1), url);

        // Force the queued save to complete before clearing.
        assert!(cache.get("https://example.com/other.png").await.is_none());

        cache.clear();
        assert!(cache.get(url).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_then_get_without_flush_is_still_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::new(dir.path());

        let url = "https://example.com/logo.png";
        cache.set(CachedImage::new(vec![7; 64], 8, 8, 1), url);
        cache.clear();

        // The disk read is queued behind the save and the clear, so the
        // pre-clear file can never be observed.
        assert!(cache.get(url).await.is_none());
    }

    #[tokio::test]
    async fn test_disk_read_through_repopulates_memory() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://example.com/logo.png";

        let writer = ImageCache::new(dir.path());
        writer.set(CachedImage::new(vec![9; 32], 4, 4, 2), url);
        // Flush the writer's save job.
        assert!(writer.get("https://example.com/miss.png").await.is_none());

        // A fresh cache over the same directory only has the disk tier.
        let reader = ImageCache::new(dir.path());
        let rehydrated = reader.get(url).await.unwrap();
        assert_eq!(rehydrated.data(), &[9; 32][..]);
        // Dimensions are unknown after rehydration; cost falls back to the
        // payload length.
        assert_eq!(rehydrated.cost(), 32);
        assert_eq!(reader.memory_len(), 1);
    }

    #[tokio::test]
    async fn test_remove_drops_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::new(dir.path());

        let url = "https://example.com/logo.png";
        cache.set(CachedImage::new(vec![7; 64], 8, 8, 1), url);
        cache.remove(url);

        assert!(cache.get(url).await.is_none());
        assert_eq!(cache.memory_len(), 0);
    }

    #[tokio::test]
    async fn test_distinct_urls_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::new(dir.path());

        cache.set(CachedImage::new(vec![1; 8], 1, 1, 1), "https://example.com/a.png");
        cache.set(CachedImage::new(vec![2; 8], 1, 1, 1), "https://example.com/b.png");

        assert_eq!(
            cache.get("https://example.com/a.png").await.unwrap().data(),
            &[1; 8][..]
        );
        assert_eq!(
            cache.get("https://example.com/b.png").await.unwrap().data(),
            &[2; 8][..]
        );
    }
}
