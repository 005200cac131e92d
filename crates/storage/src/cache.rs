use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use tracing::{debug, info, warn};

use civdash_core::config::DataConfig;
use civdash_core::TimeSeriesPoint;

use crate::error::StorageError;
use crate::source::SeriesSource;

/// Cached series entry.
struct CachedSeries {
    points: Arc<[TimeSeriesPoint]>,
    loaded_at: DateTime<Utc>,
}

/// Keyed store of the last-loaded series per source, with explicit invalidation.
///
/// Entries live until invalidated, evicted by LRU pressure, or (when a TTL is
/// set) until they age out.
pub struct SeriesCache {
    entries: Mutex<LruCache<String, CachedSeries>>,
    ttl: Option<Duration>,
}

impl SeriesCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: None,
        }
    }

    /// Capacity and TTL from the data settings.
    pub fn from_config(config: &DataConfig) -> Self {
        let cache = Self::new(config.cache_capacity);
        let Some(secs) = config.cache_ttl_secs else {
            return cache;
        };
        match i64::try_from(secs).ok().and_then(Duration::try_seconds) {
            Some(ttl) => cache.with_ttl(ttl),
            None => {
                warn!(secs, "cache TTL out of range, entries never expire");
                cache
            }
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CachedSeries>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_fresh(&self, entry: &CachedSeries, now: DateTime<Utc>) -> bool {
        match self.ttl {
            Some(ttl) => now - entry.loaded_at < ttl,
            None => true,
        }
    }

    /// Cached series for `id`, dropping it if it has aged out.
    pub fn get(&self, id: &str) -> Option<Arc<[TimeSeriesPoint]>> {
        let now = Utc::now();
        let mut entries = self.lock();
        let fresh = entries.get(id).map(|e| self.is_fresh(e, now))?;
        if fresh {
            entries.get(id).map(|e| e.points.clone())
        } else {
            debug!(source = %id, "cache entry expired");
            entries.pop(id);
            None
        }
    }

    /// Store `points` under `id`, replacing any previous entry.
    pub fn insert(&self, id: String, points: Vec<TimeSeriesPoint>) -> Arc<[TimeSeriesPoint]> {
        let points: Arc<[TimeSeriesPoint]> = points.into();
        self.lock().put(
            id,
            CachedSeries {
                points: points.clone(),
                loaded_at: Utc::now(),
            },
        );
        points
    }

    /// Return the cached series for `source`, loading it on a miss.
    ///
    /// The lock is released while the source loads; concurrent misses on the
    /// same key may both load, and the last one wins.
    pub async fn get_or_load<S>(&self, source: &S) -> Result<Arc<[TimeSeriesPoint]>, StorageError>
    where
        S: SeriesSource + ?Sized,
    {
        let id = source.id();
        if let Some(points) = self.get(&id) {
            debug!(source = %id, "cache hit");
            return Ok(points);
        }

        info!(source = %id, "cache miss, loading");
        let points = source.load().await?;
        Ok(self.insert(id, points))
    }

    /// Drop the entry for `id`. Returns whether one was present.
    pub fn invalidate(&self, id: &str) -> bool {
        let removed = self.lock().pop(id).is_some();
        if removed {
            debug!(source = %id, "cache entry invalidated");
        }
        removed
    }

    pub fn invalidate_all(&self) {
        self.lock().clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    pub fn loaded_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.lock().peek(id).map(|e| e.loaded_at)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        id: &'static str,
        loads: AtomicUsize,
    }

    impl CountingSource {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                loads: AtomicUsize::new(0),
            }
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SeriesSource for CountingSource {
        fn id(&self) -> String {
            self.id.to_string()
        }

        async fn load(&self) -> Result<Vec<TimeSeriesPoint>, StorageError> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst) as f64;
            Ok(vec![TimeSeriesPoint::new(2020, 40.0 + n, 70.0)])
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SeriesSource for FailingSource {
        fn id(&self) -> String {
            "failing".into()
        }

        async fn load(&self) -> Result<Vec<TimeSeriesPoint>, StorageError> {
            Err(StorageError::NotFound("failing".into()))
        }
    }

    #[tokio::test]
    async fn second_get_is_a_hit() {
        let cache = SeriesCache::new(4);
        let source = CountingSource::new("a");

        let first = cache.get_or_load(&source).await.unwrap();
        let second = cache.get_or_load(&source).await.unwrap();

        assert_eq!(source.loads(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.loaded_at("a").is_some());
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache = SeriesCache::new(4);
        let source = CountingSource::new("a");

        cache.get_or_load(&source).await.unwrap();
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));

        let reloaded = cache.get_or_load(&source).await.unwrap();
        assert_eq!(source.loads(), 2);
        assert_eq!(reloaded[0].female, 41.0);
    }

    #[tokio::test]
    async fn invalidate_all_clears_every_key() {
        let cache = SeriesCache::new(4);
        let a = CountingSource::new("a");
        let b = CountingSource::new("b");
        cache.get_or_load(&a).await.unwrap();
        cache.get_or_load(&b).await.unwrap();
        assert_eq!(cache.len(), 2);

        cache.invalidate_all();
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }

    #[tokio::test]
    async fn lru_evicts_oldest_key() {
        let cache = SeriesCache::new(1);
        let a = CountingSource::new("a");
        let b = CountingSource::new("b");
        cache.get_or_load(&a).await.unwrap();
        cache.get_or_load(&b).await.unwrap();

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[tokio::test]
    async fn expired_entry_is_reloaded() {
        let cache = SeriesCache::new(4).with_ttl(Duration::zero());
        let source = CountingSource::new("a");
        cache.get_or_load(&source).await.unwrap();
        cache.get_or_load(&source).await.unwrap();
        assert_eq!(source.loads(), 2);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache = SeriesCache::new(4);
        assert!(cache.get_or_load(&FailingSource).await.is_err());
        assert!(!cache.contains("failing"));
    }

    fn data_config(ttl: Option<u64>) -> DataConfig {
        DataConfig {
            db_path: "civ_dash.db".into(),
            table: "labour_gender_gap".into(),
            json_file: None,
            cache_capacity: 2,
            cache_ttl_secs: ttl,
        }
    }

    #[test]
    fn from_config_sets_ttl() {
        assert_eq!(SeriesCache::from_config(&data_config(None)).ttl, None);
        assert_eq!(
            SeriesCache::from_config(&data_config(Some(90))).ttl,
            Some(Duration::seconds(90))
        );
        assert_eq!(SeriesCache::from_config(&data_config(Some(u64::MAX))).ttl, None);
    }

    #[tokio::test]
    async fn configured_ttl_keeps_fresh_entries() {
        let cache = SeriesCache::from_config(&data_config(Some(3600)));
        let source = CountingSource::new("a");
        cache.get_or_load(&source).await.unwrap();
        cache.get_or_load(&source).await.unwrap();
        assert_eq!(source.loads(), 1);
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let cache = SeriesCache::new(0);
        cache.insert("x".into(), vec![TimeSeriesPoint::new(2020, 1.0, 2.0)]);
        assert_eq!(cache.len(), 1);
    }
}
