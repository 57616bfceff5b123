use crate::core::cache::Cache;
use crate::core::quote::{CACHE_TTL, UfQuote};
use crate::resolver::UfResolver;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Date-keyed memoization layer in front of the resolver.
///
/// Successful quotes are cached for 24 hours; default-valued quotes are
/// never cached, so a day with no reachable source retries the full
/// chain on every call. Cached dates are tracked in an index owned by
/// this layer, so clearing the cache never depends on backend key
/// scanning.
pub struct RateCache {
    store: Arc<dyn Cache<NaiveDate, UfQuote>>,
    resolver: UfResolver,
    index: Mutex<HashSet<NaiveDate>>,
    // Per-date single-flight: concurrent lookups for one uncached date
    // collapse into a single resolution.
    locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl RateCache {
    pub fn new(store: Arc<dyn Cache<NaiveDate, UfQuote>>, resolver: UfResolver) -> Self {
        RateCache {
            store,
            resolver,
            index: Mutex::new(HashSet::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_or_resolve(&self, date: NaiveDate) -> UfQuote {
        if let Some(quote) = self.store.get(&date).await {
            debug!(%date, "UF quote served from cache");
            return quote;
        }

        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(date)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let guard = lock.lock().await;

        // A concurrent resolution may have landed while we waited.
        if let Some(quote) = self.store.get(&date).await {
            debug!(%date, "UF quote resolved by a concurrent request");
            return quote;
        }

        let quote = self.resolver.resolve(date).await;
        if quote.succeeded {
            self.store.put(date, quote.clone(), Some(CACHE_TTL)).await;
            self.index.lock().await.insert(date);
        }

        drop(guard);
        self.locks.lock().await.remove(&date);
        quote
    }

    /// True when an unexpired quote exists for the date.
    pub async fn contains(&self, date: NaiveDate) -> bool {
        self.store.get(&date).await.is_some()
    }

    /// Removes one cached date, or every indexed date when `None`.
    pub async fn invalidate(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(date) => {
                self.store.remove(&date).await;
                let known = self.index.lock().await.remove(&date);
                debug!(%date, known, "UF cache entry invalidated");
                known
            }
            None => {
                let dates: Vec<NaiveDate> = self.index.lock().await.drain().collect();
                for date in &dates {
                    self.store.remove(date).await;
                }
                debug!(count = dates.len(), "UF cache cleared");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quote::{UF_DEFAULT, UfSourceId};
    use crate::core::source::{SourceError, UfSource};
    use crate::store::MemoryCache;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingSource {
        value: Option<f64>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn ok(value: f64) -> Arc<Self> {
            Arc::new(Self {
                value: Some(value),
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                value: None,
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(value: f64, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                value: Some(value),
                delay: Some(delay),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UfSource for CountingSource {
        fn id(&self) -> UfSourceId {
            UfSourceId::Mindicador
        }

        async fn fetch(&self, date: NaiveDate) -> Result<f64, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.value.ok_or(SourceError::MissingValue(date))
        }

        async fn probe(&self) -> bool {
            self.value.is_some()
        }
    }

    fn cache_with(source: Arc<CountingSource>) -> RateCache {
        let store = Arc::new(MemoryCache::new());
        RateCache::new(store, UfResolver::new(vec![source]))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let source = CountingSource::ok(38405.32);
        let cache = cache_with(source.clone());

        let first = cache.get_or_resolve(date()).await;
        assert_eq!(first.value, 38405.32);
        assert_eq!(source.call_count(), 1);

        let second = cache.get_or_resolve(date()).await;
        assert_eq!(second.value, 38405.32);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_distinct_dates_resolve_separately() {
        let source = CountingSource::ok(38405.32);
        let cache = cache_with(source.clone());

        cache.get_or_resolve(date()).await;
        cache
            .get_or_resolve(NaiveDate::from_ymd_opt(2025, 1, 11).unwrap())
            .await;
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_resolution_is_never_cached() {
        let source = CountingSource::failing();
        let cache = cache_with(source.clone());

        let first = cache.get_or_resolve(date()).await;
        assert!(!first.succeeded);
        assert_eq!(first.value, UF_DEFAULT);

        // An outage retries the full chain on every call
        let second = cache.get_or_resolve(date()).await;
        assert!(!second.succeeded);
        assert_eq!(source.call_count(), 2);
        assert!(!cache.contains(date()).await);
    }

    #[tokio::test]
    async fn test_invalidate_single_date_forces_re_resolution() {
        let source = CountingSource::ok(38405.32);
        let cache = cache_with(source.clone());

        cache.get_or_resolve(date()).await;
        assert!(cache.contains(date()).await);

        assert!(cache.invalidate(Some(date())).await);
        assert!(!cache.contains(date()).await);

        cache.get_or_resolve(date()).await;
        assert_eq!(source.call_count(), 2);

        // Invalidating an unknown date reports false
        assert!(
            !cache
                .invalidate(Some(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()))
                .await
        );
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_every_indexed_date() {
        let source = CountingSource::ok(38405.32);
        let cache = cache_with(source.clone());

        let other = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        cache.get_or_resolve(date()).await;
        cache.get_or_resolve(other).await;

        assert!(cache.invalidate(None).await);
        assert!(!cache.contains(date()).await);
        assert!(!cache.contains(other).await);

        cache.get_or_resolve(date()).await;
        assert_eq!(source.call_count(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_resolve_once() {
        let source = CountingSource::slow(38405.32, Duration::from_millis(50));
        let cache = Arc::new(cache_with(source.clone()));

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_or_resolve(date()).await })
            })
            .collect();

        for task in tasks {
            let quote = task.await.unwrap();
            assert_eq!(quote.value, 38405.32);
        }
        assert_eq!(source.call_count(), 1);
    }
}
