// =============================================================================
// Fetch cache: TTL-bound memoisation of fetched series
// =============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use crate::fetcher::PriceSeriesFetcher;
use crate::market_data::PriceSeries;
use crate::source::PriceSource;
use crate::types::Interval;

/// Composite key that identifies a cached series.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SeriesKey {
    pub symbol: String,
    pub interval: Interval,
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.interval)
    }
}

struct CacheEntry {
    series: PriceSeries,
    fetched_at: Instant,
}

/// Thread-safe TTL cache for fetched series.  Only non-empty series are
/// stored; an empty result is always refetched.
pub struct FetchCache {
    ttl: Duration,
    entries: RwLock<HashMap<SeriesKey, CacheEntry>>,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached series for `key` when one exists and is younger than
    /// the TTL.
    pub fn get(&self, key: &SeriesKey) -> Option<PriceSeries> {
        let map = self.entries.read();
        map.get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.series.clone())
    }

    /// Store `series` under `key`, replacing any previous entry.  Empty
    /// series are not stored.
    pub fn put(&self, key: SeriesKey, series: &PriceSeries) {
        if series.is_empty() {
            return;
        }
        let mut map = self.entries.write();
        map.insert(
            key,
            CacheEntry {
                series: series.clone(),
                fetched_at: Instant::now(),
            },
        );
    }
}

/// A [`PriceSeriesFetcher`] wrapped with a [`FetchCache`].  Repeat requests
/// for the same `(symbol, interval)` inside the TTL are served from memory
/// without touching the source.
pub struct CachedFetcher<S> {
    fetcher: PriceSeriesFetcher<S>,
    cache: FetchCache,
}

impl<S: PriceSource> CachedFetcher<S> {
    pub fn new(fetcher: PriceSeriesFetcher<S>, ttl: Duration) -> Self {
        Self {
            fetcher,
            cache: FetchCache::new(ttl),
        }
    }

    pub async fn fetch(&self, symbol: &str, interval: Interval) -> PriceSeries {
        let key = SeriesKey {
            symbol: symbol.to_string(),
            interval,
        };

        if let Some(series) = self.cache.get(&key) {
            debug!(key = %key, bars = series.len(), "cache hit");
            return series;
        }

        let series = self.fetcher.fetch(symbol, interval).await;
        self.cache.put(key, &series);
        series
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PriceBar;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn ts(day: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN)
            + ChronoDuration::days(day)
    }

    fn sample_series(symbol: &str, bars: usize) -> PriceSeries {
        let bars = (0..bars)
            .map(|i| PriceBar {
                timestamp: ts(i as i64),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
            })
            .collect();
        PriceSeries::new(symbol, Interval::Daily, bars)
    }

    /// Source that counts calls; `bars == 0` simulates an empty feed.
    struct CountingSource {
        calls: Arc<AtomicU32>,
        bars: usize,
    }

    #[async_trait]
    impl PriceSource for CountingSource {
        async fn time_series(
            &self,
            symbol: &str,
            interval: Interval,
            _outputsize: u32,
        ) -> Result<PriceSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.bars == 0 {
                Ok(PriceSeries::empty(symbol, interval))
            } else {
                Ok(sample_series(symbol, self.bars))
            }
        }
    }

    fn cached(source: CountingSource, ttl: Duration) -> CachedFetcher<CountingSource> {
        let fetcher = PriceSeriesFetcher::new(source)
            .with_jitter(Box::new(|| 0.0))
            .with_sleep(Box::new(|_| Box::pin(async {})));
        CachedFetcher::new(fetcher, ttl)
    }

    fn key(symbol: &str, interval: Interval) -> SeriesKey {
        SeriesKey {
            symbol: symbol.to_string(),
            interval,
        }
    }

    // ---- FetchCache ------------------------------------------------------

    #[test]
    fn get_misses_on_empty_cache() {
        let cache = FetchCache::new(Duration::from_secs(3600));
        assert!(cache.get(&key("EUR/USD", Interval::Daily)).is_none());
    }

    #[test]
    fn put_then_get_roundtrip() {
        let cache = FetchCache::new(Duration::from_secs(3600));
        let series = sample_series("EUR/USD", 5);

        cache.put(key("EUR/USD", Interval::Daily), &series);
        assert_eq!(cache.get(&key("EUR/USD", Interval::Daily)), Some(series));
    }

    #[test]
    fn zero_ttl_never_hits() {
        let cache = FetchCache::new(Duration::ZERO);
        cache.put(key("EUR/USD", Interval::Daily), &sample_series("EUR/USD", 5));
        assert!(cache.get(&key("EUR/USD", Interval::Daily)).is_none());
    }

    #[test]
    fn empty_series_is_not_stored() {
        let cache = FetchCache::new(Duration::from_secs(3600));
        cache.put(
            key("EUR/USD", Interval::Daily),
            &PriceSeries::empty("EUR/USD", Interval::Daily),
        );
        assert!(cache.get(&key("EUR/USD", Interval::Daily)).is_none());
    }

    #[test]
    fn key_separates_symbol_and_interval() {
        let cache = FetchCache::new(Duration::from_secs(3600));
        cache.put(key("EUR/USD", Interval::Daily), &sample_series("EUR/USD", 5));

        assert!(cache.get(&key("EUR/USD", Interval::Daily)).is_some());
        assert!(cache.get(&key("EUR/USD", Interval::Hourly)).is_none());
        assert!(cache.get(&key("GBP/USD", Interval::Daily)).is_none());
    }

    // ---- CachedFetcher ---------------------------------------------------

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let calls = Arc::new(AtomicU32::new(0));
        let fetcher = cached(
            CountingSource {
                calls: calls.clone(),
                bars: 30,
            },
            Duration::from_secs(3600),
        );

        let first = fetcher.fetch("EUR/USD", Interval::Daily).await;
        let second = fetcher.fetch("EUR/USD", Interval::Daily).await;

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_ttl_fetches_every_time() {
        let calls = Arc::new(AtomicU32::new(0));
        let fetcher = cached(
            CountingSource {
                calls: calls.clone(),
                bars: 30,
            },
            Duration::ZERO,
        );

        fetcher.fetch("EUR/USD", Interval::Daily).await;
        fetcher.fetch("EUR/USD", Interval::Daily).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_results_are_refetched() {
        let calls = Arc::new(AtomicU32::new(0));
        let fetcher = cached(
            CountingSource {
                calls: calls.clone(),
                bars: 0,
            },
            Duration::from_secs(3600),
        );

        // Each fetch burns all three attempts and nothing is cached.
        assert!(fetcher.fetch("EUR/USD", Interval::Daily).await.is_empty());
        assert!(fetcher.fetch("EUR/USD", Interval::Daily).await.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn different_intervals_fetch_separately() {
        let calls = Arc::new(AtomicU32::new(0));
        let fetcher = cached(
            CountingSource {
                calls: calls.clone(),
                bars: 30,
            },
            Duration::from_secs(3600),
        );

        fetcher.fetch("EUR/USD", Interval::Daily).await;
        fetcher.fetch("EUR/USD", Interval::Hourly).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
