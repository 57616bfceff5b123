use crate::cache::RateCache;
use crate::core::convert::round_to;
use crate::core::quote::{CACHE_TTL, UfQuote, UfSourceId};
use crate::core::source::UfSource;
use chrono::{Days, NaiveDate, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variation {
    /// Today minus yesterday, rounded to 2 decimals.
    pub absolute: f64,
    /// Day-over-day change in percent, rounded to 4 decimals.
    pub percentual: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStatus {
    pub id: UfSourceId,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub today_cached: bool,
    pub ttl: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub today: UfQuote,
    pub yesterday: UfQuote,
    pub variation: Variation,
    pub sources: Vec<SourceStatus>,
    pub cache: CacheStatus,
}

/// Day-over-day variation plus per-source availability.
pub async fn report(cache: &RateCache, sources: &[Arc<dyn UfSource>]) -> StatsReport {
    report_for(cache, sources, Utc::now().date_naive()).await
}

pub async fn report_for(
    cache: &RateCache,
    sources: &[Arc<dyn UfSource>],
    today: NaiveDate,
) -> StatsReport {
    let yesterday_date = today
        .checked_sub_days(Days::new(1))
        .expect("calendar day underflow");

    let today_quote = cache.get_or_resolve(today).await;
    let yesterday_quote = cache.get_or_resolve(yesterday_date).await;

    let absolute = today_quote.value - yesterday_quote.value;
    // The yesterday value is positive by invariant; guard anyway rather
    // than divide by zero.
    let percentual = if yesterday_quote.value > 0.0 {
        round_to(absolute / yesterday_quote.value * 100.0, 4)
    } else {
        0.0
    };

    // Availability is probed per source, independent of resolution
    // priority.
    let probes = join_all(sources.iter().map(|s| s.probe())).await;
    let statuses = sources
        .iter()
        .zip(probes)
        .map(|(source, available)| SourceStatus {
            id: source.id(),
            available,
        })
        .collect();

    StatsReport {
        variation: Variation {
            absolute: round_to(absolute, 2),
            percentual,
        },
        sources: statuses,
        cache: CacheStatus {
            today_cached: cache.contains(today).await,
            ttl: CACHE_TTL,
        },
        today: today_quote,
        yesterday: yesterday_quote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::SourceError;
    use crate::resolver::UfResolver;
    use crate::store::MemoryCache;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct TableSource {
        id: UfSourceId,
        values: HashMap<NaiveDate, f64>,
        reachable: bool,
    }

    #[async_trait]
    impl UfSource for TableSource {
        fn id(&self) -> UfSourceId {
            self.id
        }

        async fn fetch(&self, date: NaiveDate) -> Result<f64, SourceError> {
            self.values
                .get(&date)
                .copied()
                .ok_or(SourceError::MissingValue(date))
        }

        async fn probe(&self) -> bool {
            self.reachable
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn fixture(today_value: f64, yesterday_value: f64) -> (RateCache, Vec<Arc<dyn UfSource>>) {
        let source = Arc::new(TableSource {
            id: UfSourceId::Mindicador,
            values: [(day(10), today_value), (day(9), yesterday_value)]
                .into_iter()
                .collect(),
            reachable: true,
        });
        let offline = Arc::new(TableSource {
            id: UfSourceId::Sbif,
            values: HashMap::new(),
            reachable: false,
        });

        let sources: Vec<Arc<dyn UfSource>> = vec![source, offline];
        let cache = RateCache::new(
            Arc::new(MemoryCache::new()),
            UfResolver::new(sources.clone()),
        );
        (cache, sources)
    }

    #[tokio::test]
    async fn test_variation_rounding() {
        let (cache, sources) = fixture(38405.32, 38400.15);

        let report = report_for(&cache, &sources, day(10)).await;
        assert_eq!(report.today.value, 38405.32);
        assert_eq!(report.yesterday.value, 38400.15);
        // 5.17 / 38400.15 * 100 = 0.013463...
        assert_eq!(report.variation.absolute, 5.17);
        assert_eq!(report.variation.percentual, 0.0135);
    }

    #[tokio::test]
    async fn test_negative_variation() {
        let (cache, sources) = fixture(38400.15, 38405.32);

        let report = report_for(&cache, &sources, day(10)).await;
        assert_eq!(report.variation.absolute, -5.17);
        assert!(report.variation.percentual < 0.0);
    }

    #[tokio::test]
    async fn test_source_availability_is_reported_per_source() {
        let (cache, sources) = fixture(38405.32, 38400.15);

        let report = report_for(&cache, &sources, day(10)).await;
        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.sources[0].id, UfSourceId::Mindicador);
        assert!(report.sources[0].available);
        assert_eq!(report.sources[1].id, UfSourceId::Sbif);
        assert!(!report.sources[1].available);
    }

    #[tokio::test]
    async fn test_cache_status_reflects_todays_entry() {
        let (cache, sources) = fixture(38405.32, 38400.15);

        let report = report_for(&cache, &sources, day(10)).await;
        assert!(report.cache.today_cached);
        assert_eq!(report.cache.ttl, CACHE_TTL);
    }

    #[tokio::test]
    async fn test_total_outage_still_produces_a_report() {
        let offline: Vec<Arc<dyn UfSource>> = vec![Arc::new(TableSource {
            id: UfSourceId::Mindicador,
            values: HashMap::new(),
            reachable: false,
        })];
        let cache = RateCache::new(
            Arc::new(MemoryCache::new()),
            UfResolver::new(offline.clone()),
        );

        let report = report_for(&cache, &offline, day(10)).await;
        assert!(!report.today.succeeded);
        assert!(!report.yesterday.succeeded);
        assert_eq!(report.variation.absolute, 0.0);
        assert_eq!(report.variation.percentual, 0.0);
        // Defaults are never cached
        assert!(!report.cache.today_cached);
    }
}
