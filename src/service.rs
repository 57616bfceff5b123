use crate::cache::RateCache;
use crate::core::cache::Cache;
use crate::core::convert::{self, Conversion, CurrencyUnit};
use crate::core::quote::UfQuote;
use crate::core::source::UfSource;
use crate::history::{self, HistoryError, UfHistory};
use crate::resolver::UfResolver;
use crate::stats::{self, StatsReport};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// Application-facing facade over the UF resolution pipeline.
///
/// Constructed once per process; every consumer shares the same cache
/// handle.
pub struct UfService {
    cache: RateCache,
    sources: Vec<Arc<dyn UfSource>>,
}

impl UfService {
    pub fn new(store: Arc<dyn Cache<NaiveDate, UfQuote>>, sources: Vec<Arc<dyn UfSource>>) -> Self {
        let resolver = UfResolver::new(sources.clone());
        UfService {
            cache: RateCache::new(store, resolver),
            sources,
        }
    }

    /// UF quote for a date, today when `None`. Infallible; inspect
    /// `succeeded`/`source` on the quote to detect degraded data.
    pub async fn get_rate(&self, date: Option<NaiveDate>) -> UfQuote {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        self.cache.get_or_resolve(date).await
    }

    pub async fn convert(
        &self,
        amount: f64,
        unit: CurrencyUnit,
        date: Option<NaiveDate>,
    ) -> Conversion {
        let quote = self.get_rate(date).await;
        convert::convert(amount, unit, quote)
    }

    pub async fn get_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<UfHistory, HistoryError> {
        self.get_history_with_progress(start, end, &|| {}).await
    }

    pub async fn get_history_with_progress(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        on_day: &(dyn Fn() + Sync),
    ) -> Result<UfHistory, HistoryError> {
        history::build_history(&self.cache, start, end, on_day).await
    }

    pub async fn get_stats(&self) -> StatsReport {
        stats::report(&self.cache, &self.sources).await
    }

    pub async fn invalidate_cache(&self, date: Option<NaiveDate>) -> bool {
        self.cache.invalidate(date).await
    }
}
