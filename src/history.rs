use crate::cache::RateCache;
use crate::core::convert::round_to;
use crate::core::quote::UfQuote;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum distance in days between the endpoints of a history request.
pub const MAX_HISTORY_DAYS: u32 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum HistoryError {
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("range spans {days} days, maximum is {MAX_HISTORY_DAYS}")]
    SpanTooLarge { days: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

/// One quote per calendar day, chronological, with range statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UfHistory {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub quotes: Vec<UfQuote>,
    pub stats: HistoryStats,
}

/// Resolves every day in `[start, end]` through the cache. The UF is
/// published for every calendar day, weekends included, so no day is
/// skipped. `on_day` fires after each resolved day (progress reporting).
pub async fn build_history(
    cache: &RateCache,
    start: NaiveDate,
    end: NaiveDate,
    on_day: &(dyn Fn() + Sync),
) -> Result<UfHistory, HistoryError> {
    if start > end {
        return Err(HistoryError::StartAfterEnd { start, end });
    }
    // The limit bounds the distance between endpoints, so an inclusive
    // range holds at most MAX_HISTORY_DAYS + 1 quotes.
    let days = (end - start).num_days() as u32 + 1;
    if days > MAX_HISTORY_DAYS + 1 {
        return Err(HistoryError::SpanTooLarge { days });
    }

    let mut quotes = Vec::with_capacity(days as usize);
    let mut day = start;
    while day <= end {
        quotes.push(cache.get_or_resolve(day).await);
        on_day();
        day = day
            .checked_add_days(Days::new(1))
            .expect("calendar day overflow");
    }

    let stats = compute_stats(&quotes);
    Ok(UfHistory {
        start,
        end,
        quotes,
        stats,
    })
}

fn compute_stats(quotes: &[UfQuote]) -> HistoryStats {
    let sum: f64 = quotes.iter().map(|q| q.value).sum();
    let max = quotes.iter().map(|q| q.value).fold(f64::MIN, f64::max);
    let min = quotes.iter().map(|q| q.value).fold(f64::MAX, f64::min);

    HistoryStats {
        average: round_to(sum / quotes.len() as f64, 2),
        max,
        min,
    }
}
