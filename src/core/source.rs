//! UF source abstractions

use crate::core::quote::UfSourceId;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Failure of a single fetch attempt against one source.
///
/// The resolver logs these and moves on to the next source; they are
/// never surfaced past it.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("no value published for {0}")]
    MissingValue(NaiveDate),
    #[error("source credentials not configured")]
    NotConfigured,
}

#[async_trait]
pub trait UfSource: Send + Sync {
    fn id(&self) -> UfSourceId;

    /// Fetches the raw UF value for a calendar day.
    async fn fetch(&self, date: NaiveDate) -> Result<f64, SourceError>;

    /// Lightweight liveness/configuration check, not a full fetch.
    async fn probe(&self) -> bool;
}
