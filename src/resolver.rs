use crate::core::quote::UfQuote;
use crate::core::source::UfSource;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Resolves a UF value by walking the configured sources in priority
/// order. Infallible: exhausting every source yields the default quote.
pub struct UfResolver {
    sources: Vec<Arc<dyn UfSource>>,
}

impl UfResolver {
    pub fn new(sources: Vec<Arc<dyn UfSource>>) -> Self {
        UfResolver { sources }
    }

    /// First source returning a finite positive value wins; everything
    /// else is logged and skipped.
    pub async fn resolve(&self, date: NaiveDate) -> UfQuote {
        for source in &self.sources {
            debug!(source = %source.id(), %date, "Trying UF source");
            match source.fetch(date).await {
                Ok(value) if value > 0.0 && value.is_finite() => {
                    debug!(source = %source.id(), %date, value, "UF source succeeded");
                    return UfQuote::from_source(source.id(), date, value);
                }
                Ok(value) => {
                    warn!(source = %source.id(), %date, value, "UF source returned a non-positive value");
                }
                Err(err) => {
                    warn!(source = %source.id(), %date, error = %err, "UF source failed");
                }
            }
        }

        error!(%date, "All UF sources exhausted, using default value");
        UfQuote::fallback(date)
    }
}
