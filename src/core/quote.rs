//! UF quote types and service-wide constants

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Value returned when every external source fails.
pub const UF_DEFAULT: f64 = 37000.0;

/// Lifetime of a cached quote (24 hours).
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UfSourceId {
    Mindicador,
    Sbif,
    BancoCentral,
    Default,
}

impl Display for UfSourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UfSourceId::Mindicador => "mindicador",
                UfSourceId::Sbif => "sbif",
                UfSourceId::BancoCentral => "banco_central",
                UfSourceId::Default => "default",
            }
        )
    }
}

impl FromStr for UfSourceId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mindicador" => Ok(UfSourceId::Mindicador),
            "sbif" => Ok(UfSourceId::Sbif),
            "banco_central" => Ok(UfSourceId::BancoCentral),
            "default" => Ok(UfSourceId::Default),
            _ => Err(anyhow::anyhow!("Invalid UF source: {}", s)),
        }
    }
}

/// A resolved UF value for one calendar day.
///
/// `value` is always positive; when `succeeded` is false the quote
/// carries [`UF_DEFAULT`] and `source` is [`UfSourceId::Default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UfQuote {
    pub value: f64,
    pub date: NaiveDate,
    pub source: UfSourceId,
    pub succeeded: bool,
    pub retrieved_at: DateTime<Utc>,
}

impl UfQuote {
    pub fn from_source(source: UfSourceId, date: NaiveDate, value: f64) -> Self {
        Self {
            value,
            date,
            source,
            succeeded: true,
            retrieved_at: Utc::now(),
        }
    }

    /// Default-valued quote used when all sources are exhausted.
    pub fn fallback(date: NaiveDate) -> Self {
        Self {
            value: UF_DEFAULT,
            date,
            source: UfSourceId::Default,
            succeeded: false,
            retrieved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_quote_invariants() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let quote = UfQuote::fallback(date);

        assert_eq!(quote.value, UF_DEFAULT);
        assert!(quote.value > 0.0);
        assert_eq!(quote.source, UfSourceId::Default);
        assert!(!quote.succeeded);
    }

    #[test]
    fn test_source_id_roundtrip() {
        for id in [
            UfSourceId::Mindicador,
            UfSourceId::Sbif,
            UfSourceId::BancoCentral,
            UfSourceId::Default,
        ] {
            assert_eq!(id.to_string().parse::<UfSourceId>().unwrap(), id);
        }
        assert!("bolsa".parse::<UfSourceId>().is_err());
    }

    #[test]
    fn test_quote_serde_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let quote = UfQuote::from_source(UfSourceId::Mindicador, date, 38405.32);

        let json = serde_json::to_string(&quote).unwrap();
        assert!(json.contains("\"mindicador\""));

        let back: UfQuote = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value, 38405.32);
        assert_eq!(back.date, date);
        assert!(back.succeeded);
    }
}
