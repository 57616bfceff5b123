use crate::core::quote::UfSourceId;
use crate::core::source::{SourceError, UfSource};
use crate::providers::{FETCH_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

/// Daily UF series published by the Banco Central SieteRestWS service.
const UF_SERIES: &str = "F073.UFF.PRE.Z.D";

/// Banco Central de Chile statistics API. Requires registered
/// credentials; the last source in the resolver chain.
pub struct BancoCentralSource {
    base_url: String,
    user: Option<String>,
    password: Option<String>,
}

impl BancoCentralSource {
    pub fn new(base_url: &str, user: Option<String>, password: Option<String>) -> Self {
        BancoCentralSource {
            base_url: base_url.to_string(),
            user,
            password,
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let user = self.user.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((user, password))
    }
}

#[derive(Debug, Deserialize)]
struct BancoCentralResponse {
    #[serde(rename = "Series")]
    series: Option<BcSeries>,
}

#[derive(Debug, Deserialize)]
struct BcSeries {
    #[serde(rename = "Obs", default)]
    obs: Vec<BcObservation>,
}

#[derive(Debug, Deserialize)]
struct BcObservation {
    value: String,
}

#[async_trait]
impl UfSource for BancoCentralSource {
    fn id(&self) -> UfSourceId {
        UfSourceId::BancoCentral
    }

    async fn fetch(&self, date: NaiveDate) -> Result<f64, SourceError> {
        let Some((user, password)) = self.credentials() else {
            return Err(SourceError::NotConfigured);
        };

        let day = date.format("%Y-%m-%d").to_string();
        debug!("Requesting UF series {} from {}", UF_SERIES, self.base_url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(&self.base_url)
            .query(&[
                ("user", user),
                ("pass", password),
                ("function", "GetSeries"),
                ("timeseries", UF_SERIES),
                ("firstdate", &day),
                ("lastdate", &day),
            ])
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let data = response
            .json::<BancoCentralResponse>()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        let observation = data
            .series
            .and_then(|s| s.obs.into_iter().next())
            .ok_or(SourceError::MissingValue(date))?;

        // Unpublished days carry the literal string "NaN".
        observation
            .value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                SourceError::Malformed(format!("unparsable UF value: '{}'", observation.value))
            })
    }

    async fn probe(&self) -> bool {
        self.credentials().is_some()
    }
}
