use crate::core::quote::UfSourceId;
use crate::core::source::{SourceError, UfSource};
use crate::providers::{FETCH_TIMEOUT, PROBE_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

/// mindicador.cl UF endpoint. No credentials required; the first source
/// tried by the resolver.
pub struct MindicadorSource {
    base_url: String,
}

impl MindicadorSource {
    pub fn new(base_url: &str) -> Self {
        MindicadorSource {
            base_url: base_url.to_string(),
        }
    }

    fn url_for(&self, date: NaiveDate) -> String {
        // The bare endpoint returns today's value; historical dates are
        // path segments.
        if date == Utc::now().date_naive() {
            format!("{}/api/uf", self.base_url)
        } else {
            format!("{}/api/uf/{}", self.base_url, date.format("%Y-%m-%d"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct MindicadorResponse {
    #[serde(default)]
    serie: Vec<SerieEntry>,
    valor: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SerieEntry {
    valor: f64,
}

#[async_trait]
impl UfSource for MindicadorSource {
    fn id(&self) -> UfSourceId {
        UfSourceId::Mindicador
    }

    async fn fetch(&self, date: NaiveDate) -> Result<f64, SourceError> {
        let url = self.url_for(date);
        debug!("Requesting UF value from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client.get(&url).timeout(FETCH_TIMEOUT).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let data = response
            .json::<MindicadorResponse>()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        if let Some(entry) = data.serie.first() {
            return Ok(entry.valor);
        }
        data.valor.ok_or(SourceError::MissingValue(date))
    }

    async fn probe(&self) -> bool {
        let url = format!("{}/api/uf", self.base_url);
        let Ok(client) = reqwest::Client::builder().user_agent(USER_AGENT).build() else {
            return false;
        };
        match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
