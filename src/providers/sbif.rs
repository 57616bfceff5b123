use crate::core::quote::UfSourceId;
use crate::core::source::{SourceError, UfSource};
use crate::providers::{FETCH_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::debug;

/// CMF/SBIF institutional API. Publishes one month of UF values per
/// request and requires an `apikey` header.
pub struct SbifSource {
    base_url: String,
    api_key: Option<String>,
}

impl SbifSource {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        SbifSource {
            base_url: base_url.to_string(),
            api_key,
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Parses a Chilean-formatted decimal ("38.405,32"): dots separate
/// thousands, the comma is the decimal mark.
fn parse_chilean_decimal(raw: &str) -> Result<f64, SourceError> {
    raw.replace('.', "")
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| SourceError::Malformed(format!("unparsable UF value: '{raw}'")))
}

#[derive(Debug, Deserialize)]
struct SbifResponse {
    #[serde(rename = "UFs", default)]
    ufs: Vec<SbifUf>,
}

#[derive(Debug, Deserialize)]
struct SbifUf {
    #[serde(rename = "Fecha")]
    fecha: String,
    #[serde(rename = "Valor")]
    valor: String,
}

#[async_trait]
impl UfSource for SbifSource {
    fn id(&self) -> UfSourceId {
        UfSourceId::Sbif
    }

    async fn fetch(&self, date: NaiveDate) -> Result<f64, SourceError> {
        let Some(api_key) = self.api_key() else {
            return Err(SourceError::NotConfigured);
        };

        let url = format!("{}/{}/{}", self.base_url, date.year(), date.month());
        debug!("Requesting UF value from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(&url)
            .header("apikey", api_key)
            .query(&[("formato", "json")])
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let data = response
            .json::<SbifResponse>()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        let wanted = date.format("%Y-%m-%d").to_string();
        let entry = data
            .ufs
            .iter()
            .find(|uf| uf.fecha == wanted)
            .ok_or(SourceError::MissingValue(date))?;

        parse_chilean_decimal(&entry.valor)
    }

    async fn probe(&self) -> bool {
        // Configuration check only; the monthly endpoint is too heavy
        // for a liveness probe.
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_chilean_decimal() {
        assert_eq!(parse_chilean_decimal("39.383,07").unwrap(), 39383.07);
        assert_eq!(parse_chilean_decimal("38.405,32").unwrap(), 38405.32);
        assert_eq!(parse_chilean_decimal("985,12").unwrap(), 985.12);
        assert!(parse_chilean_decimal("n/a").is_err());
    }

    #[tokio::test]
    async fn test_fetch_finds_entry_for_date() {
        let mock_response = r#"{
            "UFs": [
                {"Fecha": "2025-01-09", "Valor": "38.400,15"},
                {"Fecha": "2025-01-10", "Valor": "38.405,32"}
            ]
        }"#;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2025/1"))
            .and(header("apikey", "test-key"))
            .and(query_param("formato", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let source = SbifSource::new(&mock_server.uri(), Some("test-key".to_string()));
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let value = source.fetch(date).await.unwrap();
        assert_eq!(value, 38405.32);
    }

    #[tokio::test]
    async fn test_fetch_date_not_published() {
        let mock_response = r#"{"UFs": [{"Fecha": "2025-01-09", "Valor": "38.400,15"}]}"#;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2025/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let source = SbifSource::new(&mock_server.uri(), Some("test-key".to_string()));
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let result = source.fetch(date).await;
        assert!(matches!(result, Err(SourceError::MissingValue(_))));
    }

    #[tokio::test]
    async fn test_fetch_without_api_key_is_not_configured() {
        let source = SbifSource::new("http://localhost:1", None);
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let result = source.fetch(date).await;
        assert!(matches!(result, Err(SourceError::NotConfigured)));

        let source = SbifSource::new("http://localhost:1", Some(String::new()));
        let result = source.fetch(date).await;
        assert!(matches!(result, Err(SourceError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_probe_reflects_configuration() {
        let configured = SbifSource::new("http://localhost:1", Some("key".to_string()));
        assert!(configured.probe().await);

        let unconfigured = SbifSource::new("http://localhost:1", None);
        assert!(!unconfigured.probe().await);
    }
}
