//! exchangerate-api.com adapter (no key required)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::{CurrencyProvider, endpoint, fetch_json};
use crate::Result;
use crate::models::RateTable;

const PROVIDER: &str = "exchangerate-api";

pub struct ExchangeRateClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    rates: HashMap<String, f64>,
}

impl ExchangeRateClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl CurrencyProvider for ExchangeRateClient {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn latest(&self, base: &str) -> Result<RateTable> {
        let url = endpoint(&self.base_url, &format!("v4/latest/{}", urlencoding::encode(base)));
        let response: LatestResponse = fetch_json(PROVIDER, self.client.get(url)).await?;

        debug!("Received {} rates against {}", response.rates.len(), response.base);

        Ok(RateTable {
            base: response.base,
            rates: response.rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViajeError;
    use crate::config::HttpConfig;
    use crate::models::ExchangeRates;
    use crate::providers::http_client;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base_url: &str) -> ExchangeRateClient {
        ExchangeRateClient::new(http_client(&HttpConfig::default()).unwrap(), base_url)
    }

    #[tokio::test]
    async fn test_latest_rates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v4/latest/USD");
                then.status(200).json_body(json!({
                    "base": "USD",
                    "date": "2025-03-01",
                    "rates": {"USD": 1, "EUR": 0.9267, "MXN": 17.05}
                }));
            })
            .await;

        let table = client(&server.base_url()).latest("USD").await.unwrap();
        assert_eq!(table.base, "USD");
        assert_eq!(table.rate("EUR"), Some(0.9267));

        let rates = ExchangeRates::from_table(&table);
        assert_eq!(rates.eur_to_usd, Some(0.9267));
        assert_eq!(rates.usd_to_eur_inverse, Some(1.0791));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v4/latest/USD");
                then.status(503).body("down");
            })
            .await;

        let err = client(&server.base_url()).latest("USD").await.unwrap_err();
        assert!(matches!(err, ViajeError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v4/latest/USD");
                then.status(200).json_body(json!({"result": "error", "error-type": "unsupported-code"}));
            })
            .await;

        let err = client(&server.base_url()).latest("USD").await.unwrap_err();
        assert!(matches!(err, ViajeError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let err = client("http://127.0.0.1:9").latest("USD").await.unwrap_err();
        assert!(matches!(err, ViajeError::Http { .. }));
    }
}
