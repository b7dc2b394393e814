//! Unsplash photo search adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{PhotoProvider, endpoint, fetch_json};
use crate::Result;

const PROVIDER: &str = "unsplash";

pub struct UnsplashClient {
    client: Client,
    access_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    /// Display-quality rendition; `raw` and `full` are far too heavy
    regular: String,
}

impl UnsplashClient {
    pub fn new(client: Client, access_key: &str, base_url: &str) -> Self {
        Self {
            client,
            access_key: access_key.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl PhotoProvider for UnsplashClient {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn search(&self, query: &str, count: usize) -> Result<Vec<String>> {
        let per_page = count.max(1).to_string();
        let request = self
            .client
            .get(endpoint(&self.base_url, "search/photos"))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
                ("order_by", "popular"),
            ]);

        let response: SearchResponse = fetch_json(PROVIDER, request).await?;
        let photos: Vec<String> = response
            .results
            .into_iter()
            .take(count)
            .map(|p| p.urls.regular)
            .collect();

        debug!("Found {} photos for '{}'", photos.len(), query);
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViajeError;
    use crate::config::HttpConfig;
    use crate::providers::http_client;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base_url: &str) -> UnsplashClient {
        UnsplashClient::new(http_client(&HttpConfig::default()).unwrap(), "access", base_url)
    }

    fn photo(n: u32) -> serde_json::Value {
        json!({
            "id": format!("p{n}"),
            "urls": {
                "raw": format!("https://images.example/raw/{n}"),
                "regular": format!("https://images.example/regular/{n}")
            }
        })
    }

    #[tokio::test]
    async fn test_search_returns_regular_urls() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/photos")
                    .header("Authorization", "Client-ID access")
                    .query_param("query", "Roma")
                    .query_param("per_page", "3")
                    .query_param("orientation", "landscape")
                    .query_param("order_by", "popular");
                then.status(200).json_body(json!({
                    "total": 4,
                    "results": [photo(1), photo(2), photo(3), photo(4)]
                }));
            })
            .await;

        let photos = client(&server.base_url()).search("Roma", 3).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            photos,
            vec![
                "https://images.example/regular/1".to_string(),
                "https://images.example/regular/2".to_string(),
                "https://images.example/regular/3".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejected_key() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/photos");
                then.status(401).body("OAuth error: The access token is invalid");
            })
            .await;

        let err = client(&server.base_url()).search("Roma", 3).await.unwrap_err();
        assert!(matches!(err, ViajeError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/photos");
                then.status(200).json_body(json!({"results": [{"id": "p1", "urls": {}}]}));
            })
            .await;

        let err = client(&server.base_url()).search("Roma", 3).await.unwrap_err();
        assert!(matches!(err, ViajeError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let err = client("http://127.0.0.1:9").search("Roma", 3).await.unwrap_err();
        assert!(matches!(err, ViajeError::Http { .. }));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/photos");
                then.status(200)
                    .delay(std::time::Duration::from_secs(3))
                    .json_body(json!({"results": [photo(1)]}));
            })
            .await;

        let http = HttpConfig { timeout_seconds: 1 };
        let slow = UnsplashClient::new(http_client(&http).unwrap(), "access", &server.base_url());

        let err = slow.search("Roma", 3).await.unwrap_err();
        assert!(matches!(err, ViajeError::Http { .. }));
    }
}
