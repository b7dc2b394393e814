//! External data providers
//!
//! Each provider is a small capability trait so the enrichment pipeline can be
//! driven by test doubles. The HTTP adapters share one `reqwest::Client`
//! configured with the per-call timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;
use crate::models::{CurrentConditions, RateTable, ResolvedPlace, ZoneTime};
use crate::{Result, ViajeError};

pub mod exchange;
pub mod gemini;
pub mod offset_clock;
pub mod openweather;
pub mod timeapi;
pub mod unsplash;

pub use exchange::ExchangeRateClient;
pub use gemini::GeminiClient;
pub use offset_clock::OffsetClock;
pub use openweather::OpenWeatherClient;
pub use timeapi::TimeApiClient;
pub use unsplash::UnsplashClient;

/// Current weather by place name
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, place: &str) -> Result<CurrentConditions>;
}

/// Exchange rates against a base currency
#[async_trait]
pub trait CurrencyProvider: Send + Sync {
    async fn latest(&self, base: &str) -> Result<RateTable>;
}

/// Current wall-clock time at an already resolved place
#[async_trait]
pub trait TimeZoneProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    async fn local_time(&self, place: &ResolvedPlace) -> Result<ZoneTime>;
}

/// Photo search by free-text query
#[async_trait]
pub trait PhotoProvider: Send + Sync {
    /// Up to `count` display-quality image URLs
    async fn search(&self, query: &str, count: usize) -> Result<Vec<String>>;
}

/// Text generation with an explicit model identifier
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;

    /// Model identifiers the credential can use
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Build the shared HTTP client
pub fn http_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(concat!("viajeia/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ViajeError::config(format!("Failed to create HTTP client: {e}")))
}

/// Send a request and insist on a 2xx status
pub(crate) async fn send(provider: &str, request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| ViajeError::http(provider, e.without_url().to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ViajeError::status(provider, status.as_u16(), body));
    }

    Ok(response)
}

/// Send a request and decode a 2xx JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T> {
    send(provider, request)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ViajeError::parse(provider, e.to_string()))
}

/// Join a configured base URL and a path without doubling slashes
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
