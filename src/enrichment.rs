//! Best-effort enrichment of answers with live destination data
//!
//! Every lookup here swallows provider failures: the error is logged at
//! `warn` and the fact is simply absent from the result. A provider that was
//! never configured (missing credential) behaves the same way, silently.

use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::ViajeConfig;
use crate::models::{
    BASE_CURRENCY, CurrentConditions, ExchangeRates, InfoPanelAnswer, LocalTime, ResolvedPlace,
    WeatherBrief,
};
use crate::providers::{
    CurrencyProvider, ExchangeRateClient, OffsetClock, OpenWeatherClient, PhotoProvider,
    TimeApiClient, TimeZoneProvider, UnsplashClient, WeatherProvider,
};

/// Photos attached to a planning answer
pub const DEFAULT_PHOTO_COUNT: usize = 3;

/// What the planning pipeline needs about a destination
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationContext {
    /// Multi-line weather block for the prompt
    pub weather_report: Option<String>,
    pub photos: Vec<String>,
}

/// Failure-isolating facade over the enrichment providers
#[derive(Clone, Default)]
pub struct Enricher {
    weather: Option<Arc<dyn WeatherProvider>>,
    currency: Option<Arc<dyn CurrencyProvider>>,
    time_primary: Option<Arc<dyn TimeZoneProvider>>,
    time_fallback: Option<Arc<dyn TimeZoneProvider>>,
    photos: Option<Arc<dyn PhotoProvider>>,
}

impl Enricher {
    /// Enricher without any provider; every lookup comes back empty
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the HTTP adapters from configuration. Keyed providers without a
    /// credential are left out.
    #[must_use]
    pub fn from_config(config: &ViajeConfig, client: &Client) -> Self {
        let endpoints = &config.endpoints;
        let keys = &config.providers;

        let mut enricher = Self::new()
            .with_currency(Arc::new(ExchangeRateClient::new(
                client.clone(),
                &endpoints.exchange,
            )))
            .with_time_zones(
                Arc::new(TimeApiClient::new(client.clone(), &endpoints.timeapi)),
                Arc::new(OffsetClock::new()),
            );

        if let Some(key) = &keys.openweather_api_key {
            enricher = enricher.with_weather(Arc::new(OpenWeatherClient::new(
                client.clone(),
                key,
                &endpoints.openweather,
                &config.weather.language,
            )));
        }

        if let Some(key) = &keys.unsplash_access_key {
            enricher = enricher.with_photos(Arc::new(UnsplashClient::new(
                client.clone(),
                key,
                &endpoints.unsplash,
            )));
        }

        enricher
    }

    #[must_use]
    pub fn with_weather(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(provider);
        self
    }

    #[must_use]
    pub fn with_currency(mut self, provider: Arc<dyn CurrencyProvider>) -> Self {
        self.currency = Some(provider);
        self
    }

    /// Primary time-zone provider plus the one fallback tried when it fails
    #[must_use]
    pub fn with_time_zones(
        mut self,
        primary: Arc<dyn TimeZoneProvider>,
        fallback: Arc<dyn TimeZoneProvider>,
    ) -> Self {
        self.time_primary = Some(primary);
        self.time_fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn with_photos(mut self, provider: Arc<dyn PhotoProvider>) -> Self {
        self.photos = Some(provider);
        self
    }

    async fn conditions(&self, place: &str) -> Option<CurrentConditions> {
        let provider = self.weather.as_ref()?;
        let place = place.trim();
        if place.is_empty() {
            return None;
        }

        match provider.current(place).await {
            Ok(conditions) => Some(conditions),
            Err(e) => {
                warn!("Weather lookup for '{}' failed: {}", place, e);
                None
            }
        }
    }

    /// Short weather facts for the side panel
    pub async fn weather_brief(&self, place: &str) -> Option<WeatherBrief> {
        self.conditions(place).await.map(|c| c.brief())
    }

    /// Formatted weather block for the prompt
    pub async fn weather_report(&self, place: &str) -> Option<String> {
        self.conditions(place).await.map(|c| c.report())
    }

    /// USD/EUR rates in both directions
    pub async fn exchange_rates(&self) -> Option<ExchangeRates> {
        let provider = self.currency.as_ref()?;
        match provider.latest(BASE_CURRENCY).await {
            Ok(table) => {
                let rates = ExchangeRates::from_table(&table);
                if rates.is_empty() {
                    warn!("Exchange rates against {} carry no EUR/MXN rate", table.base);
                    None
                } else {
                    debug!(
                        "Rates against {}: EUR {:?}, EUR inverse {:?}, MXN {:?}",
                        table.base, rates.eur_to_usd, rates.usd_to_eur_inverse, rates.usd_to_mxn
                    );
                    Some(rates)
                }
            }
            Err(e) => {
                warn!("Exchange rate lookup failed: {}", e);
                None
            }
        }
    }

    /// Local time at a place, resolved through the weather provider first
    pub async fn local_time(&self, place: &str) -> Option<LocalTime> {
        let conditions = self.conditions(place).await?;
        self.local_time_at(&conditions.place()).await
    }

    async fn local_time_at(&self, place: &ResolvedPlace) -> Option<LocalTime> {
        if let Some(primary) = &self.time_primary {
            match primary.local_time(place).await {
                Ok(zone_time) => {
                    debug!(
                        "Local time for '{}' via {}: zone {:?}, offset {}s",
                        place.name,
                        primary.name(),
                        zone_time.zone,
                        zone_time.offset_seconds
                    );
                    return Some(zone_time.into());
                }
                Err(e) => warn!(
                    "Time zone lookup for '{}' via {} failed: {}",
                    place.name,
                    primary.name(),
                    e
                ),
            }
        }

        let fallback = self.time_fallback.as_ref()?;
        match fallback.local_time(place).await {
            Ok(zone_time) => {
                info!("Local time for '{}' taken from {}", place.name, fallback.name());
                Some(zone_time.into())
            }
            Err(e) => {
                warn!(
                    "Time zone fallback {} for '{}' failed: {}",
                    fallback.name(),
                    place.name,
                    e
                );
                None
            }
        }
    }

    /// Up to `count` photo URLs of a place
    pub async fn photos(&self, place: &str, count: usize) -> Vec<String> {
        let Some(provider) = self.photos.as_ref() else {
            return Vec::new();
        };
        let place = place.trim();
        if place.is_empty() || count == 0 {
            return Vec::new();
        }

        match provider.search(place, count).await {
            Ok(mut photos) => {
                photos.truncate(count);
                photos
            }
            Err(e) => {
                warn!("Photo search for '{}' failed: {}", place, e);
                Vec::new()
            }
        }
    }

    /// Weather block and photos of a destination, fetched concurrently
    #[instrument(skip(self))]
    pub async fn destination_context(&self, place: &str) -> DestinationContext {
        let (weather_report, photos) = tokio::join!(
            self.weather_report(place),
            self.photos(place, DEFAULT_PHOTO_COUNT)
        );

        debug!(
            "Context for '{}': weather={}, photos={}",
            place,
            weather_report.is_some(),
            photos.len()
        );

        DestinationContext {
            weather_report,
            photos,
        }
    }

    /// Side-panel facts. Rates never depend on the city; weather and local
    /// time only come when a city is given.
    #[instrument(skip(self))]
    pub async fn info_panel(&self, city: Option<&str>) -> InfoPanelAnswer {
        let city = city.map(str::trim).filter(|c| !c.is_empty());

        let place_facts = async {
            let Some(city) = city else {
                return (None, None);
            };
            let Some(conditions) = self.conditions(city).await else {
                return (None, None);
            };
            let local_time = self.local_time_at(&conditions.place()).await;
            (Some(conditions.brief()), local_time)
        };

        let (rates, (brief, local_time)) = tokio::join!(self.exchange_rates(), place_facts);

        let rates = rates.unwrap_or_default();
        let mut answer = InfoPanelAnswer {
            usd_rate: rates.usd_to_eur_inverse,
            eur_rate: rates.eur_to_usd,
            mxn_rate: rates.usd_to_mxn,
            ..Default::default()
        };

        if let Some(brief) = brief {
            answer.temperature = Some(brief.temperature);
            answer.weather_description = Some(brief.description);
            answer.resolved_city = Some(brief.city);
        }

        if let Some(local_time) = local_time {
            answer.time_offset_label = Some(local_time.offset_label);
            answer.local_time = Some(local_time.local_time);
            answer.time_zone = local_time.zone;
        }

        answer
    }
}
