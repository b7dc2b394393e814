//! OpenWeatherMap current-weather adapter
//!
//! One call to `/data/2.5/weather` gives everything the service needs: the
//! conditions for both weather shapes plus the coordinates and UTC shift that
//! the time-zone lookup builds on.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, instrument};

use super::{WeatherProvider, endpoint, fetch_json};
use crate::models::{Coordinates, CurrentConditions};
use crate::{Result, ViajeError};

const PROVIDER: &str = "openweather";

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl OpenWeatherClient {
    pub fn new(client: Client, api_key: &str, base_url: &str, language: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            language: language.to_string(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn current(&self, place: &str) -> Result<CurrentConditions> {
        let start_time = Instant::now();

        let request = self
            .client
            .get(endpoint(&self.base_url, "data/2.5/weather"))
            .query(&[
                ("q", place),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.language.as_str()),
            ]);

        let response: WeatherResponse = fetch_json(PROVIDER, request).await?;
        let conditions = response.into_conditions()?;

        debug!(
            "Resolved '{}' to {}, {} ({}) in {:.3}s",
            place,
            conditions.city,
            conditions.country,
            conditions.coordinates.format_coordinates(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(conditions)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: String,
    coord: CoordBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    main: MainBlock,
    #[serde(default)]
    wind: Option<WindBlock>,
    #[serde(default)]
    sys: Option<SysBlock>,
    /// Shift in seconds from UTC
    #[serde(default)]
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CoordBlock {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct SysBlock {
    #[serde(default)]
    country: Option<String>,
}

impl WeatherResponse {
    fn into_conditions(self) -> Result<CurrentConditions> {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| ViajeError::missing(PROVIDER, "weather[0].description"))?;

        let country = self
            .sys
            .and_then(|s| s.country)
            .ok_or_else(|| ViajeError::missing(PROVIDER, "sys.country"))?;

        Ok(CurrentConditions {
            city: self.name,
            country,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            description,
            humidity: self.main.humidity,
            wind_speed_ms: self.wind.map_or(0.0, |w| w.speed),
            coordinates: Coordinates::new(self.coord.lat, self.coord.lon),
            utc_offset_seconds: self.timezone,
        })
    }
}
