//! timeapi.io adapter (no key required)
//!
//! Two dependent calls: the zone identifier for the coordinates, then the
//! current time in that zone.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{TimeZoneProvider, endpoint, fetch_json};
use crate::models::{ResolvedPlace, ZoneTime};
use crate::{Result, ViajeError};

const PROVIDER: &str = "timeapi";

pub struct TimeApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZoneResponse {
    time_zone: String,
    #[serde(default)]
    current_utc_offset: Option<UtcOffset>,
}

#[derive(Debug, Deserialize)]
struct UtcOffset {
    seconds: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentTimeResponse {
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    date_time: Option<String>,
}

impl TimeApiClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    async fn zone_for(&self, place: &ResolvedPlace) -> Result<ZoneResponse> {
        let request = self
            .client
            .get(endpoint(&self.base_url, "api/TimeZone/coordinate"))
            .query(&[
                ("latitude", place.coordinates.latitude),
                ("longitude", place.coordinates.longitude),
            ]);
        fetch_json(PROVIDER, request).await
    }

    async fn current_time(&self, zone: &str) -> Result<CurrentTimeResponse> {
        let request = self
            .client
            .get(endpoint(&self.base_url, "api/Time/current/zone"))
            .query(&[("timeZone", zone)]);
        fetch_json(PROVIDER, request).await
    }
}

#[async_trait]
impl TimeZoneProvider for TimeApiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self, place), fields(place = %place.name))]
    async fn local_time(&self, place: &ResolvedPlace) -> Result<ZoneTime> {
        let zone = self.zone_for(place).await?;
        debug!("{} is in zone {}", place.name, zone.time_zone);

        let current = self.current_time(&zone.time_zone).await?;
        let local_time = current
            .time
            .or(current.date_time)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ViajeError::missing(PROVIDER, "time"))?;

        let offset_seconds = zone
            .current_utc_offset
            .map(|o| o.seconds)
            .or(place.utc_offset_seconds.map(i64::from))
            .ok_or_else(|| ViajeError::missing(PROVIDER, "currentUtcOffset"))?;

        Ok(ZoneTime {
            zone: Some(zone.time_zone),
            local_time,
            offset_seconds,
        })
    }
}
