//! Offline fallback for the time-zone lookup
//!
//! Uses the UTC shift the weather provider reported while resolving the place,
//! so it needs no network and no zone identifier.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};

use super::TimeZoneProvider;
use crate::models::{ResolvedPlace, ZoneTime};
use crate::{Result, ViajeError};

const PROVIDER: &str = "offset-clock";

#[derive(Debug, Default)]
pub struct OffsetClock {
    /// Frozen "now"; the system clock when unset
    now: Option<DateTime<Utc>>,
}

impl OffsetClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that always reports the given instant
    #[must_use]
    pub fn frozen_at(now: DateTime<Utc>) -> Self {
        Self { now: Some(now) }
    }
}

#[async_trait]
impl TimeZoneProvider for OffsetClock {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn local_time(&self, place: &ResolvedPlace) -> Result<ZoneTime> {
        let seconds = place
            .utc_offset_seconds
            .ok_or_else(|| ViajeError::missing(PROVIDER, "utc_offset_seconds"))?;
        let offset = FixedOffset::east_opt(seconds)
            .ok_or_else(|| ViajeError::parse(PROVIDER, format!("offset out of range: {seconds}")))?;

        let now = self.now.unwrap_or_else(Utc::now);
        Ok(ZoneTime {
            zone: None,
            local_time: now.with_timezone(&offset).format("%H:%M").to_string(),
            offset_seconds: i64::from(seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use chrono::TimeZone;

    fn place(offset: Option<i32>) -> ResolvedPlace {
        ResolvedPlace {
            name: "Ciudad de México".to_string(),
            coordinates: Coordinates::new(19.43, -99.13),
            utc_offset_seconds: offset,
        }
    }

    #[tokio::test]
    async fn test_applies_offset() {
        let clock = OffsetClock::frozen_at(Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0).unwrap());
        let zone_time = clock.local_time(&place(Some(-21600))).await.unwrap();
        assert_eq!(zone_time.local_time, "12:30");
        assert_eq!(zone_time.offset_seconds, -21600);
        assert!(zone_time.zone.is_none());
    }

    #[tokio::test]
    async fn test_missing_offset_is_error() {
        let err = OffsetClock::new().local_time(&place(None)).await.unwrap_err();
        assert!(matches!(err, ViajeError::MissingData { .. }));
    }

    #[tokio::test]
    async fn test_out_of_range_offset_is_error() {
        let err = OffsetClock::new()
            .local_time(&place(Some(200_000)))
            .await
            .unwrap_err();
        assert!(matches!(err, ViajeError::Parse { .. }));
    }
}
