//! Currency and local-time enrichment results

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base currency of every rate lookup
pub const BASE_CURRENCY: &str = "USD";

/// Raw rate table: units of each currency per one unit of `base`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    /// Non-zero rate for a currency code
    #[must_use]
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied().filter(|r| *r != 0.0 && r.is_finite())
    }
}

/// USD/EUR rates in both directions. A field is absent when the provider did
/// not report a usable rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    /// Euros per US dollar as reported, 4 decimals
    pub eur_to_usd: Option<f64>,
    /// Inverse of `eur_to_usd`, 4 decimals
    pub usd_to_eur_inverse: Option<f64>,
    /// Mexican pesos per US dollar, 2 decimals
    pub usd_to_mxn: Option<f64>,
}

impl ExchangeRates {
    /// Derive both directions from a USD-based table
    #[must_use]
    pub fn from_table(table: &RateTable) -> Self {
        let eur = table.rate("EUR");
        Self {
            eur_to_usd: eur.map(|r| round_to(r, 4)),
            usd_to_eur_inverse: eur.map(|r| round_to(1.0 / r, 4)),
            usd_to_mxn: table.rate("MXN").map(|r| round_to(r, 2)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.eur_to_usd.is_none() && self.usd_to_eur_inverse.is_none() && self.usd_to_mxn.is_none()
    }
}

/// What a time-zone provider reports for a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTime {
    /// IANA zone identifier, when the provider knows it
    pub zone: Option<String>,
    /// Wall-clock time at the place, as the provider formats it
    pub local_time: String,
    /// Offset from UTC in seconds
    pub offset_seconds: i64,
}

/// Local time at a destination, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTime {
    /// `HH:MM` or `HH:MM:SS`
    pub local_time: String,
    /// `+2h`, `-5h` or `0h`
    pub offset_label: String,
    /// IANA identifier, absent when the time came from a bare offset
    pub zone: Option<String>,
}

impl From<ZoneTime> for LocalTime {
    fn from(value: ZoneTime) -> Self {
        Self {
            local_time: clock_part(&value.local_time),
            offset_label: offset_label(value.offset_seconds as f64 / 3600.0),
            zone: value.zone,
        }
    }
}

/// Signed hour label, bare `0h` for UTC
#[must_use]
pub fn offset_label(offset_hours: f64) -> String {
    if offset_hours == 0.0 {
        "0h".to_string()
    } else {
        format!("{offset_hours:+.0}h")
    }
}

/// Keep only the wall-clock part of an ISO timestamp, without fractional seconds
fn clock_part(raw: &str) -> String {
    match raw.split_once('T') {
        Some((_, time)) => time.split('.').next().unwrap_or(time).to_string(),
        None => raw.to_string(),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
