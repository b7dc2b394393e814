//! Current weather conditions and their two presentation shapes

use serde::{Deserialize, Serialize};

use super::{Coordinates, ResolvedPlace};

/// Conversion factor from m/s to km/h
pub const MS_TO_KMH: f64 = 3.6;

/// Current conditions for a resolved place, as reported by the weather provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Place name as resolved by the provider
    pub city: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    /// Human-readable description, provider language
    pub description: String,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    pub coordinates: Coordinates,
    /// Shift from UTC in seconds at the place, when reported
    pub utc_offset_seconds: Option<i32>,
}

/// Short weather summary for the info panel
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherBrief {
    /// Temperature in Celsius, one decimal
    pub temperature: f64,
    pub description: String,
    pub city: String,
    pub country: String,
}

impl CurrentConditions {
    /// Wind speed in km/h
    #[must_use]
    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed_ms * MS_TO_KMH
    }

    /// Description with only the first letter upper-cased
    #[must_use]
    pub fn format_description(&self) -> String {
        capitalize(&self.description)
    }

    /// Where the provider placed the query
    #[must_use]
    pub fn place(&self) -> ResolvedPlace {
        ResolvedPlace {
            name: self.city.clone(),
            coordinates: self.coordinates,
            utc_offset_seconds: self.utc_offset_seconds,
        }
    }

    /// Panel-sized summary
    #[must_use]
    pub fn brief(&self) -> WeatherBrief {
        WeatherBrief {
            temperature: (self.temperature * 10.0).round() / 10.0,
            description: self.format_description(),
            city: self.city.clone(),
            country: self.country.clone(),
        }
    }

    /// Multi-line block injected into the model prompt
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "🌤️ CLIMA ACTUAL EN {}, {}:\n\
             • Temperatura: {:.1}°C\n\
             • Sensación térmica: {:.1}°C\n\
             • Condiciones: {}\n\
             • Humedad: {}%\n\
             • Viento: {:.1} km/h",
            self.city.to_uppercase(),
            self.country,
            self.temperature,
            self.feels_like,
            self.format_description(),
            self.humidity,
            self.wind_speed_kmh()
        )
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
