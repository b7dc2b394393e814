//! Configuration management for the `ViajeIA` service
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates the result. Provider credentials are optional:
//! a missing key disables the matching feature instead of failing startup.

use crate::ViajeError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Origins allowed during local development
pub const LOCAL_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Root configuration structure for the `ViajeIA` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViajeConfig {
    /// External provider credentials
    #[serde(default)]
    pub providers: ProviderKeys,
    /// Provider endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Language model selection
    #[serde(default)]
    pub models: ModelConfig,
    /// Destination extraction data
    #[serde(default)]
    pub extractor: ExtractorConfig,
    /// Outgoing HTTP settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Weather query settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Listening socket and CORS
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Credentials for the keyed providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderKeys {
    /// Generative language API key
    pub gemini_api_key: Option<String>,
    /// OpenWeatherMap API key
    pub openweather_api_key: Option<String>,
    /// Unsplash access key
    pub unsplash_access_key: Option<String>,
}

/// Base URLs of every provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_gemini_url")]
    pub gemini: String,
    #[serde(default = "default_openweather_url")]
    pub openweather: String,
    #[serde(default = "default_exchange_url")]
    pub exchange: String,
    #[serde(default = "default_timeapi_url")]
    pub timeapi: String,
    #[serde(default = "default_unsplash_url")]
    pub unsplash: String,
}

/// Language model candidates, most preferred first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_candidates")]
    pub candidates: Vec<String>,
}

/// Destination extractor data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Regexes tried in order; capture group 1 is the place
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    /// Words that look like places but never are
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,
}

/// Outgoing HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-call timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

/// Weather query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Language of the condition descriptions
    #[serde(default = "default_weather_language")]
    pub language: String,
}

/// Listening socket and CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Running on a hosting platform
    #[serde(default)]
    pub production: bool,
    /// Explicit origin list; wins over every other CORS mode
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Resolved cross-origin policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsMode {
    /// Only these origins
    List(Vec<String>),
    /// Any origin, echoed back so credentials keep working
    AnyOrigin,
}

// Default value functions
fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_openweather_url() -> String {
    "http://api.openweathermap.org".to_string()
}

fn default_exchange_url() -> String {
    "https://api.exchangerate-api.com".to_string()
}

fn default_timeapi_url() -> String {
    "https://timeapi.io".to_string()
}

fn default_unsplash_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_model_candidates() -> Vec<String> {
    [
        "gemini-2.5-flash",
        "gemini-2.5-flash-preview-05-20",
        "gemini-2.5-pro-preview-03-25",
        "gemini-2.5-flash-lite-preview-06-17",
        "gemini-1.5-flash",
        "gemini-1.5-pro",
        "gemini-pro",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_patterns() -> Vec<String> {
    const PLACE: &str = r"(\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)?)";
    vec![
        format!(r"(?i:\b(?:in|to|from|for|towards))\s+{PLACE}"),
        format!(r"(?i:\b(?:en|a|de|para|hacia|desde))\s+{PLACE}"),
        format!(r"{PLACE}\s+(?i:is|has|offers|es|tiene|ofrece)\b"),
    ]
}

fn default_stopwords() -> Vec<String> {
    [
        "trip",
        "travel",
        "destination",
        "place",
        "city",
        "country",
        "viaje",
        "viajar",
        "viajero",
        "destino",
        "lugar",
        "ciudad",
        "país",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_http_timeout() -> u64 {
    5
}

fn default_weather_language() -> String {
    "es".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            gemini: default_gemini_url(),
            openweather: default_openweather_url(),
            exchange: default_exchange_url(),
            timeapi: default_timeapi_url(),
            unsplash: default_unsplash_url(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            candidates: default_model_candidates(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            stopwords: default_stopwords(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            language: default_weather_language(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            production: false,
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ViajeConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = env::var("VIAJEIA_CONFIG").ok().map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("viajeia.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("VIAJEIA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        // Conventional variable names used by hosting platforms and .env files
        builder = builder
            .set_override_option("providers.gemini_api_key", env::var("GEMINI_API_KEY").ok())?
            .set_override_option(
                "providers.openweather_api_key",
                env::var("OPENWEATHER_API_KEY").ok(),
            )?
            .set_override_option(
                "providers.unsplash_access_key",
                env::var("UNSPLASH_ACCESS_KEY").ok(),
            )?;

        let port = env::var("PORT").ok();
        if let Some(port) = &port {
            let port: u16 = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
            builder = builder
                .set_override("server.port", port)?
                .set_override("server.production", true)?;
        }

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ViajeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if let Ok(origins) = env::var("ALLOWED_ORIGINS") {
            config.server.allowed_origins = parse_origin_list(&origins);
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Normalise values that deserialised but are unusable as-is
    pub fn apply_defaults(&mut self) {
        for key in [
            &mut self.providers.gemini_api_key,
            &mut self.providers.openweather_api_key,
            &mut self.providers.unsplash_access_key,
        ] {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                *key = None;
            }
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.weather.language.is_empty() {
            self.weather.language = default_weather_language();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        self.server.allowed_origins.retain(|o| !o.trim().is_empty());
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 60 {
            return Err(
                ViajeError::config("HTTP timeout cannot exceed 60 seconds").into(),
            );
        }

        if self.extractor.patterns.is_empty() {
            return Err(ViajeError::config("At least one destination pattern is required").into());
        }

        if self.models.candidates.is_empty() {
            return Err(ViajeError::config("At least one model candidate is required").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ViajeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ViajeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let endpoints = [
            ("gemini", &self.endpoints.gemini),
            ("openweather", &self.endpoints.openweather),
            ("exchange", &self.endpoints.exchange),
            ("timeapi", &self.endpoints.timeapi),
            ("unsplash", &self.endpoints.unsplash),
        ];
        for (name, url) in endpoints {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ViajeError::config(format!(
                    "Endpoint '{name}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Resolve the cross-origin policy
    #[must_use]
    pub fn cors_mode(&self) -> CorsMode {
        if !self.server.allowed_origins.is_empty() {
            CorsMode::List(self.server.allowed_origins.clone())
        } else if self.server.production {
            CorsMode::AnyOrigin
        } else {
            CorsMode::List(LOCAL_ORIGINS.iter().map(|o| o.to_string()).collect())
        }
    }

    /// Warn about every feature a missing credential disables
    pub fn log_missing_credentials(&self) {
        if self.providers.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set: trip planning answers will report a configuration error");
        }
        if self.providers.openweather_api_key.is_none() {
            tracing::warn!("OPENWEATHER_API_KEY not set: weather and local time are unavailable");
        }
        if self.providers.unsplash_access_key.is_none() {
            tracing::warn!("UNSPLASH_ACCESS_KEY not set: destination photos are unavailable");
        }
    }
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViajeConfig::default();
        assert_eq!(config.http.timeout_seconds, 5);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.weather.language, "es");
        assert_eq!(config.models.candidates[0], "gemini-2.5-flash");
        assert_eq!(config.models.candidates.last().unwrap(), "gemini-pro");
        assert!(config.providers.gemini_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_credentials_become_absent() {
        let mut config = ViajeConfig::default();
        config.providers.unsplash_access_key = Some("   ".to_string());
        config.providers.gemini_api_key = Some("key-123".to_string());
        config.apply_defaults();
        assert!(config.providers.unsplash_access_key.is_none());
        assert_eq!(config.providers.gemini_api_key.as_deref(), Some("key-123"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ViajeConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = ViajeConfig::default();
        config.http.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_empty_candidates() {
        let mut config = ViajeConfig::default();
        config.models.candidates.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_endpoint() {
        let mut config = ViajeConfig::default();
        config.endpoints.timeapi = "timeapi.io".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeapi"));
    }

    #[test]
    fn test_cors_defaults_to_localhost() {
        let config = ViajeConfig::default();
        assert_eq!(
            config.cors_mode(),
            CorsMode::List(vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string()
            ])
        );
    }

    #[test]
    fn test_cors_production_allows_any_origin() {
        let mut config = ViajeConfig::default();
        config.server.production = true;
        assert_eq!(config.cors_mode(), CorsMode::AnyOrigin);
    }

    #[test]
    fn test_cors_explicit_list_wins() {
        let mut config = ViajeConfig::default();
        config.server.production = true;
        config.server.allowed_origins = parse_origin_list(" https://a.app , ,https://b.app");
        assert_eq!(
            config.cors_mode(),
            CorsMode::List(vec!["https://a.app".to_string(), "https://b.app".to_string()])
        );
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = env::temp_dir().join(format!("viajeia-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("viajeia.toml");
        std::fs::write(
            &path,
            r#"
[http]
timeout_seconds = 7

[models]
candidates = ["gemini-test"]

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = ViajeConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.http.timeout_seconds, 7);
        assert_eq!(config.models.candidates, vec!["gemini-test".to_string()]);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");

        std::fs::remove_dir_all(dir).ok();
    }
}
