//! Error types and handling for the `ViajeIA` service

use thiserror::Error;

/// Main error type for the `ViajeIA` service
#[derive(Error, Debug)]
pub enum ViajeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport failures (connect, timeout, TLS) talking to a provider
    #[error("{provider} request failed: {message}")]
    Http { provider: String, message: String },

    /// Provider answered with a non-success status
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// Provider answered with a body we could not decode
    #[error("Invalid {provider} response: {message}")]
    Parse { provider: String, message: String },

    /// Provider answered but a field we need was absent
    #[error("{provider} response is missing '{field}'")]
    MissingData { provider: String, field: String },

    /// The language model rejected the requested model identifier
    #[error("Model '{model}' not found (404)")]
    ModelNotFound { model: String },
}

impl ViajeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new transport error for a provider
    pub fn http<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Http {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new status error for a provider
    pub fn status<P: Into<String>, S: Into<String>>(provider: P, status: u16, body: S) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a new decoding error for a provider
    pub fn parse<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Parse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new missing-field error for a provider
    pub fn missing<P: Into<String>, S: Into<String>>(provider: P, field: S) -> Self {
        Self::MissingData {
            provider: provider.into(),
            field: field.into(),
        }
    }

    /// Whether the error means "this model identifier does not exist".
    ///
    /// Besides the dedicated variant, any 404 status or any message carrying a
    /// "404" / "not found" marker counts, since providers word this differently.
    #[must_use]
    pub fn is_model_not_found(&self) -> bool {
        match self {
            ViajeError::ModelNotFound { .. } => true,
            ViajeError::Status { status: 404, .. } => true,
            other => {
                let text = other.to_string().to_lowercase();
                text.contains("404") || text.contains("not found")
            }
        }
    }
}
