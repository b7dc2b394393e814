//! `ViajeIA` - Travel planning assistant backend
//!
//! Answers free-text travel questions with a language model, enriching the
//! prompt with live weather and attaching destination photos. A side panel
//! endpoint serves exchange rates, weather and local time for a city.

pub mod api;
pub mod config;
pub mod destination;
pub mod enrichment;
pub mod error;
pub mod logging;
pub mod models;
pub mod planner;
pub mod prompt;
pub mod providers;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::{CorsMode, ViajeConfig};
pub use destination::DestinationExtractor;
pub use enrichment::{DestinationContext, Enricher};
pub use error::ViajeError;
pub use models::{InfoPanelAnswer, PlanRequest, PlanningAnswer, TripInfo};
pub use planner::{InvocationFailure, ModelInvoker, TripPlanner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ViajeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
