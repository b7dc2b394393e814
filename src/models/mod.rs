//! Data models for the ViajeIA service
//!
//! This module contains the domain models organized by concern:
//! - Trip: caller-supplied trip metadata and conversation history
//! - Location: geographic coordinates
//! - Weather: current conditions and their presentation shapes
//! - Enrichment: exchange rates and local time
//! - Answer: HTTP request and response bodies

pub mod answer;
pub mod enrichment;
pub mod location;
pub mod trip;
pub mod weather;

// Re-export all public types for convenient access
pub use answer::{InfoPanelAnswer, InfoPanelQuery, PlanRequest, PlanningAnswer};
pub use enrichment::{BASE_CURRENCY, ExchangeRates, LocalTime, RateTable, ZoneTime};
pub use location::{Coordinates, ResolvedPlace};
pub use trip::{Budget, ConversationTurn, Preference, TripInfo};
pub use weather::{CurrentConditions, WeatherBrief};
