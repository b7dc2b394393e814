//! Request and response bodies of the HTTP surface

use serde::{Deserialize, Serialize};

use super::{ConversationTurn, TripInfo};

/// Body of `POST /api/planificar`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(alias = "pregunta")]
    pub question: String,
    #[serde(default, alias = "informacion_viaje")]
    pub trip_info: TripInfo,
    #[serde(default, alias = "historial")]
    pub history: Vec<ConversationTurn>,
}

/// Model answer plus up to three destination photos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningAnswer {
    pub answer: String,
    pub photos: Vec<String>,
}

impl PlanningAnswer {
    /// Answer that only carries a message for the user
    pub fn message<S: Into<String>>(text: S) -> Self {
        Self {
            answer: text.into(),
            photos: Vec::new(),
        }
    }
}

/// Query of `GET /api/info-panel`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoPanelQuery {
    #[serde(default, alias = "ciudad")]
    pub city: Option<String>,
}

/// Side-panel facts; each one is filled independently
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoPanelAnswer {
    pub temperature: Option<f64>,
    pub weather_description: Option<String>,
    pub usd_rate: Option<f64>,
    pub eur_rate: Option<f64>,
    /// Mexican pesos per dollar
    pub mxn_rate: Option<f64>,
    pub time_offset_label: Option<String>,
    pub local_time: Option<String>,
    pub resolved_city: Option<String>,
    pub time_zone: Option<String>,
}
