use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::models::{InfoPanelAnswer, InfoPanelQuery, PlanRequest, PlanningAnswer};
use crate::planner::TripPlanner;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
}

impl AppState {
    pub fn new(planner: TripPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/planificar", post(plan_trip))
        .route("/info-panel", get(info_panel))
}

pub async fn root() -> Json<Value> {
    Json(json!({"message": "ViajeIA API está funcionando correctamente"}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

#[instrument(skip_all)]
async fn plan_trip(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Json<PlanningAnswer> {
    Json(state.planner.plan(&request).await)
}

#[instrument(skip_all, fields(city = ?query.city))]
async fn info_panel(
    State(state): State<AppState>,
    Query(query): Query<InfoPanelQuery>,
) -> Json<InfoPanelAnswer> {
    Json(state.planner.enricher().info_panel(query.city.as_deref()).await)
}
