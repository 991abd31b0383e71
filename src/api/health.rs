use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::chat::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    model: ComponentHealth,
    gazetteer: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    detail: String,
}

impl ComponentHealth {
    fn healthy(detail: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            detail: detail.into(),
        }
    }
}

/// GET /healthz
///
/// Artifacts are validated at startup, so a running process always has a
/// usable model; the checks report what was loaded.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.pipeline.predictor().artifacts().regressor_kind();
    let cities = state.pipeline.gazetteer().len();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        checks: HealthChecks {
            model: ComponentHealth::healthy(model),
            gazetteer: ComponentHealth::healthy(format!("{cities} cities")),
        },
    })
}
