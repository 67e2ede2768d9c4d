//! Health check handler

use axum::{extract::State, Json};
use flowguard_core::constants::{APP_NAME, APP_VERSION};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    threshold: f64,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: APP_NAME,
        version: APP_VERSION,
        threshold: state.pipeline.threshold().get(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
