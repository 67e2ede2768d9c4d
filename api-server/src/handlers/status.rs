//! Engine status handler

use axum::{extract::State, Json};
use flowguard_core::constants::{APP_NAME, APP_VERSION};
use flowguard_core::logic::audit::AuditFormat;
use flowguard_core::ModelMetadata;
use serde::Serialize;

use crate::models::StatsSnapshot;
use crate::AppState;

#[derive(Serialize)]
pub struct AuditInfo {
    pub format: AuditFormat,
    pub path: String,
}

#[derive(Serialize)]
pub struct EngineStatus {
    pub service: &'static str,
    pub version: &'static str,
    pub threshold: f64,
    pub model: ModelMetadata,
    pub audit: AuditInfo,
    pub stats: StatsSnapshot,
}

pub async fn model_status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(EngineStatus {
        service: APP_NAME,
        version: APP_VERSION,
        threshold: state.pipeline.threshold().get(),
        model: (*state.model).clone(),
        audit: AuditInfo {
            format: state.config.audit_format,
            path: state.config.audit_log_path.display().to_string(),
        },
        stats: state.stats.snapshot(),
    })
}
