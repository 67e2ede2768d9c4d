//! Flow submission handler

use axum::{extract::State, Json};
use flowguard_core::{FlowRequest, PipelineError, Verdict};
use uuid::Uuid;

use crate::middleware::ClientIdentity;
use crate::models::FlowSubmission;
use crate::{AppResult, AppState};

/// Evaluate one flow: 200 with the verdict, 400 on invalid input, 500 when
/// the binary model fails
pub async fn submit(
    State(state): State<AppState>,
    client: ClientIdentity,
    FlowSubmission(features): FlowSubmission,
) -> AppResult<Json<Verdict>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("submit", %request_id, client = client.as_str());

    state.stats.record_request();

    let request = FlowRequest::new(features, client.0);
    let result = span.in_scope(|| state.pipeline.assess(&request, state.audit.as_ref()));

    match result {
        Ok(verdict) => {
            span.in_scope(|| {
                tracing::info!(
                    label = %verdict.binary_label(),
                    score = verdict.binary_score(),
                    attack_type = verdict.attack_type().unwrap_or("-"),
                    degraded = verdict.is_degraded(),
                    "Flow classified"
                )
            });
            state.stats.record_verdict(&verdict);
            Ok(Json(verdict))
        }
        Err(e) => {
            match &e {
                PipelineError::InvalidInput { .. } => state.stats.record_rejected(),
                PipelineError::BinaryStage(_) => state.stats.record_failed(),
            }
            Err(e.into())
        }
    }
}
