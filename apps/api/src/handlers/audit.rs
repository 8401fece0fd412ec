use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use cloud_auditor_domain::AuditService;

use crate::dto::{ScanAcceptedResponse, VerdictResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn run_full_scan_handler(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<ScanAcceptedResponse>)> {
    let job = state.scan_dispatcher.submit()?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ScanAcceptedResponse {
            message: "Full cloud audit started in background.".to_owned(),
            scan_id: job.scan_id,
        }),
    ))
}

pub async fn audit_resource_handler(
    State(state): State<AppState>,
    Path((service, resource_id)): Path<(String, String)>,
) -> ApiResult<Json<VerdictResponse>> {
    let service = service.parse::<AuditService>()?;
    let recorded = state
        .audit_orchestrator
        .audit_resource(service, resource_id.as_str())
        .await?;

    Ok(Json(VerdictResponse::from(recorded)))
}
