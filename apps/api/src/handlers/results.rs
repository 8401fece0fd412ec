use axum::Json;
use axum::extract::{Query, State};
use cloud_auditor_application::VerdictQuery;
use cloud_auditor_core::{AppError, AppResult};
use cloud_auditor_domain::AuditService;

use crate::dto::{AuditResultsQuery, MessageResponse, StatsResponse, VerdictResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_audit_results_handler(
    State(state): State<AppState>,
    Query(query): Query<AuditResultsQuery>,
) -> ApiResult<Json<Vec<VerdictResponse>>> {
    let query = verdict_query_from_request(query)?;
    let results = state
        .audit_result_service
        .list_results(query)
        .await?
        .into_iter()
        .map(VerdictResponse::from)
        .collect();

    Ok(Json(results))
}

pub async fn audit_stats_handler(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.audit_result_service.compliance_stats().await?;
    Ok(Json(StatsResponse::from(stats)))
}

pub async fn clear_audit_results_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<MessageResponse>> {
    state.audit_result_service.clear_results().await?;

    Ok(Json(MessageResponse {
        message: "All audit history cleared.".to_owned(),
    }))
}

pub(crate) fn verdict_query_from_request(query: AuditResultsQuery) -> AppResult<VerdictQuery> {
    let service = non_blank(query.service)
        .map(|value| value.parse::<AuditService>())
        .transpose()?;
    let is_compliant = non_blank(query.compliant)
        .map(|value| parse_flag(value.as_str()))
        .transpose()?;

    Ok(VerdictQuery {
        service,
        is_compliant,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> AppResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "compliant must be a boolean, got '{value}'"
        ))),
    }
}
