use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use cloud_auditor_core::AppError;
use cloud_auditor_domain::{AuditService, CheckName};

use super::audit::{audit_resource_handler, run_full_scan_handler};
use super::health::health_handler;
use super::results::verdict_query_from_request;
use crate::dto::AuditResultsQuery;
use crate::test_support::test_state;

fn query(service: Option<&str>, compliant: Option<&str>) -> AuditResultsQuery {
    AuditResultsQuery {
        service: service.map(str::to_owned),
        compliant: compliant.map(str::to_owned),
    }
}

#[tokio::test]
async fn health_reports_service_name() {
    let Json(health) = health_handler().await;

    assert_eq!(health.status, "ok");
    assert_eq!(health.service, "Cloud Resource Auditor");
}

#[test]
fn result_filters_accept_aliases_and_flags() {
    let Ok(parsed) = verdict_query_from_request(query(Some("s3"), Some("False"))) else {
        panic!("filters should parse");
    };
    assert_eq!(parsed.service, Some(AuditService::Storage));
    assert_eq!(parsed.is_compliant, Some(false));

    let Ok(unfiltered) = verdict_query_from_request(query(Some(" "), None)) else {
        panic!("blank filters should be ignored");
    };
    assert_eq!(unfiltered.service, None);
    assert_eq!(unfiltered.is_compliant, None);
}

#[test]
fn result_filters_reject_unknown_values() {
    assert!(matches!(
        verdict_query_from_request(query(Some("dns"), None)),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        verdict_query_from_request(query(None, Some("maybe"))),
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn audit_resource_persists_and_returns_verdict() {
    let state = test_state();

    let Ok(Json(verdict)) = audit_resource_handler(
        State(state.clone()),
        Path(("network".to_owned(), "sg-open".to_owned())),
    )
    .await
    else {
        panic!("single audit should succeed");
    };

    assert!(verdict.id > 0);
    assert_eq!(verdict.check_name, CheckName::SshExposure);
    assert!(!verdict.is_compliant);
    assert_eq!(verdict.details, "Port 22 is open to the world");

    let stored = state.audit_result_service.compliance_stats().await;
    assert!(stored.is_ok_and(|stats| stats.total == 1 && stats.failed == 1));
}

#[tokio::test]
async fn audit_resource_rejects_unknown_service() {
    let state = test_state();

    let result = audit_resource_handler(
        State(state),
        Path(("dns".to_owned(), "zone-1".to_owned())),
    )
    .await;

    assert!(matches!(result, Err(error) if matches!(error.0, AppError::Validation(_))));
}

#[tokio::test]
async fn full_scan_is_acknowledged_with_accepted() {
    let state = test_state();

    let Ok((status, Json(accepted))) = run_full_scan_handler(State(state)).await else {
        panic!("full scan should be queued");
    };

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(accepted.message, "Full cloud audit started in background.");
}
