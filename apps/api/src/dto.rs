use chrono::{DateTime, Utc};
use cloud_auditor_domain::{AuditService, CheckName, ComplianceStats, RecordedVerdict};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Plain acknowledgement payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Acknowledgement for a queued full scan.
#[derive(Debug, Serialize)]
pub struct ScanAcceptedResponse {
    pub message: String,
    pub scan_id: Uuid,
}

/// Filters accepted by the result listing.
///
/// Values are kept raw so malformed filters surface as validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct AuditResultsQuery {
    pub service: Option<String>,
    pub compliant: Option<String>,
}

/// API representation of a stored verdict.
#[derive(Debug, Serialize)]
pub struct VerdictResponse {
    pub id: i64,
    pub service: AuditService,
    pub resource_id: String,
    pub check_name: CheckName,
    pub is_compliant: bool,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl From<RecordedVerdict> for VerdictResponse {
    fn from(value: RecordedVerdict) -> Self {
        let verdict = value.verdict();
        Self {
            id: value.id(),
            service: verdict.service(),
            resource_id: verdict.resource_id().as_str().to_owned(),
            check_name: verdict.check_name(),
            is_compliant: verdict.is_compliant(),
            details: verdict.details().to_owned(),
            timestamp: verdict.timestamp(),
        }
    }
}

/// Aggregate compliance statistics.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub compliance_score_percent: f64,
}

impl From<ComplianceStats> for StatsResponse {
    fn from(value: ComplianceStats) -> Self {
        Self {
            total: value.total,
            passed: value.passed,
            failed: value.failed,
            compliance_score_percent: value.compliance_score_percent,
        }
    }
}
