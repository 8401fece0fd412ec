use chrono::{DateTime, Utc};
use cloud_auditor_core::{AppError, AppResult, NonEmptyString};
use serde::Serialize;

use crate::{AuditService, CheckName, CheckOutcome};

/// Outcome of one compliance check against one resource.
///
/// The check is derived from the service, so a verdict can only carry one of
/// the known `(service, check)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    service: AuditService,
    resource_id: NonEmptyString,
    check_name: CheckName,
    is_compliant: bool,
    details: String,
    timestamp: DateTime<Utc>,
}

impl Verdict {
    /// Creates a verdict stamped with the current time.
    #[must_use]
    pub fn new(service: AuditService, resource_id: NonEmptyString, outcome: CheckOutcome) -> Self {
        Self {
            service,
            resource_id,
            check_name: service.check_name(),
            is_compliant: outcome.is_compliant,
            details: outcome.details,
            timestamp: Utc::now(),
        }
    }

    /// Creates a non-compliant verdict recording a failed audit attempt.
    #[must_use]
    pub fn failed(service: AuditService, resource_id: NonEmptyString, details: String) -> Self {
        Self::new(
            service,
            resource_id,
            CheckOutcome {
                is_compliant: false,
                details,
            },
        )
    }

    /// Rebuilds a verdict from persisted values, validating the check pairing.
    pub fn restore(
        service: AuditService,
        resource_id: NonEmptyString,
        check_name: CheckName,
        is_compliant: bool,
        details: String,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Self> {
        if check_name.service() != service {
            return Err(AppError::Validation(format!(
                "check '{check_name}' does not belong to service '{service}'"
            )));
        }

        Ok(Self {
            service,
            resource_id,
            check_name,
            is_compliant,
            details,
            timestamp,
        })
    }

    /// Returns the audited service.
    #[must_use]
    pub fn service(&self) -> AuditService {
        self.service
    }

    /// Returns the audited resource identifier.
    #[must_use]
    pub fn resource_id(&self) -> &NonEmptyString {
        &self.resource_id
    }

    /// Returns the evaluated check.
    #[must_use]
    pub fn check_name(&self) -> CheckName {
        self.check_name
    }

    /// Returns whether the resource passed.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.is_compliant
    }

    /// Returns the explanation.
    #[must_use]
    pub fn details(&self) -> &str {
        self.details.as_str()
    }

    /// Returns when the verdict was produced.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Verdict together with its storage-assigned sequence id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedVerdict {
    id: i64,
    #[serde(flatten)]
    verdict: Verdict,
}

impl RecordedVerdict {
    /// Pairs a stored verdict with its id.
    #[must_use]
    pub fn new(id: i64, verdict: Verdict) -> Self {
        Self { id, verdict }
    }

    /// Returns the storage-assigned id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the stored verdict.
    #[must_use]
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }
}
