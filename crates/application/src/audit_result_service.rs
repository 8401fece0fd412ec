use std::sync::Arc;

use tracing::info;

use cloud_auditor_core::AppResult;
use cloud_auditor_domain::{ComplianceStats, RecordedVerdict};

use crate::{VerdictQuery, VerdictRepository};

/// Read and maintenance operations over stored verdicts.
#[derive(Clone)]
pub struct AuditResultService {
    repository: Arc<dyn VerdictRepository>,
}

impl AuditResultService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn VerdictRepository>) -> Self {
        Self { repository }
    }

    /// Lists matching verdicts, newest first.
    pub async fn list_results(&self, query: VerdictQuery) -> AppResult<Vec<RecordedVerdict>> {
        self.repository.query(query).await
    }

    /// Returns aggregate compliance counters.
    pub async fn compliance_stats(&self) -> AppResult<ComplianceStats> {
        self.repository.stats().await
    }

    /// Irreversibly deletes all stored verdicts.
    pub async fn clear_results(&self) -> AppResult<u64> {
        let removed = self.repository.clear_all().await?;
        info!(removed, "audit history cleared");
        Ok(removed)
    }
}
