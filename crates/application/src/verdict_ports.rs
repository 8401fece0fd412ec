use async_trait::async_trait;

use cloud_auditor_core::AppResult;
use cloud_auditor_domain::{AuditService, ComplianceStats, RecordedVerdict, Verdict};

/// Optional filters for verdict retrieval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictQuery {
    /// Restricts results to one service.
    pub service: Option<AuditService>,
    /// Restricts results to compliant or non-compliant verdicts.
    pub is_compliant: Option<bool>,
}

impl VerdictQuery {
    /// Returns whether a verdict satisfies every set filter.
    #[must_use]
    pub fn matches(&self, verdict: &Verdict) -> bool {
        self.service.is_none_or(|service| verdict.service() == service)
            && self
                .is_compliant
                .is_none_or(|is_compliant| verdict.is_compliant() == is_compliant)
    }
}

/// Repository port for the append-only verdict store.
#[async_trait]
pub trait VerdictRepository: Send + Sync {
    /// Persists one verdict and returns it with its assigned id.
    async fn insert(&self, verdict: Verdict) -> AppResult<RecordedVerdict>;

    /// Persists verdicts in a single transaction, returning the row count.
    async fn insert_many(&self, verdicts: Vec<Verdict>) -> AppResult<u64>;

    /// Lists matching verdicts, newest first.
    async fn query(&self, query: VerdictQuery) -> AppResult<Vec<RecordedVerdict>>;

    /// Aggregates compliance counters over all stored verdicts.
    async fn stats(&self) -> AppResult<ComplianceStats>;

    /// Deletes every stored verdict, returning the removed row count.
    async fn clear_all(&self) -> AppResult<u64>;

    /// Opens a write session owned by a single full scan.
    async fn open_scan_session(&self) -> AppResult<Box<dyn ScanSession>>;
}

/// Write session exclusive to one full scan.
///
/// Dropping the session releases it.
#[async_trait]
pub trait ScanSession: Send {
    /// Persists one batch of verdicts in a single transaction.
    async fn insert_many(&mut self, verdicts: Vec<Verdict>) -> AppResult<u64>;
}
