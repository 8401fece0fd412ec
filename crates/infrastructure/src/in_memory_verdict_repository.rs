use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cloud_auditor_application::{ScanSession, VerdictQuery, VerdictRepository};
use cloud_auditor_core::AppResult;
use cloud_auditor_domain::{ComplianceStats, RecordedVerdict, Verdict};


#[derive(Default)]
struct InMemoryVerdictState {
    rows: Vec<RecordedVerdict>,
    last_id: i64,
}

impl InMemoryVerdictState {
    fn append(&mut self, verdict: Verdict) -> RecordedVerdict {
        self.last_id += 1;
        let recorded = RecordedVerdict::new(self.last_id, verdict);
        self.rows.push(recorded.clone());
        recorded
    }
}

/// In-memory verdict store for local runs and tests.
///
/// Ids keep increasing across `clear_all`, matching a database sequence.
#[derive(Clone, Default)]
pub struct InMemoryVerdictRepository {
    state: Arc<RwLock<InMemoryVerdictState>>,
}

impl InMemoryVerdictRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerdictRepository for InMemoryVerdictRepository {
    async fn insert(&self, verdict: Verdict) -> AppResult<RecordedVerdict> {
        Ok(self.state.write().await.append(verdict))
    }

    async fn insert_many(&self, verdicts: Vec<Verdict>) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let inserted = verdicts.len() as u64;
        for verdict in verdicts {
            state.append(verdict);
        }

        Ok(inserted)
    }

    async fn query(&self, query: VerdictQuery) -> AppResult<Vec<RecordedVerdict>> {
        let mut rows: Vec<RecordedVerdict> = self
            .state
            .read()
            .await
            .rows
            .iter()
            .filter(|row| query.matches(row.verdict()))
            .cloned()
            .collect();

        rows.sort_by(|left, right| {
            right
                .verdict()
                .timestamp()
                .cmp(&left.verdict().timestamp())
                .then_with(|| right.id().cmp(&left.id()))
        });

        Ok(rows)
    }

    async fn stats(&self) -> AppResult<ComplianceStats> {
        let state = self.state.read().await;
        let passed = state
            .rows
            .iter()
            .filter(|row| row.verdict().is_compliant())
            .count() as u64;
        let failed = state.rows.len() as u64 - passed;

        Ok(ComplianceStats::from_counts(passed, failed))
    }

    async fn clear_all(&self) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let removed = state.rows.len() as u64;
        state.rows.clear();

        Ok(removed)
    }

    async fn open_scan_session(&self) -> AppResult<Box<dyn ScanSession>> {
        Ok(Box::new(InMemoryScanSession {
            repository: self.clone(),
        }))
    }
}

struct InMemoryScanSession {
    repository: InMemoryVerdictRepository,
}

#[async_trait]
impl ScanSession for InMemoryScanSession {
    async fn insert_many(&mut self, verdicts: Vec<Verdict>) -> AppResult<u64> {
        self.repository.insert_many(verdicts).await
    }
}
