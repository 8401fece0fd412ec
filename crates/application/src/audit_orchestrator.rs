use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use cloud_auditor_core::{AppError, AppResult, NonEmptyString};
use cloud_auditor_domain::{AuditService, RecordedVerdict, Verdict};

use crate::{ServiceAuditor, VerdictRepository};


/// Per-domain result of a full scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScanOutcome {
    /// Audited domain.
    pub service: AuditService,
    /// Verdicts produced for the domain.
    pub audited: usize,
    /// Verdicts that reached the store.
    pub persisted: u64,
    /// Commit or evaluation failure, if any.
    pub error: Option<String>,
}

/// Summary of one completed full scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullScanSummary {
    /// Scan correlation id.
    pub scan_id: Uuid,
    /// Outcomes in completion order.
    pub domains: Vec<DomainScanOutcome>,
}

impl FullScanSummary {
    /// Returns the number of verdicts persisted across all domains.
    #[must_use]
    pub fn persisted(&self) -> u64 {
        self.domains.iter().map(|domain| domain.persisted).sum()
    }
}

/// Runs service auditors and hands their verdicts to the result store.
#[derive(Clone)]
pub struct AuditOrchestrator {
    auditors: Arc<HashMap<AuditService, Arc<dyn ServiceAuditor>>>,
    repository: Arc<dyn VerdictRepository>,
    scan_concurrency: usize,
}

impl AuditOrchestrator {
    /// Creates an orchestrator over the configured auditors.
    ///
    /// `scan_concurrency` caps concurrent resource evaluations per domain
    /// during a full scan and is clamped to `1..=Semaphore::MAX_PERMITS`.
    #[must_use]
    pub fn new(
        auditors: Vec<Arc<dyn ServiceAuditor>>,
        repository: Arc<dyn VerdictRepository>,
        scan_concurrency: usize,
    ) -> Self {
        let auditors = auditors
            .into_iter()
            .map(|auditor| (auditor.service(), auditor))
            .collect();

        Self {
            auditors: Arc::new(auditors),
            repository,
            scan_concurrency: scan_concurrency.clamp(1, Semaphore::MAX_PERMITS),
        }
    }

    /// Audits one resource synchronously and persists its verdict.
    pub async fn audit_resource(
        &self,
        service: AuditService,
        resource_id: &str,
    ) -> AppResult<RecordedVerdict> {
        let resource_id = NonEmptyString::new(resource_id)?;
        let auditor = self.auditors.get(&service).ok_or_else(|| {
            AppError::NotFound(format!("no auditor is configured for service '{service}'"))
        })?;

        let verdict = auditor.evaluate_one(&resource_id).await;
        let recorded = self.repository.insert(verdict).await?;

        info!(
            service = %service,
            resource_id = %resource_id,
            verdict_id = recorded.id(),
            is_compliant = recorded.verdict().is_compliant(),
            "resource audited"
        );

        Ok(recorded)
    }

    /// Audits every resource of every configured domain.
    ///
    /// Domains run independently and each domain's verdicts are committed as
    /// one transaction on a session owned by this scan, so a failed commit
    /// only loses that domain's rows.
    pub async fn run_full_scan(&self, scan_id: Uuid) -> AppResult<FullScanSummary> {
        info!(%scan_id, domains = self.auditors.len(), "full scan started");

        let mut session = self.repository.open_scan_session().await?;
        let mut domains = JoinSet::new();
        let mut domain_tasks = HashMap::new();

        for auditor in self.auditors.values() {
            let auditor = auditor.clone();
            let service = auditor.service();
            let concurrency = self.scan_concurrency;
            let handle =
                domains.spawn(async move { collect_domain(auditor, concurrency, scan_id).await });
            domain_tasks.insert(handle.id(), service);
        }

        let mut summary = FullScanSummary {
            scan_id,
            domains: Vec::with_capacity(domain_tasks.len()),
        };

        while let Some(joined) = domains.join_next().await {
            let (service, verdicts) = match joined {
                Ok(collected) => collected,
                Err(join_error) => {
                    let service = domain_tasks.get(&join_error.id()).copied();
                    error!(
                        %scan_id,
                        service = ?service,
                        error = %join_error,
                        "domain audit task failed"
                    );
                    if let Some(service) = service {
                        summary.domains.push(DomainScanOutcome {
                            service,
                            audited: 0,
                            persisted: 0,
                            error: Some(format!("domain audit task failed: {join_error}")),
                        });
                    }
                    continue;
                }
            };

            let audited = verdicts.len();
            let outcome = if verdicts.is_empty() {
                DomainScanOutcome {
                    service,
                    audited,
                    persisted: 0,
                    error: None,
                }
            } else {
                match session.insert_many(verdicts).await {
                    Ok(persisted) => DomainScanOutcome {
                        service,
                        audited,
                        persisted,
                        error: None,
                    },
                    Err(commit_error) => {
                        error!(
                            %scan_id,
                            service = %service,
                            audited,
                            error = %commit_error,
                            "failed to persist domain verdicts"
                        );
                        DomainScanOutcome {
                            service,
                            audited,
                            persisted: 0,
                            error: Some(commit_error.to_string()),
                        }
                    }
                }
            };

            info!(
                %scan_id,
                service = %outcome.service,
                audited = outcome.audited,
                persisted = outcome.persisted,
                "domain audit finished"
            );
            summary.domains.push(outcome);
        }

        drop(session);
        info!(%scan_id, persisted = summary.persisted(), "full scan completed");

        Ok(summary)
    }
}

async fn collect_domain(
    auditor: Arc<dyn ServiceAuditor>,
    concurrency: usize,
    scan_id: Uuid,
) -> (AuditService, Vec<Verdict>) {
    let service = auditor.service();
    let resource_ids = auditor.list_resource_ids().await;
    info!(%scan_id, service = %service, resources = resource_ids.len(), "resources listed");

    let permits = Arc::new(Semaphore::new(concurrency));
    let mut evaluations = JoinSet::new();
    let mut pending = HashMap::with_capacity(resource_ids.len());

    for resource_id in resource_ids {
        let auditor = auditor.clone();
        let permits = permits.clone();
        let task_resource_id = resource_id.clone();
        let handle = evaluations.spawn(async move {
            let _permit = permits.acquire_owned().await;
            auditor.evaluate_one(&task_resource_id).await
        });
        pending.insert(handle.id(), resource_id);
    }

    let mut verdicts = Vec::with_capacity(pending.len());
    while let Some(joined) = evaluations.join_next().await {
        match joined {
            Ok(verdict) => verdicts.push(verdict),
            Err(join_error) => {
                let Some(resource_id) = pending.get(&join_error.id()).cloned() else {
                    continue;
                };
                warn!(
                    %scan_id,
                    service = %service,
                    resource_id = %resource_id,
                    error = %join_error,
                    "resource evaluation task failed"
                );
                verdicts.push(Verdict::failed(
                    service,
                    resource_id,
                    format!("Error auditing resource: evaluation task failed: {join_error}"),
                ));
            }
        }
    }

    (service, verdicts)
}
