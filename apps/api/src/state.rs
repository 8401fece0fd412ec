use std::sync::Arc;

use cloud_auditor_application::{AuditOrchestrator, AuditResultService, ScanDispatcher};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub audit_orchestrator: AuditOrchestrator,
    pub scan_dispatcher: ScanDispatcher,
    pub audit_result_service: AuditResultService,
    pub api_key: Arc<str>,
}
