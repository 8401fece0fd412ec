//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_orchestrator;
mod audit_result_service;
mod blocking_call;
mod provider_ports;
mod scan_dispatcher;
mod service_auditor;
mod verdict_ports;

pub use audit_orchestrator::{AuditOrchestrator, DomainScanOutcome, FullScanSummary};
pub use audit_result_service::AuditResultService;
pub use blocking_call::BlockingCallPolicy;
pub use provider_ports::{IdentityProvider, NetworkProvider, ProviderError, StorageProvider};
pub use scan_dispatcher::{ScanDispatcher, ScanJob};
pub use service_auditor::{IdentityAuditor, NetworkAuditor, ServiceAuditor, StorageAuditor};
pub use verdict_ports::{ScanSession, VerdictQuery, VerdictRepository};
