use std::sync::Arc;

use cloud_auditor_application::{
    AuditOrchestrator, AuditResultService, BlockingCallPolicy, IdentityAuditor, IdentityProvider,
    NetworkAuditor, NetworkProvider, ProviderError, ScanDispatcher, ServiceAuditor,
    StorageAuditor, StorageProvider, VerdictRepository,
};
use cloud_auditor_domain::{
    BucketVersioning, IngressRule, SecurityGroupIngress, UserMfaDevices,
};
use cloud_auditor_infrastructure::InMemoryVerdictRepository;

use crate::api_router::build_router;
use crate::state::AppState;

pub(crate) const TEST_API_KEY: &str = "test-api-key";

/// Account with two buckets, two security groups and an identity service
/// whose listing is denied.
pub(crate) struct FakeCloud;

impl StorageProvider for FakeCloud {
    fn list_buckets(&self) -> Result<Vec<String>, ProviderError> {
        Ok(vec!["logs".to_owned(), "scratch".to_owned()])
    }

    fn describe_bucket_versioning(
        &self,
        bucket_name: &str,
    ) -> Result<BucketVersioning, ProviderError> {
        match bucket_name {
            "logs" => Ok(BucketVersioning {
                status: Some("Enabled".to_owned()),
            }),
            "scratch" => Ok(BucketVersioning {
                status: Some("Suspended".to_owned()),
            }),
            other => Err(ProviderError::NotFound(format!("bucket '{other}'"))),
        }
    }
}

impl IdentityProvider for FakeCloud {
    fn list_users(&self) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::AccessDenied("iam:ListUsers".to_owned()))
    }

    fn describe_user_mfa_devices(&self, user_name: &str) -> Result<UserMfaDevices, ProviderError> {
        match user_name {
            "alice" => Ok(UserMfaDevices {
                devices: vec!["arn:mfa/alice".to_owned()],
            }),
            other => Err(ProviderError::NotFound(format!("user '{other}'"))),
        }
    }
}

impl NetworkProvider for FakeCloud {
    fn list_security_groups(&self) -> Result<Vec<String>, ProviderError> {
        Ok(vec!["sg-open".to_owned(), "sg-web".to_owned()])
    }

    fn describe_security_group_ingress(
        &self,
        group_id: &str,
    ) -> Result<SecurityGroupIngress, ProviderError> {
        let (from_port, to_port) = match group_id {
            "sg-open" => (None, None),
            "sg-web" => (Some(80), Some(80)),
            other => return Err(ProviderError::NotFound(format!("security group '{other}'"))),
        };

        Ok(SecurityGroupIngress {
            rules: vec![IngressRule {
                from_port,
                to_port,
                cidr_blocks: vec!["0.0.0.0/0".to_owned()],
            }],
        })
    }
}

pub(crate) fn test_state() -> AppState {
    let cloud = Arc::new(FakeCloud);
    let policy = BlockingCallPolicy::default();
    let auditors: Vec<Arc<dyn ServiceAuditor>> = vec![
        Arc::new(StorageAuditor::new(cloud.clone(), policy)),
        Arc::new(IdentityAuditor::new(cloud.clone(), policy)),
        Arc::new(NetworkAuditor::new(cloud, policy)),
    ];
    let repository: Arc<dyn VerdictRepository> = Arc::new(InMemoryVerdictRepository::new());
    let audit_orchestrator = AuditOrchestrator::new(auditors, repository.clone(), 2);

    AppState {
        scan_dispatcher: ScanDispatcher::spawn(audit_orchestrator.clone(), 4),
        audit_orchestrator,
        audit_result_service: AuditResultService::new(repository),
        api_key: Arc::from(TEST_API_KEY),
    }
}

/// Serves the router on an ephemeral port and returns its base url.
pub(crate) async fn spawn_server(state: AppState) -> String {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(address) = listener.local_addr() else {
        panic!("test listener has no local address");
    };

    let router = build_router(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{address}")
}
