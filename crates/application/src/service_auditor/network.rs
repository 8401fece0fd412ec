use std::sync::Arc;

use async_trait::async_trait;

use cloud_auditor_core::NonEmptyString;
use cloud_auditor_domain::{AuditService, Verdict, check_ssh_exposure};

use super::{ServiceAuditor, describe_failure, list_with_policy};
use crate::{BlockingCallPolicy, NetworkProvider};

/// Checks that no security group exposes SSH to the internet.
#[derive(Clone)]
pub struct NetworkAuditor {
    provider: Arc<dyn NetworkProvider>,
    policy: BlockingCallPolicy,
}

impl NetworkAuditor {
    /// Creates an auditor over a network adapter.
    #[must_use]
    pub fn new(provider: Arc<dyn NetworkProvider>, policy: BlockingCallPolicy) -> Self {
        Self { provider, policy }
    }
}

#[async_trait]
impl ServiceAuditor for NetworkAuditor {
    fn service(&self) -> AuditService {
        AuditService::Network
    }

    async fn list_resource_ids(&self) -> Vec<NonEmptyString> {
        let provider = self.provider.clone();
        list_with_policy(&self.policy, self.service(), move || {
            provider.list_security_groups()
        })
        .await
    }

    async fn evaluate_one(&self, resource_id: &NonEmptyString) -> Verdict {
        let provider = self.provider.clone();
        let group_id = resource_id.as_str().to_owned();
        let described = self
            .policy
            .run(move || provider.describe_security_group_ingress(group_id.as_str()))
            .await;

        match described {
            Ok(ingress) => Verdict::new(
                self.service(),
                resource_id.clone(),
                check_ssh_exposure(&ingress),
            ),
            Err(error) => describe_failure(self.service(), resource_id, &error, "SG"),
        }
    }
}
