use std::sync::Arc;

use async_trait::async_trait;

use cloud_auditor_core::NonEmptyString;
use cloud_auditor_domain::{AuditService, Verdict, check_user_mfa};

use super::{ServiceAuditor, describe_failure, list_with_policy};
use crate::{BlockingCallPolicy, IdentityProvider};

/// Checks that every user has a second factor registered.
#[derive(Clone)]
pub struct IdentityAuditor {
    provider: Arc<dyn IdentityProvider>,
    policy: BlockingCallPolicy,
}

impl IdentityAuditor {
    /// Creates an auditor over an identity adapter.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, policy: BlockingCallPolicy) -> Self {
        Self { provider, policy }
    }
}

#[async_trait]
impl ServiceAuditor for IdentityAuditor {
    fn service(&self) -> AuditService {
        AuditService::Identity
    }

    async fn list_resource_ids(&self) -> Vec<NonEmptyString> {
        let provider = self.provider.clone();
        list_with_policy(&self.policy, self.service(), move || provider.list_users()).await
    }

    async fn evaluate_one(&self, resource_id: &NonEmptyString) -> Verdict {
        let provider = self.provider.clone();
        let user_name = resource_id.as_str().to_owned();
        let described = self
            .policy
            .run(move || provider.describe_user_mfa_devices(user_name.as_str()))
            .await;

        match described {
            Ok(devices) => {
                Verdict::new(self.service(), resource_id.clone(), check_user_mfa(&devices))
            }
            Err(error) => describe_failure(self.service(), resource_id, &error, "user"),
        }
    }
}
