use std::sync::Arc;

use async_trait::async_trait;

use cloud_auditor_core::NonEmptyString;
use cloud_auditor_domain::{AuditService, Verdict, check_bucket_versioning};

use super::{ServiceAuditor, describe_failure, list_with_policy};
use crate::{BlockingCallPolicy, StorageProvider};

/// Checks that every bucket has versioning enabled.
#[derive(Clone)]
pub struct StorageAuditor {
    provider: Arc<dyn StorageProvider>,
    policy: BlockingCallPolicy,
}

impl StorageAuditor {
    /// Creates an auditor over a storage adapter.
    #[must_use]
    pub fn new(provider: Arc<dyn StorageProvider>, policy: BlockingCallPolicy) -> Self {
        Self { provider, policy }
    }
}

#[async_trait]
impl ServiceAuditor for StorageAuditor {
    fn service(&self) -> AuditService {
        AuditService::Storage
    }

    async fn list_resource_ids(&self) -> Vec<NonEmptyString> {
        let provider = self.provider.clone();
        list_with_policy(&self.policy, self.service(), move || provider.list_buckets()).await
    }

    async fn evaluate_one(&self, resource_id: &NonEmptyString) -> Verdict {
        let provider = self.provider.clone();
        let bucket_name = resource_id.as_str().to_owned();
        let described = self
            .policy
            .run(move || provider.describe_bucket_versioning(bucket_name.as_str()))
            .await;

        match described {
            Ok(versioning) => Verdict::new(
                self.service(),
                resource_id.clone(),
                check_bucket_versioning(&versioning),
            ),
            Err(error) => describe_failure(self.service(), resource_id, &error, "bucket"),
        }
    }
}
