//! Per-domain auditors combining provider enumeration, describe calls, and the
//! check engine.

use async_trait::async_trait;
use tracing::warn;

use cloud_auditor_core::NonEmptyString;
use cloud_auditor_domain::{AuditService, Verdict};

use crate::{BlockingCallPolicy, ProviderError};

mod identity;
mod network;
mod storage;

#[cfg(test)]
mod tests;

pub use identity::IdentityAuditor;
pub use network::NetworkAuditor;
pub use storage::StorageAuditor;

/// Audits every resource of one domain.
#[async_trait]
pub trait ServiceAuditor: Send + Sync {
    /// Returns the audited domain.
    fn service(&self) -> AuditService;

    /// Enumerates resources to audit.
    ///
    /// Provider failures are logged and yield an empty list so sibling domains
    /// keep running.
    async fn list_resource_ids(&self) -> Vec<NonEmptyString>;

    /// Describes and checks one resource.
    ///
    /// Always yields exactly one verdict; a describe failure becomes a
    /// non-compliant verdict carrying the error text.
    async fn evaluate_one(&self, resource_id: &NonEmptyString) -> Verdict;
}

async fn list_with_policy<F>(
    policy: &BlockingCallPolicy,
    service: AuditService,
    list: F,
) -> Vec<NonEmptyString>
where
    F: FnOnce() -> Result<Vec<String>, ProviderError> + Send + 'static,
{
    let names = match policy.run(list).await {
        Ok(names) => names,
        Err(error) => {
            warn!(
                service = %service,
                transient = error.is_transient(),
                error = %error,
                "failed to list resources, auditing nothing for this service"
            );
            return Vec::new();
        }
    };

    names
        .into_iter()
        .filter_map(|name| match NonEmptyString::new(name) {
            Ok(resource_id) => Some(resource_id),
            Err(_) => {
                warn!(service = %service, "provider listed a resource with an empty id");
                None
            }
        })
        .collect()
}

fn describe_failure(
    service: AuditService,
    resource_id: &NonEmptyString,
    error: &ProviderError,
    label: &str,
) -> Verdict {
    warn!(
        service = %service,
        resource_id = %resource_id,
        transient = error.is_transient(),
        error = %error,
        "failed to describe resource"
    );

    Verdict::failed(
        service,
        resource_id.clone(),
        format!("Error auditing {label}: {error}"),
    )
}
