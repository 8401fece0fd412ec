//! Ports through which all cloud provider I/O is issued.
//!
//! Implementations perform blocking calls. Callers must dispatch them off the
//! async runtime, see [`crate::BlockingCallPolicy`].

use cloud_auditor_domain::{BucketVersioning, SecurityGroupIngress, UserMfaDevices};
use thiserror::Error;

/// Failure reported by a provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider rejected the call because of rate limits.
    #[error("request throttled: {0}")]
    Throttled(String),

    /// The configured credentials may not perform the call.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The resource vanished or never existed.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The provider could not be reached or did not answer in time.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Returns whether a later attempt could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Throttled(_) | Self::Unavailable(_))
    }
}

/// Object storage adapter.
pub trait StorageProvider: Send + Sync {
    /// Lists every bucket name in the account.
    fn list_buckets(&self) -> Result<Vec<String>, ProviderError>;

    /// Fetches the versioning configuration of one bucket.
    fn describe_bucket_versioning(
        &self,
        bucket_name: &str,
    ) -> Result<BucketVersioning, ProviderError>;
}

/// Identity adapter.
pub trait IdentityProvider: Send + Sync {
    /// Lists every user name, following pagination to the end.
    fn list_users(&self) -> Result<Vec<String>, ProviderError>;

    /// Fetches the second-factor devices registered for one user.
    fn describe_user_mfa_devices(&self, user_name: &str) -> Result<UserMfaDevices, ProviderError>;
}

/// Network adapter.
pub trait NetworkProvider: Send + Sync {
    /// Lists every security group id.
    fn list_security_groups(&self) -> Result<Vec<String>, ProviderError>;

    /// Fetches the inbound rules of one security group.
    fn describe_security_group_ingress(
        &self,
        group_id: &str,
    ) -> Result<SecurityGroupIngress, ProviderError>;
}
