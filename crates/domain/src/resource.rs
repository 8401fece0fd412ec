//! Transient snapshots of the resource attributes each check inspects.
//!
//! Descriptors are produced by provider adapters, consumed by the check engine,
//! and never persisted.

use serde::{Deserialize, Serialize};

/// Versioning status reported when a bucket never had versioning configured.
pub const DEFAULT_VERSIONING_STATUS: &str = "Disabled";

/// Versioning configuration of one storage bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketVersioning {
    /// Raw status reported by the provider, absent when never configured.
    #[serde(default)]
    pub status: Option<String>,
}

impl BucketVersioning {
    /// Returns the reported status, falling back to the provider default.
    #[must_use]
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_VERSIONING_STATUS)
    }
}

/// Second-factor devices registered for one identity principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMfaDevices {
    /// Device identifiers (serial numbers or ARNs).
    #[serde(default)]
    pub devices: Vec<String>,
}

impl UserMfaDevices {
    /// Returns the number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

/// One inbound permission of a security group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    /// Lower port bound, absent when the rule applies to all ports.
    #[serde(default)]
    pub from_port: Option<i32>,
    /// Upper port bound, absent when unbounded.
    #[serde(default)]
    pub to_port: Option<i32>,
    /// Source CIDR ranges.
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
}

impl IngressRule {
    /// Returns whether the rule's port range includes `port`.
    ///
    /// A missing `from_port` means all ports; a missing `to_port` leaves the
    /// range unbounded above.
    #[must_use]
    pub fn covers_port(&self, port: i32) -> bool {
        match self.from_port {
            None => true,
            Some(from_port) => from_port <= port && self.to_port.is_none_or(|to| to >= port),
        }
    }

    /// Returns whether the rule admits traffic from `cidr`.
    #[must_use]
    pub fn allows_cidr(&self, cidr: &str) -> bool {
        self.cidr_blocks.iter().any(|block| block == cidr)
    }
}

/// Inbound rule set of one security group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupIngress {
    /// Inbound permissions in provider order.
    #[serde(default)]
    pub rules: Vec<IngressRule>,
}
