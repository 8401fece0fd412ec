//! Pure compliance predicates, one per `(service, check)` pair.
//!
//! Nothing here performs I/O or fails; describe errors are turned into
//! verdicts by the service auditors before the engine is reached.

use crate::{BucketVersioning, SecurityGroupIngress, UserMfaDevices};

/// Port whose exposure the network check looks for.
pub const SSH_PORT: i32 = 22;

/// CIDR block matching every IPv4 source.
pub const OPEN_TO_WORLD_CIDR: &str = "0.0.0.0/0";

const VERSIONING_ENABLED: &str = "Enabled";

/// Result of evaluating one check against one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Whether the resource passes the check.
    pub is_compliant: bool,
    /// Human-readable explanation.
    pub details: String,
}

/// Bucket versioning must be exactly `Enabled`.
#[must_use]
pub fn check_bucket_versioning(descriptor: &BucketVersioning) -> CheckOutcome {
    let is_compliant = descriptor.status.as_deref() == Some(VERSIONING_ENABLED);

    CheckOutcome {
        is_compliant,
        details: format!("Versioning status is: {}", descriptor.status_label()),
    }
}

/// Principals need at least one registered second-factor device.
#[must_use]
pub fn check_user_mfa(descriptor: &UserMfaDevices) -> CheckOutcome {
    let device_count = descriptor.device_count();

    CheckOutcome {
        is_compliant: device_count > 0,
        details: format!("User has {device_count} MFA device(s) enabled."),
    }
}

/// No rule covering port 22 may admit `0.0.0.0/0`.
#[must_use]
pub fn check_ssh_exposure(descriptor: &SecurityGroupIngress) -> CheckOutcome {
    let is_open_to_world = descriptor
        .rules
        .iter()
        .any(|rule| rule.covers_port(SSH_PORT) && rule.allows_cidr(OPEN_TO_WORLD_CIDR));

    let details = if is_open_to_world {
        "Port 22 is open to the world"
    } else {
        "Port 22 is restricted"
    };

    CheckOutcome {
        is_compliant: !is_open_to_world,
        details: details.to_owned(),
    }
}
