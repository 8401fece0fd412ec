//! Domain entities, invariants, and the compliance check engine.

#![forbid(unsafe_code)]

mod audit;
mod checks;
mod resource;
mod stats;
mod verdict;

pub use audit::{AuditService, CheckName};
pub use checks::{
    CheckOutcome, OPEN_TO_WORLD_CIDR, SSH_PORT, check_bucket_versioning, check_ssh_exposure,
    check_user_mfa,
};
pub use resource::{
    BucketVersioning, DEFAULT_VERSIONING_STATUS, IngressRule, SecurityGroupIngress,
    UserMfaDevices,
};
pub use stats::ComplianceStats;
pub use verdict::{RecordedVerdict, Verdict};
