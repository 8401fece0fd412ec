use std::fmt::{Display, Formatter};
use std::str::FromStr;

use cloud_auditor_core::AppError;
use serde::{Deserialize, Serialize};

/// Cloud resource domain audited as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditService {
    /// Object storage buckets.
    Storage,
    /// Identity principals.
    Identity,
    /// Network security groups.
    Network,
}

impl AuditService {
    /// Returns a stable storage value for this service.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Identity => "identity",
            Self::Network => "network",
        }
    }

    /// Returns all audited services in scan order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AuditService] = &[
            AuditService::Storage,
            AuditService::Identity,
            AuditService::Network,
        ];

        ALL
    }

    /// Returns the single check evaluated for resources of this service.
    #[must_use]
    pub fn check_name(&self) -> CheckName {
        match self {
            Self::Storage => CheckName::BucketVersioning,
            Self::Identity => CheckName::UserMfa,
            Self::Network => CheckName::SshExposure,
        }
    }
}

impl Display for AuditService {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AuditService {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "storage" | "s3" => Ok(Self::Storage),
            "identity" | "iam" => Ok(Self::Identity),
            "network" | "ec2" => Ok(Self::Network),
            _ => Err(AppError::Validation(format!(
                "unknown audit service '{value}'"
            ))),
        }
    }
}

/// Fixed compliance checks known to the auditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckName {
    /// Bucket versioning must be enabled.
    #[serde(rename = "versioning-check")]
    BucketVersioning,
    /// Identity principals must have a second factor registered.
    #[serde(rename = "mfa-check")]
    UserMfa,
    /// Security groups must not expose SSH to the internet.
    #[serde(rename = "ssh-exposure-check")]
    SshExposure,
}

impl CheckName {
    /// Returns a stable storage value for this check.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BucketVersioning => "versioning-check",
            Self::UserMfa => "mfa-check",
            Self::SshExposure => "ssh-exposure-check",
        }
    }

    /// Returns the service this check belongs to.
    #[must_use]
    pub fn service(&self) -> AuditService {
        match self {
            Self::BucketVersioning => AuditService::Storage,
            Self::UserMfa => AuditService::Identity,
            Self::SshExposure => AuditService::Network,
        }
    }
}

impl Display for CheckName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for CheckName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "versioning-check" => Ok(Self::BucketVersioning),
            "mfa-check" => Ok(Self::UserMfa),
            "ssh-exposure-check" => Ok(Self::SshExposure),
            _ => Err(AppError::Validation(format!(
                "unknown check name '{value}'"
            ))),
        }
    }
}
