use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use cloud_auditor_application::{
    IdentityProvider, NetworkProvider, ProviderError, StorageProvider,
};
use cloud_auditor_domain::{BucketVersioning, SecurityGroupIngress, UserMfaDevices};

#[cfg(test)]
mod tests;

#[derive(Debug, Default, Deserialize)]
struct InventorySnapshot {
    #[serde(default)]
    regions: BTreeMap<String, RegionInventory>,
}

#[derive(Debug, Default, Deserialize)]
struct RegionInventory {
    #[serde(default)]
    buckets: BTreeMap<String, BucketVersioning>,
    #[serde(default)]
    users: BTreeMap<String, UserMfaDevices>,
    #[serde(default)]
    security_groups: BTreeMap<String, SecurityGroupIngress>,
}

/// Provider adapter backed by a JSON account inventory exported per region.
///
/// The file is read again on every call so a refreshed export is picked up
/// without a restart. All calls block on file I/O.
#[derive(Debug, Clone)]
pub struct InventorySnapshotProvider {
    path: PathBuf,
    region: String,
}

impl InventorySnapshotProvider {
    /// Creates an adapter reading `path` and scoped to `region`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, region: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            region: region.into(),
        }
    }

    /// Returns the snapshot file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the region this adapter audits.
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_str()
    }

    fn load_region(&self) -> Result<RegionInventory, ProviderError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|error| {
            ProviderError::Unavailable(format!(
                "failed to read inventory snapshot '{}': {error}",
                self.path.display()
            ))
        })?;

        let mut snapshot: InventorySnapshot = serde_json::from_str(&raw).map_err(|error| {
            ProviderError::Unavailable(format!(
                "inventory snapshot '{}' is malformed: {error}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), region = %self.region, "inventory snapshot loaded");

        snapshot.regions.remove(&self.region).ok_or_else(|| {
            ProviderError::AccessDenied(format!(
                "region '{}' is not present in the inventory snapshot",
                self.region
            ))
        })
    }
}

fn take_entry<T>(
    entries: &mut BTreeMap<String, T>,
    kind: &str,
    resource_id: &str,
) -> Result<T, ProviderError> {
    entries
        .remove(resource_id)
        .ok_or_else(|| ProviderError::NotFound(format!("{kind} '{resource_id}'")))
}

impl StorageProvider for InventorySnapshotProvider {
    fn list_buckets(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.load_region()?.buckets.into_keys().collect())
    }

    fn describe_bucket_versioning(
        &self,
        bucket_name: &str,
    ) -> Result<BucketVersioning, ProviderError> {
        take_entry(&mut self.load_region()?.buckets, "bucket", bucket_name)
    }
}

impl IdentityProvider for InventorySnapshotProvider {
    fn list_users(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.load_region()?.users.into_keys().collect())
    }

    fn describe_user_mfa_devices(&self, user_name: &str) -> Result<UserMfaDevices, ProviderError> {
        take_entry(&mut self.load_region()?.users, "user", user_name)
    }
}

impl NetworkProvider for InventorySnapshotProvider {
    fn list_security_groups(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.load_region()?.security_groups.into_keys().collect())
    }

    fn describe_security_group_ingress(
        &self,
        group_id: &str,
    ) -> Result<SecurityGroupIngress, ProviderError> {
        take_entry(
            &mut self.load_region()?.security_groups,
            "security group",
            group_id,
        )
    }
}
