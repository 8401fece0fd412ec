use std::path::PathBuf;

use uuid::Uuid;

use cloud_auditor_application::{
    IdentityProvider, NetworkProvider, ProviderError, StorageProvider,
};

use super::InventorySnapshotProvider;

const SNAPSHOT: &str = r#"{
  "regions": {
    "us-east-1": {
      "buckets": {
        "audit-logs": { "status": "Enabled" },
        "scratch": {}
      },
      "users": {
        "alice": { "devices": ["arn:mfa/alice"] },
        "bob": {}
      },
      "security_groups": {
        "sg-open": {
          "rules": [{ "from_port": null, "to_port": null, "cidr_blocks": ["0.0.0.0/0"] }]
        }
      }
    },
    "eu-west-1": {}
  }
}"#;

struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    fn write(contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("inventory-{}.json", Uuid::new_v4()));
        if let Err(error) = std::fs::write(&path, contents) {
            panic!("failed to write inventory snapshot fixture: {error}");
        }

        Self { path }
    }
}

impl Drop for SnapshotFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[test]
fn lists_and_describes_resources_of_configured_region() {
    let file = SnapshotFile::write(SNAPSHOT);
    let provider = InventorySnapshotProvider::new(&file.path, "us-east-1");

    assert_eq!(
        provider.list_buckets(),
        Ok(vec!["audit-logs".to_owned(), "scratch".to_owned()])
    );
    assert_eq!(
        provider
            .describe_bucket_versioning("audit-logs")
            .map(|versioning| versioning.status),
        Ok(Some("Enabled".to_owned()))
    );
    assert_eq!(
        provider
            .describe_bucket_versioning("scratch")
            .map(|versioning| versioning.status_label().to_owned()),
        Ok("Disabled".to_owned())
    );
    assert_eq!(
        provider
            .describe_user_mfa_devices("alice")
            .map(|devices| devices.device_count()),
        Ok(1)
    );
    assert_eq!(
        provider
            .describe_user_mfa_devices("bob")
            .map(|devices| devices.device_count()),
        Ok(0)
    );
    assert_eq!(provider.list_security_groups(), Ok(vec!["sg-open".to_owned()]));
    assert!(
        provider
            .describe_security_group_ingress("sg-open")
            .is_ok_and(|ingress| ingress.rules.len() == 1)
    );
}

#[test]
fn region_without_entries_lists_nothing() {
    let file = SnapshotFile::write(SNAPSHOT);
    let provider = InventorySnapshotProvider::new(&file.path, "eu-west-1");

    assert_eq!(provider.list_users(), Ok(Vec::new()));
    assert_eq!(provider.list_security_groups(), Ok(Vec::new()));
}

#[test]
fn missing_resource_is_not_found() {
    let file = SnapshotFile::write(SNAPSHOT);
    let provider = InventorySnapshotProvider::new(&file.path, "us-east-1");

    assert!(matches!(
        provider.describe_bucket_versioning("ghost"),
        Err(ProviderError::NotFound(_))
    ));
    assert!(matches!(
        provider.describe_security_group_ingress("sg-ghost"),
        Err(ProviderError::NotFound(_))
    ));
}

#[test]
fn unknown_region_fails_enumeration() {
    let file = SnapshotFile::write(SNAPSHOT);
    let provider = InventorySnapshotProvider::new(&file.path, "ap-south-1");

    assert!(matches!(
        provider.list_buckets(),
        Err(ProviderError::AccessDenied(_))
    ));
}

#[test]
fn unreadable_or_malformed_snapshot_is_unavailable() {
    let missing = InventorySnapshotProvider::new(
        std::env::temp_dir().join(format!("missing-{}.json", Uuid::new_v4())),
        "us-east-1",
    );
    assert!(matches!(
        missing.list_users(),
        Err(ProviderError::Unavailable(_))
    ));

    let file = SnapshotFile::write("{ not json");
    let malformed = InventorySnapshotProvider::new(&file.path, "us-east-1");
    assert!(matches!(
        malformed.list_buckets(),
        Err(ProviderError::Unavailable(_))
    ));
}
