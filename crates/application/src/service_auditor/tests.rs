use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cloud_auditor_core::NonEmptyString;
use cloud_auditor_domain::{
    AuditService, BucketVersioning, CheckName, IngressRule, SecurityGroupIngress, UserMfaDevices,
};

use super::{IdentityAuditor, NetworkAuditor, ServiceAuditor, StorageAuditor};
use crate::{BlockingCallPolicy, IdentityProvider, NetworkProvider, ProviderError, StorageProvider};

fn resource(value: &str) -> NonEmptyString {
    match NonEmptyString::new(value) {
        Ok(value) => value,
        Err(error) => panic!("invalid test resource id: {error}"),
    }
}

#[derive(Default)]
struct FakeStorageProvider {
    buckets: HashMap<String, Result<BucketVersioning, ProviderError>>,
    listing_error: Option<ProviderError>,
}

impl StorageProvider for FakeStorageProvider {
    fn list_buckets(&self) -> Result<Vec<String>, ProviderError> {
        if let Some(error) = &self.listing_error {
            return Err(error.clone());
        }

        let mut names: Vec<String> = self.buckets.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn describe_bucket_versioning(
        &self,
        bucket_name: &str,
    ) -> Result<BucketVersioning, ProviderError> {
        self.buckets
            .get(bucket_name)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::NotFound(format!("bucket '{bucket_name}'"))))
    }
}

struct FakeIdentityProvider {
    users: Vec<String>,
}

impl IdentityProvider for FakeIdentityProvider {
    fn list_users(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.users.clone())
    }

    fn describe_user_mfa_devices(&self, user_name: &str) -> Result<UserMfaDevices, ProviderError> {
        if user_name == "alice" {
            return Ok(UserMfaDevices {
                devices: vec!["arn:aws:iam::123:mfa/alice".to_owned()],
            });
        }

        Ok(UserMfaDevices::default())
    }
}

struct SlowNetworkProvider {
    delay: Duration,
}

impl NetworkProvider for SlowNetworkProvider {
    fn list_security_groups(&self) -> Result<Vec<String>, ProviderError> {
        Ok(vec!["sg-open".to_owned()])
    }

    fn describe_security_group_ingress(
        &self,
        _group_id: &str,
    ) -> Result<SecurityGroupIngress, ProviderError> {
        std::thread::sleep(self.delay);
        Ok(SecurityGroupIngress {
            rules: vec![IngressRule {
                from_port: Some(22),
                to_port: Some(22),
                cidr_blocks: vec!["0.0.0.0/0".to_owned()],
            }],
        })
    }
}

#[tokio::test]
async fn storage_auditor_checks_each_listed_bucket() {
    let provider = FakeStorageProvider {
        buckets: HashMap::from([
            (
                "logs".to_owned(),
                Ok(BucketVersioning {
                    status: Some("Enabled".to_owned()),
                }),
            ),
            (
                "scratch".to_owned(),
                Ok(BucketVersioning {
                    status: Some("Suspended".to_owned()),
                }),
            ),
        ]),
        listing_error: None,
    };
    let auditor = StorageAuditor::new(Arc::new(provider), BlockingCallPolicy::default());

    let ids = auditor.list_resource_ids().await;
    assert_eq!(ids, vec![resource("logs"), resource("scratch")]);

    let logs = auditor.evaluate_one(&resource("logs")).await;
    assert!(logs.is_compliant());
    assert_eq!(logs.service(), AuditService::Storage);
    assert_eq!(logs.check_name(), CheckName::BucketVersioning);

    let scratch = auditor.evaluate_one(&resource("scratch")).await;
    assert!(!scratch.is_compliant());
    assert_eq!(scratch.details(), "Versioning status is: Suspended");
}

#[tokio::test]
async fn describe_failure_becomes_non_compliant_verdict() {
    let provider = FakeStorageProvider {
        buckets: HashMap::from([(
            "locked".to_owned(),
            Err(ProviderError::AccessDenied("s3:GetBucketVersioning".to_owned())),
        )]),
        listing_error: None,
    };
    let auditor = StorageAuditor::new(Arc::new(provider), BlockingCallPolicy::default());

    let locked = auditor.evaluate_one(&resource("locked")).await;
    assert!(!locked.is_compliant());
    assert_eq!(
        locked.details(),
        "Error auditing bucket: access denied: s3:GetBucketVersioning"
    );

    let vanished = auditor.evaluate_one(&resource("vanished")).await;
    assert!(!vanished.is_compliant());
    assert!(vanished.details().starts_with("Error auditing bucket: resource not found"));
}

#[tokio::test]
async fn listing_failure_yields_no_resources() {
    let provider = FakeStorageProvider {
        buckets: HashMap::new(),
        listing_error: Some(ProviderError::Throttled("ListBuckets".to_owned())),
    };
    let auditor = StorageAuditor::new(Arc::new(provider), BlockingCallPolicy::default());

    assert!(auditor.list_resource_ids().await.is_empty());
}

#[tokio::test]
async fn identity_auditor_skips_blank_user_names() {
    let provider = FakeIdentityProvider {
        users: vec!["alice".to_owned(), "  ".to_owned(), "bob".to_owned()],
    };
    let auditor = IdentityAuditor::new(Arc::new(provider), BlockingCallPolicy::default());

    let ids = auditor.list_resource_ids().await;
    assert_eq!(ids, vec![resource("alice"), resource("bob")]);

    let alice = auditor.evaluate_one(&resource("alice")).await;
    assert!(alice.is_compliant());
    let bob = auditor.evaluate_one(&resource("bob")).await;
    assert!(!bob.is_compliant());
    assert_eq!(bob.details(), "User has 0 MFA device(s) enabled.");
}

#[tokio::test]
async fn network_auditor_flags_open_ssh() {
    let auditor = NetworkAuditor::new(
        Arc::new(SlowNetworkProvider {
            delay: Duration::ZERO,
        }),
        BlockingCallPolicy::default(),
    );

    let verdict = auditor.evaluate_one(&resource("sg-open")).await;
    assert!(!verdict.is_compliant());
    assert_eq!(verdict.details(), "Port 22 is open to the world");
}

#[tokio::test]
async fn timed_out_describe_is_recorded_as_error() {
    let auditor = NetworkAuditor::new(
        Arc::new(SlowNetworkProvider {
            delay: Duration::from_millis(300),
        }),
        BlockingCallPolicy::new(Some(Duration::from_millis(20))),
    );

    let verdict = auditor.evaluate_one(&resource("sg-open")).await;
    assert!(!verdict.is_compliant());
    assert!(verdict.details().starts_with("Error auditing SG: provider unavailable"));
}
