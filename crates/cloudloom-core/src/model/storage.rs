//! Object storage bucket specs

use crate::descriptor::{Describe, ResourceKind};
use crate::naming::NamingScheme;
use crate::params::DeploymentParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base names of the buckets every platform deployment carries. Final
/// names get the shared deployment suffix appended.
pub const PLATFORM_BUCKETS: &[&str] = &[
    "api-security",
    "audit",
    "cache-shared",
    "configuration",
    "dependency-worker",
    "engine-logs",
    "imports",
    "logs",
    "misc",
    "policy-metadata",
    "policy-worker",
    "queries",
    "report-templates",
    "reports",
    "repo-store",
    "scan-results",
    "scanner-metadata",
    "scanner-worker",
    "scans",
    "source-resolver",
    "uploads",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketEncryption {
    /// Server-side encryption with service-managed keys.
    ServiceManaged,
    /// Server-side encryption with a customer-managed key.
    CustomerManaged,
}

/// Lifecycle rule applied to a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleRule {
    pub id: String,
    pub enabled: bool,

    /// Move objects to intelligent tiering after this many days.
    pub transition_to_intelligent_tiering_after_days: Option<u32>,

    /// Expire noncurrent object versions after this many days.
    pub noncurrent_version_expiration_days: Option<u32>,

    /// Abort incomplete multipart uploads after this many days.
    pub abort_incomplete_multipart_upload_after_days: Option<u32>,

    /// Clean up expired object delete markers.
    pub expired_object_delete_marker: bool,
}

/// Bucket spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSpec {
    /// Full bucket name including the shared deployment suffix.
    pub name: String,

    pub versioned: bool,
    pub block_public_access: bool,

    /// Deny any request arriving over plain HTTP.
    pub enforce_ssl: bool,

    pub encryption: BucketEncryption,

    /// Empty the bucket when the deployment is torn down.
    pub auto_delete_objects: bool,

    pub lifecycle_rules: Vec<LifecycleRule>,

    pub tags: BTreeMap<String, String>,
}

impl Describe for BucketSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Bucket
    }

    fn resource_name(&self) -> &str {
        &self.name
    }
}

/// Build one platform bucket with the standard hardening and lifecycle.
pub fn platform_bucket(base: &str, params: &DeploymentParams, naming: &NamingScheme) -> BucketSpec {
    let retention = params.storage.retention_days;
    let mut tags = BTreeMap::new();
    tags.insert(
        "Name".to_string(),
        format!("{} {} bucket", params.deployment_id, base),
    );
    tags.insert("Environment".to_string(), params.deployment_id.clone());

    BucketSpec {
        name: naming.bucket_name(base),
        versioned: false,
        block_public_access: true,
        enforce_ssl: true,
        encryption: BucketEncryption::ServiceManaged,
        auto_delete_objects: true,
        lifecycle_rules: vec![
            LifecycleRule {
                id: "transition-to-intelligent-tiering".to_string(),
                enabled: true,
                transition_to_intelligent_tiering_after_days: Some(0),
                noncurrent_version_expiration_days: None,
                abort_incomplete_multipart_upload_after_days: None,
                expired_object_delete_marker: false,
            },
            LifecycleRule {
                id: format!("{}-days-noncurrent-expiration", retention),
                enabled: true,
                transition_to_intelligent_tiering_after_days: None,
                noncurrent_version_expiration_days: Some(retention),
                abort_incomplete_multipart_upload_after_days: Some(1),
                expired_object_delete_marker: true,
            },
        ],
        tags,
    }
}

/// Build the full platform bucket set.
pub fn platform_buckets(params: &DeploymentParams, naming: &NamingScheme) -> Vec<BucketSpec> {
    PLATFORM_BUCKETS
        .iter()
        .map(|base| platform_bucket(base, params, naming))
        .collect()
}
