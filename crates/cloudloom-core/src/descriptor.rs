//! Resource descriptors
//!
//! The hand-off boundary to the provisioning engine. Each typed spec in
//! [`crate::model`] serializes into a [`ResourceDescriptor`] carrying its
//! properties as untyped JSON; a [`DescriptorSet`] collects the whole
//! deployment. Diffing, ordering, and application of descriptors belong to
//! the engine consuming the manifest, not to this crate.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider every descriptor in this stack targets.
pub const DEFAULT_PROVIDER: &str = "aws";

/// Kind of a declared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    EncryptionKey,
    Bucket,
    Vpc,
    SecurityGroup,
    CacheCluster,
    DatabaseCluster,
    Role,
    KubernetesCluster,
}

impl ResourceKind {
    /// Every kind, in manifest presentation order.
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::EncryptionKey,
        ResourceKind::Bucket,
        ResourceKind::Vpc,
        ResourceKind::SecurityGroup,
        ResourceKind::CacheCluster,
        ResourceKind::DatabaseCluster,
        ResourceKind::Role,
        ResourceKind::KubernetesCluster,
    ];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::EncryptionKey => write!(f, "encryption-key"),
            ResourceKind::Bucket => write!(f, "bucket"),
            ResourceKind::Vpc => write!(f, "vpc"),
            ResourceKind::SecurityGroup => write!(f, "security-group"),
            ResourceKind::CacheCluster => write!(f, "cache-cluster"),
            ResourceKind::DatabaseCluster => write!(f, "database-cluster"),
            ResourceKind::Role => write!(f, "role"),
            ResourceKind::KubernetesCluster => write!(f, "kubernetes-cluster"),
        }
    }
}

/// A declared resource, ready for the provisioning engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,

    /// Resource name; unique within its kind.
    pub name: String,

    /// Provider the resource targets.
    pub provider: String,

    /// Kind-specific properties.
    pub properties: serde_json::Value,
}

impl ResourceDescriptor {
    pub fn new(kind: ResourceKind, name: impl Into<String>, properties: serde_json::Value) -> Self {
        Self {
            kind,
            name: name.into(),
            provider: DEFAULT_PROVIDER.to_string(),
            properties,
        }
    }

    /// Full descriptor key (`kind:name`).
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind, self.name)
    }
}

/// Conversion from a typed spec into a descriptor.
pub trait Describe: Serialize {
    fn kind(&self) -> ResourceKind;

    fn resource_name(&self) -> &str;

    fn describe(&self) -> Result<ResourceDescriptor> {
        Ok(ResourceDescriptor::new(
            self.kind(),
            self.resource_name(),
            serde_json::to_value(self)?,
        ))
    }
}

/// Every descriptor of a deployment, keyed by `kind:name`.
///
/// Keys are kept ordered so serialized manifests are byte-stable for equal
/// input, which keeps engine-side and human diffs quiet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorSet {
    resources: BTreeMap<String, ResourceDescriptor>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, descriptor: ResourceDescriptor) {
        self.resources.insert(descriptor.key(), descriptor);
    }

    /// Serialize a spec and add its descriptor.
    pub fn add_spec<T: Describe>(&mut self, spec: &T) -> Result<()> {
        self.add(spec.describe()?);
        Ok(())
    }

    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(&format!("{}:{}", kind, name))
    }

    pub fn by_kind(&self, kind: ResourceKind) -> Vec<&ResourceDescriptor> {
        self.resources.values().filter(|r| r.kind == kind).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
