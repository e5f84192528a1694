//! Stack assembly
//!
//! Builds the full platform deployment out of the model factories and
//! serializes it into a versioned manifest. The one [`NamingScheme`] built
//! here is threaded explicitly into every factory that derives a shared
//! name.

use crate::descriptor::DescriptorSet;
use crate::error::Result;
use crate::model;
use crate::naming::{DeploymentToken, NamingScheme};
use crate::params::DeploymentParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Synthesized deployment manifest, the unit handed to the provisioning
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackManifest {
    pub version: u32,
    pub deployment_id: String,
    pub generated_at: DateTime<Utc>,
    pub resources: DescriptorSet,
}

impl StackManifest {
    /// Pretty-printed JSON rendering of the manifest.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build a naming scheme for the parameter set. Separate synthesis runs
/// get separate schemes, hence separate random suffixes.
pub fn naming_for(params: &DeploymentParams) -> Result<NamingScheme> {
    let token = DeploymentToken::new(params.suffix_length)?;
    Ok(NamingScheme::new(params.deployment_id.clone(), token))
}

/// Assemble every resource of the platform stack.
pub fn synthesize(params: &DeploymentParams, naming: &NamingScheme) -> Result<StackManifest> {
    params.validate()?;
    info!(deployment_id = %params.deployment_id, "Synthesizing deployment stack");

    let mut resources = DescriptorSet::new();

    resources.add_spec(&model::platform_key(params))?;

    for bucket in model::platform_buckets(params, naming) {
        resources.add_spec(&bucket)?;
    }

    resources.add_spec(&model::platform_vpc(params))?;
    resources.add_spec(&model::external_security_group(params))?;
    resources.add_spec(&model::internal_security_group(params))?;
    resources.add_spec(&model::platform_cache_cluster(params))?;
    resources.add_spec(&model::platform_database(params))?;

    resources.add_spec(&model::object_gateway_node_role(naming))?;

    // The flow-log role can be brought in from outside the deployment.
    if params.network.reuse_flow_log_role {
        debug!("Reusing an existing flow-log role, none declared");
    } else {
        resources.add_spec(&model::flow_log_role(naming))?;
    }

    let load_balancer_controller_role = model::load_balancer_controller_role(naming);
    let external_dns_role = model::external_dns_role(naming);
    let cluster_autoscaler_role = model::cluster_autoscaler_role(naming);
    let ebs_csi_driver_role = model::ebs_csi_driver_role(naming);

    let cluster = model::platform_cluster(
        params,
        &load_balancer_controller_role,
        &external_dns_role,
        &cluster_autoscaler_role,
        &ebs_csi_driver_role,
    );

    resources.add_spec(&load_balancer_controller_role)?;
    resources.add_spec(&external_dns_role)?;
    resources.add_spec(&cluster_autoscaler_role)?;
    resources.add_spec(&ebs_csi_driver_role)?;
    resources.add_spec(&cluster)?;

    info!(resources = resources.len(), "Synthesis complete");
    Ok(StackManifest {
        version: MANIFEST_VERSION,
        deployment_id: params.deployment_id.clone(),
        generated_at: Utc::now(),
        resources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ResourceKind;
    use crate::model::PLATFORM_BUCKETS;

    fn params() -> DeploymentParams {
        let mut params = DeploymentParams::default();
        params.database.password = "s3cret".to_string();
        params
    }

    #[test]
    fn test_full_stack_resource_counts() {
        let params = params();
        let naming = naming_for(&params).unwrap();
        let manifest = synthesize(&params, &naming).unwrap();

        let resources = &manifest.resources;
        assert_eq!(resources.by_kind(ResourceKind::EncryptionKey).len(), 1);
        assert_eq!(
            resources.by_kind(ResourceKind::Bucket).len(),
            PLATFORM_BUCKETS.len()
        );
        assert_eq!(resources.by_kind(ResourceKind::Vpc).len(), 1);
        assert_eq!(resources.by_kind(ResourceKind::SecurityGroup).len(), 2);
        assert_eq!(resources.by_kind(ResourceKind::CacheCluster).len(), 1);
        assert_eq!(resources.by_kind(ResourceKind::DatabaseCluster).len(), 1);
        assert_eq!(resources.by_kind(ResourceKind::Role).len(), 6);
        assert_eq!(resources.by_kind(ResourceKind::KubernetesCluster).len(), 1);
        assert_eq!(
            resources.len(),
            PLATFORM_BUCKETS.len() + 13,
        );
    }

    #[test]
    fn test_invalid_params_abort_synthesis() {
        let params = DeploymentParams::default(); // no password
        let naming = naming_for(&params).unwrap();
        assert!(synthesize(&params, &naming).is_err());
    }

    #[test]
    fn test_buckets_share_the_run_suffix() {
        let params = params();
        let naming = naming_for(&params).unwrap();
        let manifest = synthesize(&params, &naming).unwrap();

        let suffix = naming.suffix();
        for bucket in manifest.resources.by_kind(ResourceKind::Bucket) {
            assert!(bucket.name.ends_with(&suffix));
        }
    }

    #[test]
    fn test_separate_runs_get_separate_suffixes() {
        let params = params();
        let a = synthesize(&params, &naming_for(&params).unwrap()).unwrap();
        let b = synthesize(&params, &naming_for(&params).unwrap()).unwrap();

        let name_of = |m: &StackManifest| {
            m.resources.by_kind(ResourceKind::Bucket)[0].name.clone()
        };
        assert_ne!(name_of(&a), name_of(&b));
    }

    #[test]
    fn test_reused_flow_log_role_is_not_declared() {
        let mut params = params();
        params.network.reuse_flow_log_role = true;
        let naming = naming_for(&params).unwrap();
        let manifest = synthesize(&params, &naming).unwrap();

        assert_eq!(manifest.resources.by_kind(ResourceKind::Role).len(), 5);
        assert!(
            !manifest
                .resources
                .iter()
                .any(|r| r.name.starts_with("vpc-flow-log-role"))
        );
    }

    #[test]
    fn test_manifest_serializes_with_version() {
        let params = params();
        let naming = naming_for(&params).unwrap();
        let manifest = synthesize(&params, &naming).unwrap();

        let json = manifest.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["version"], MANIFEST_VERSION);
        assert_eq!(parsed["deployment_id"], "atlas-apac");
        assert!(parsed["resources"].is_object());
        assert!(parsed["resources"]["vpc:atlas-apac"].is_object());
    }
}
