//! Cache cluster spec

use crate::descriptor::{Describe, ResourceKind};
use crate::params::DeploymentParams;
use serde::{Deserialize, Serialize};

/// In-memory cache cluster spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheClusterSpec {
    pub name: String,
    pub engine: String,
    pub engine_version: String,
    pub node_type: String,
    pub num_nodes: u32,
    pub port: u16,
    pub auto_minor_version_upgrade: bool,
    pub security_groups: Vec<String>,
    pub preferred_maintenance_window: String,
    pub transit_encryption: bool,
}

impl Describe for CacheClusterSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::CacheCluster
    }

    fn resource_name(&self) -> &str {
        &self.name
    }
}

/// Single-node Redis cache shared by the platform services.
pub fn platform_cache_cluster(params: &DeploymentParams) -> CacheClusterSpec {
    CacheClusterSpec {
        name: params.deployment_id.clone(),
        engine: "redis".to_string(),
        engine_version: "6.x".to_string(),
        node_type: "cache.t4g.medium".to_string(),
        num_nodes: 1,
        port: 6379,
        auto_minor_version_upgrade: false,
        security_groups: vec![format!("internal-{}-sg", params.deployment_id)],
        preferred_maintenance_window: "sun:23:00-mon:01:30".to_string(),
        transit_encryption: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_is_a_single_redis_node_behind_the_internal_group() {
        let cluster = platform_cache_cluster(&DeploymentParams::default());
        assert_eq!(cluster.engine, "redis");
        assert_eq!(cluster.num_nodes, 1);
        assert_eq!(cluster.port, 6379);
        assert_eq!(cluster.security_groups, vec!["internal-atlas-apac-sg"]);
        assert!(!cluster.transit_encryption);
    }
}
