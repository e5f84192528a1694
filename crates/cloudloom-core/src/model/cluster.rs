//! Kubernetes cluster specs

use crate::descriptor::{Describe, ResourceKind};
use crate::model::identity::RoleSpec;
use crate::model::network::SubnetTier;
use crate::params::DeploymentParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Managed node groups of the platform cluster. Burst-size scanner groups
/// scale from zero; everything else keeps one warm node.
const NODE_GROUPS: &[(&str, bool)] = &[
    ("engine-nodes", false),
    ("scanner-nodes", false),
    ("scanner-nodes-medium", true),
    ("scanner-nodes-large", true),
    ("scanner-nodes-xlarge", true),
    ("scanner-nodes-xxl", true),
    ("policy-nodes", false),
    ("object-gateway-nodes", false),
    ("repo-store-nodes", false),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointAccess {
    Public,
    Private,
    PublicAndPrivate,
}

/// Control-plane log streams shipped to the log service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterLogKind {
    Audit,
    Api,
    Authenticator,
    Scheduler,
}

/// One managed node group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGroupSpec {
    pub name: String,
    pub instance_type: String,
    pub disk_size_gb: u32,
    pub volume_type: String,
    pub volume_iops: u32,
    pub volume_throughput: u32,
    pub min_size: u32,
    pub max_size: u32,
    pub desired_size: u32,
    pub subnet_tier: SubnetTier,
}

/// Service account bound to an identity role through IRSA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountSpec {
    pub name: String,
    pub namespace: String,
    /// Name of the role the account annotation points at.
    pub role: String,
}

/// Helm chart installed into the cluster from a bundled asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelmChartSpec {
    pub name: String,
    pub version: String,
    pub namespace: String,
    pub create_namespace: bool,
    pub values: BTreeMap<String, String>,
}

/// Managed addon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonSpec {
    pub name: String,
    pub resolve_conflicts: String,
}

/// Kubernetes cluster spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KubernetesClusterSpec {
    pub name: String,
    pub version: String,
    pub endpoint_access: EndpointAccess,
    pub service_cidr: String,

    /// Key encrypting cluster secrets.
    pub secrets_encryption_key: String,

    pub logging: Vec<ClusterLogKind>,

    /// Tier the node groups are placed in.
    pub subnet_tier: SubnetTier,

    pub node_groups: Vec<NodeGroupSpec>,
    pub service_accounts: Vec<ServiceAccountSpec>,
    pub helm_charts: Vec<HelmChartSpec>,
    pub addons: Vec<AddonSpec>,
}

impl Describe for KubernetesClusterSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::KubernetesCluster
    }

    fn resource_name(&self) -> &str {
        &self.name
    }
}

fn node_group(name: &str, scales_from_zero: bool) -> NodeGroupSpec {
    let floor = if scales_from_zero { 0 } else { 1 };
    NodeGroupSpec {
        name: name.to_string(),
        instance_type: "c5.2xlarge".to_string(),
        disk_size_gb: 50,
        volume_type: "gp3".to_string(),
        volume_iops: 3000,
        volume_throughput: 125,
        min_size: floor,
        max_size: 10,
        desired_size: floor,
        subnet_tier: SubnetTier::Private,
    }
}

fn values(pairs: &[(&str, String)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Build the platform cluster: nine node groups, the four IRSA service
/// accounts, their controller charts, and the base addons.
pub fn platform_cluster(
    params: &DeploymentParams,
    load_balancer_controller_role: &RoleSpec,
    external_dns_role: &RoleSpec,
    cluster_autoscaler_role: &RoleSpec,
    ebs_csi_driver_role: &RoleSpec,
) -> KubernetesClusterSpec {
    let id = &params.deployment_id;
    let host_zone = params.cluster.host_zone_id.clone().unwrap_or_default();

    let service_accounts = vec![
        ServiceAccountSpec {
            name: "aws-load-balancer-controller".to_string(),
            namespace: "kube-system".to_string(),
            role: load_balancer_controller_role.name.clone(),
        },
        ServiceAccountSpec {
            name: "external-dns".to_string(),
            namespace: "kube-system".to_string(),
            role: external_dns_role.name.clone(),
        },
        ServiceAccountSpec {
            name: "cluster-autoscaler".to_string(),
            namespace: "kube-system".to_string(),
            role: cluster_autoscaler_role.name.clone(),
        },
        ServiceAccountSpec {
            name: "aws-ebs-csi-driver".to_string(),
            namespace: "kube-system".to_string(),
            role: ebs_csi_driver_role.name.clone(),
        },
    ];

    let helm_charts = vec![
        HelmChartSpec {
            name: "aws-load-balancer-controller".to_string(),
            version: "1.4.5".to_string(),
            namespace: "kube-system".to_string(),
            create_namespace: true,
            values: values(&[
                ("clusterName", id.clone()),
                ("serviceAccount.create", "false".to_string()),
                (
                    "serviceAccount.name",
                    "aws-load-balancer-controller".to_string(),
                ),
                ("region", params.region.clone()),
            ]),
        },
        HelmChartSpec {
            name: "external-dns".to_string(),
            version: "1.11.0".to_string(),
            namespace: "kube-system".to_string(),
            create_namespace: true,
            values: values(&[
                ("txtOwnerId", host_zone),
                ("serviceAccount.create", "false".to_string()),
                ("serviceAccount.name", "external-dns".to_string()),
            ]),
        },
        HelmChartSpec {
            name: "cluster-autoscaler".to_string(),
            version: "9.21.0".to_string(),
            namespace: "kube-system".to_string(),
            create_namespace: true,
            values: values(&[
                ("awsRegion", params.region.clone()),
                ("rbac.create", "true".to_string()),
                ("rbac.serviceAccount.create", "false".to_string()),
                ("rbac.serviceAccount.name", "cluster-autoscaler".to_string()),
            ]),
        },
        HelmChartSpec {
            name: "aws-ebs-csi-driver".to_string(),
            version: "2.13.0".to_string(),
            namespace: "kube-system".to_string(),
            create_namespace: true,
            values: values(&[
                ("node.tolerateAllTaints", "true".to_string()),
                ("controller.serviceAccount.create", "false".to_string()),
                (
                    "controller.serviceAccount.name",
                    "aws-ebs-csi-driver".to_string(),
                ),
                ("node.serviceAccount.create", "false".to_string()),
                ("node.serviceAccount.name", "aws-ebs-csi-driver".to_string()),
            ]),
        },
    ];

    let addons = ["coredns", "kube-proxy", "vpc-cni"]
        .iter()
        .map(|name| AddonSpec {
            name: name.to_string(),
            resolve_conflicts: "overwrite".to_string(),
        })
        .collect();

    KubernetesClusterSpec {
        name: id.clone(),
        version: params.cluster.version.clone(),
        endpoint_access: EndpointAccess::PublicAndPrivate,
        service_cidr: "172.20.0.0/16".to_string(),
        secrets_encryption_key: format!("{}-key", id),
        logging: vec![
            ClusterLogKind::Audit,
            ClusterLogKind::Api,
            ClusterLogKind::Authenticator,
            ClusterLogKind::Scheduler,
        ],
        subnet_tier: SubnetTier::Private,
        node_groups: NODE_GROUPS
            .iter()
            .map(|(name, scales_from_zero)| node_group(name, *scales_from_zero))
            .collect(),
        service_accounts,
        helm_charts,
        addons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::platform_roles;
    use crate::naming::{DeploymentToken, NamingScheme};

    fn cluster() -> KubernetesClusterSpec {
        let params = DeploymentParams::default();
        let naming = NamingScheme::new(params.deployment_id.clone(), DeploymentToken::new(6).unwrap());
        let roles = platform_roles(&naming);
        platform_cluster(&params, &roles[2], &roles[3], &roles[4], &roles[5])
    }

    #[test]
    fn test_nine_node_groups_with_burst_groups_scaling_from_zero() {
        let cluster = cluster();
        assert_eq!(cluster.node_groups.len(), 9);

        let burst: Vec<&NodeGroupSpec> = cluster
            .node_groups
            .iter()
            .filter(|g| g.min_size == 0)
            .collect();
        assert_eq!(burst.len(), 4);
        assert!(burst.iter().all(|g| g.desired_size == 0));
        assert!(
            cluster
                .node_groups
                .iter()
                .all(|g| g.max_size == 10 && g.subnet_tier == SubnetTier::Private)
        );
    }

    #[test]
    fn test_service_accounts_bind_the_irsa_roles() {
        let cluster = cluster();
        assert_eq!(cluster.service_accounts.len(), 4);
        for account in &cluster.service_accounts {
            assert_eq!(account.namespace, "kube-system");
            assert!(!account.role.is_empty());
        }
    }

    #[test]
    fn test_charts_reuse_the_existing_service_accounts() {
        let cluster = cluster();
        assert_eq!(cluster.helm_charts.len(), 4);
        let autoscaler = cluster
            .helm_charts
            .iter()
            .find(|c| c.name == "cluster-autoscaler")
            .unwrap();
        assert_eq!(
            autoscaler.values.get("rbac.serviceAccount.create").unwrap(),
            "false"
        );
    }

    #[test]
    fn test_control_plane_settings() {
        let cluster = cluster();
        assert_eq!(cluster.endpoint_access, EndpointAccess::PublicAndPrivate);
        assert_eq!(cluster.service_cidr, "172.20.0.0/16");
        assert_eq!(cluster.logging.len(), 4);
        assert_eq!(cluster.secrets_encryption_key, "atlas-apac-key");
        assert_eq!(
            cluster.addons.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
            vec!["coredns", "kube-proxy", "vpc-cni"]
        );
    }
}
