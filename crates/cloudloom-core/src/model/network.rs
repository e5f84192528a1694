//! VPC and subnet specs

use crate::descriptor::{Describe, ResourceKind};
use crate::params::DeploymentParams;
use serde::{Deserialize, Serialize};

/// Subnet tier within the VPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetTier {
    /// Internet-facing; hosts the NAT gateways.
    Public,
    /// Egress through NAT; hosts the cluster nodes.
    Private,
    /// No internet path; hosts the database.
    Isolated,
}

impl std::fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubnetTier::Public => write!(f, "public"),
            SubnetTier::Private => write!(f, "private"),
            SubnetTier::Isolated => write!(f, "isolated"),
        }
    }
}

/// One subnet of the VPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetSpec {
    pub name: String,
    pub availability_zone: String,
    pub tier: SubnetTier,
    pub cidr_mask: u8,
}

/// VPC spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpcSpec {
    pub name: String,

    /// CIDR block of the VPC.
    pub cidr: String,

    pub availability_zones: Vec<String>,

    pub enable_dns_hostnames: bool,
    pub enable_dns_support: bool,

    /// Number of NAT gateways, placed in public subnets.
    pub nat_gateways: u8,

    /// Gateway endpoints kept inside the VPC (service names).
    pub gateway_endpoints: Vec<String>,

    /// Ship flow logs to CloudWatch.
    pub flow_logs: bool,

    pub subnets: Vec<SubnetSpec>,

    /// Adopt this VPC instead of creating one.
    pub existing_vpc_id: Option<String>,
}

impl Describe for VpcSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Vpc
    }

    fn resource_name(&self) -> &str {
        &self.name
    }
}

/// Build the platform VPC: one public, private, and isolated subnet per
/// availability zone. The isolated tier is named `db`, matching its single
/// tenant.
pub fn platform_vpc(params: &DeploymentParams) -> VpcSpec {
    let id = &params.deployment_id;
    let net = &params.network;

    let mut subnets = Vec::new();
    for az in &params.availability_zones {
        subnets.push(SubnetSpec {
            name: format!("{}-public-{}", id, az),
            availability_zone: az.clone(),
            tier: SubnetTier::Public,
            cidr_mask: net.public_subnet_mask,
        });
        subnets.push(SubnetSpec {
            name: format!("{}-private-{}", id, az),
            availability_zone: az.clone(),
            tier: SubnetTier::Private,
            cidr_mask: net.private_subnet_mask,
        });
        subnets.push(SubnetSpec {
            name: format!("{}-db-{}", id, az),
            availability_zone: az.clone(),
            tier: SubnetTier::Isolated,
            cidr_mask: net.isolated_subnet_mask,
        });
    }

    VpcSpec {
        name: id.clone(),
        cidr: net.cidr.clone(),
        availability_zones: params.availability_zones.clone(),
        enable_dns_hostnames: true,
        enable_dns_support: true,
        nat_gateways: 1,
        gateway_endpoints: vec!["s3".to_string()],
        flow_logs: true,
        subnets,
        existing_vpc_id: net.existing_vpc_id.clone(),
    }
}
