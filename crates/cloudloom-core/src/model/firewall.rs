//! Security group specs

use crate::descriptor::{Describe, ResourceKind};
use crate::params::DeploymentParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Tcp,
    Icmp,
    All,
}

/// One ingress rule of a security group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressRule {
    /// Source CIDR.
    pub peer: String,
    pub protocol: Protocol,
    /// Port, absent for ICMP and all-traffic rules.
    pub port: Option<u16>,
    pub description: String,
}

impl IngressRule {
    pub fn tcp(peer: impl Into<String>, port: u16, description: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            protocol: Protocol::Tcp,
            port: Some(port),
            description: description.into(),
        }
    }
}

/// Security group spec. Egress is always open; only ingress is curated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityGroupSpec {
    pub name: String,
    pub description: String,
    /// Name of the VPC the group lives in.
    pub vpc: String,
    pub allow_all_outbound: bool,
    pub ingress: Vec<IngressRule>,
}

impl Describe for SecurityGroupSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::SecurityGroup
    }

    fn resource_name(&self) -> &str {
        &self.name
    }
}

/// Internet-facing group: web, SSH, and the Kubernetes API server.
pub fn external_security_group(params: &DeploymentParams) -> SecurityGroupSpec {
    let id = &params.deployment_id;
    SecurityGroupSpec {
        name: format!("external-{}-sg", id),
        description: format!("External security group for deployment {}", id),
        vpc: id.clone(),
        allow_all_outbound: true,
        ingress: vec![
            IngressRule::tcp("0.0.0.0/0", 80, "HTTP"),
            IngressRule::tcp("0.0.0.0/0", 22, "SSH"),
            IngressRule::tcp("0.0.0.0/0", 443, "HTTPS"),
            IngressRule::tcp("0.0.0.0/0", 6443, "Kubernetes API server"),
            IngressRule {
                peer: "0.0.0.0/0".to_string(),
                protocol: Protocol::Icmp,
                port: None,
                description: "All IPv4 ICMP".to_string(),
            },
        ],
    }
}

/// Intra-VPC group: everything from inside the VPC CIDR.
pub fn internal_security_group(params: &DeploymentParams) -> SecurityGroupSpec {
    let id = &params.deployment_id;
    SecurityGroupSpec {
        name: format!("internal-{}-sg", id),
        description: format!("Internal security group for deployment {}", id),
        vpc: id.clone(),
        allow_all_outbound: true,
        ingress: vec![IngressRule {
            peer: params.network.cidr.clone(),
            protocol: Protocol::All,
            port: None,
            description: "All protocols".to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_group_opens_expected_ports() {
        let group = external_security_group(&DeploymentParams::default());
        let tcp_ports: Vec<u16> = group
            .ingress
            .iter()
            .filter(|r| r.protocol == Protocol::Tcp)
            .filter_map(|r| r.port)
            .collect();
        assert_eq!(tcp_ports, vec![80, 22, 443, 6443]);
        assert!(group.ingress.iter().any(|r| r.protocol == Protocol::Icmp));
    }

    #[test]
    fn test_internal_group_is_scoped_to_vpc_cidr() {
        let params = DeploymentParams::default();
        let group = internal_security_group(&params);
        assert_eq!(group.ingress.len(), 1);
        assert_eq!(group.ingress[0].peer, params.network.cidr);
        assert_eq!(group.ingress[0].protocol, Protocol::All);
    }

    #[test]
    fn test_group_names_embed_the_deployment_id() {
        let params = DeploymentParams::default();
        assert_eq!(
            external_security_group(&params).name,
            "external-atlas-apac-sg"
        );
        assert_eq!(
            internal_security_group(&params).name,
            "internal-atlas-apac-sg"
        );
    }
}
