//! Deployment parameters
//!
//! Everything an operator customizes per deployment. Values load from
//! `deployment.kdl` (see [`crate::parser`]) and fall back to the defaults
//! below.

use crate::error::{LoomError, Result};
use crate::naming::validate_deployment_id;
use serde::{Deserialize, Serialize};

/// Top-level deployment parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentParams {
    /// Deployment identifier; lowercase words joined by hyphens.
    pub deployment_id: String,

    /// Target region.
    pub region: String,

    /// Availability zones resources are spread across.
    pub availability_zones: Vec<String>,

    /// Length of the random suffix shared by bucket names.
    pub suffix_length: usize,

    pub network: NetworkParams,
    pub storage: StorageParams,
    pub database: DatabaseParams,
    pub cluster: ClusterParams,
}

impl Default for DeploymentParams {
    fn default() -> Self {
        Self {
            deployment_id: "atlas-apac".to_string(),
            region: "ap-southeast-1".to_string(),
            availability_zones: vec![
                "ap-southeast-1a".to_string(),
                "ap-southeast-1b".to_string(),
            ],
            suffix_length: 6,
            network: NetworkParams::default(),
            storage: StorageParams::default(),
            database: DatabaseParams::default(),
            cluster: ClusterParams::default(),
        }
    }
}

impl DeploymentParams {
    /// Validate the parameter set before synthesis.
    pub fn validate(&self) -> Result<()> {
        validate_deployment_id(&self.deployment_id)?;

        if self.region.is_empty() {
            return Err(LoomError::InvalidConfig("region must be set".to_string()));
        }
        if self.availability_zones.is_empty() {
            return Err(LoomError::InvalidConfig(
                "at least one availability zone is required".to_string(),
            ));
        }
        if self.suffix_length == 0 {
            return Err(LoomError::InvalidConfig(
                "suffix-length must be positive".to_string(),
            ));
        }
        self.network.validate()?;
        self.storage.validate()?;
        self.database.validate()?;
        Ok(())
    }
}

/// VPC topology parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkParams {
    /// VPC CIDR block.
    pub cidr: String,

    pub public_subnet_mask: u8,
    pub private_subnet_mask: u8,
    pub isolated_subnet_mask: u8,

    /// Adopt an existing VPC instead of declaring a new one.
    pub existing_vpc_id: Option<String>,

    /// Reuse an existing flow-log role instead of declaring one.
    pub reuse_flow_log_role: bool,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            cidr: "10.0.0.0/16".to_string(),
            public_subnet_mask: 24,
            private_subnet_mask: 24,
            isolated_subnet_mask: 24,
            existing_vpc_id: None,
            reuse_flow_log_role: false,
        }
    }
}

impl NetworkParams {
    fn validate(&self) -> Result<()> {
        let (addr, prefix) = self
            .cidr
            .split_once('/')
            .ok_or_else(|| LoomError::InvalidConfig(format!("malformed CIDR '{}'", self.cidr)))?;
        if addr.parse::<std::net::Ipv4Addr>().is_err()
            || !prefix.parse::<u8>().is_ok_and(|p| p <= 28)
        {
            return Err(LoomError::InvalidConfig(format!(
                "malformed CIDR '{}'",
                self.cidr
            )));
        }
        for mask in [
            self.public_subnet_mask,
            self.private_subnet_mask,
            self.isolated_subnet_mask,
        ] {
            if !(16..=28).contains(&mask) {
                return Err(LoomError::InvalidConfig(format!(
                    "subnet mask /{} outside the supported /16..=/28 range",
                    mask
                )));
            }
        }
        Ok(())
    }
}

/// Object storage parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageParams {
    /// Days noncurrent object versions are retained.
    pub retention_days: u32,
}

impl Default for StorageParams {
    fn default() -> Self {
        Self { retention_days: 90 }
    }
}

impl StorageParams {
    fn validate(&self) -> Result<()> {
        if self.retention_days == 0 {
            return Err(LoomError::InvalidConfig(
                "retention-days must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Relational database parameters. The password has no default; it must
/// come from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseParams {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl Default for DatabaseParams {
    fn default() -> Self {
        Self {
            name: "platformdb".to_string(),
            username: "platform".to_string(),
            password: String::new(),
        }
    }
}

impl DatabaseParams {
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.username.is_empty() {
            return Err(LoomError::InvalidConfig(
                "database name and username must be set".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(LoomError::InvalidConfig(
                "database password must be set in deployment.kdl".to_string(),
            ));
        }
        Ok(())
    }
}

/// Kubernetes cluster parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Hosted zone backing external-dns, when DNS is managed.
    pub host_zone_id: Option<String>,

    /// Control plane version.
    pub version: String,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            host_zone_id: None,
            version: "1.29".to_string(),
        }
    }
}
