//! Relational database cluster spec

use crate::descriptor::{Describe, ResourceKind};
use crate::params::DeploymentParams;
use serde::{Deserialize, Serialize};

/// Backup policy of the database cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPolicy {
    pub retention_days: u32,
    pub preferred_window: String,
}

/// Aurora-compatible PostgreSQL cluster spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseClusterSpec {
    pub identifier: String,

    pub engine: String,
    pub engine_version: String,
    pub parameter_group: String,

    pub instance_class: String,
    pub instances: u32,

    pub database_name: String,
    pub username: String,
    pub password: String,

    pub backup: BackupPolicy,

    /// Name of the key encrypting storage and performance insights.
    pub encryption_key: String,

    /// Subnet group name; the cluster sits in the isolated tier.
    pub subnet_group: String,
    pub security_groups: Vec<String>,

    pub publicly_accessible: bool,
    pub deletion_protection: bool,
    pub performance_insights: bool,
    pub auto_minor_version_upgrade: bool,
}

impl Describe for DatabaseClusterSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::DatabaseCluster
    }

    fn resource_name(&self) -> &str {
        &self.identifier
    }
}

/// Build the platform database cluster.
pub fn platform_database(params: &DeploymentParams) -> DatabaseClusterSpec {
    let id = &params.deployment_id;
    DatabaseClusterSpec {
        identifier: id.clone(),
        engine: "aurora-postgresql".to_string(),
        engine_version: "13.4".to_string(),
        parameter_group: "default.aurora-postgresql13".to_string(),
        instance_class: "r6g.xlarge".to_string(),
        instances: 1,
        database_name: params.database.name.clone(),
        username: params.database.username.clone(),
        password: params.database.password.clone(),
        backup: BackupPolicy {
            retention_days: 7,
            preferred_window: "02:00-03:00".to_string(),
        },
        encryption_key: format!("{}-key", id),
        subnet_group: id.clone(),
        security_groups: vec![format!("internal-{}-sg", id)],
        publicly_accessible: false,
        deletion_protection: false,
        performance_insights: true,
        auto_minor_version_upgrade: true,
    }
}
