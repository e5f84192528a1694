//! Managed encryption key spec

use crate::descriptor::{Describe, ResourceKind};
use crate::params::DeploymentParams;
use serde::{Deserialize, Serialize};

/// Customer-managed key encrypting the database and cluster secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySpec {
    pub name: String,
    pub enable_rotation: bool,
    /// Days the key lingers before deletion once scheduled.
    pub pending_window_days: u32,
    /// Adopt this key instead of creating one.
    pub existing_key_arn: Option<String>,
}

impl Describe for KeySpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::EncryptionKey
    }

    fn resource_name(&self) -> &str {
        &self.name
    }
}

pub fn platform_key(params: &DeploymentParams) -> KeySpec {
    KeySpec {
        name: format!("{}-key", params.deployment_id),
        enable_rotation: true,
        pending_window_days: 7,
        existing_key_arn: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rotates_and_lingers_a_week() {
        let key = platform_key(&DeploymentParams::default());
        assert!(key.enable_rotation);
        assert_eq!(key.pending_window_days, 7);
        assert!(key.existing_key_arn.is_none());
    }
}
