//! Deployment file discovery and loading

use crate::error::{LoomError, Result};
use crate::params::DeploymentParams;
use crate::parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable pointing directly at a deployment file.
pub const CONFIG_ENV_VAR: &str = "CLOUDLOOM_CONFIG_PATH";

const CONFIG_DIR: &str = ".cloudloom";
const CANDIDATES: [&str; 2] = ["deployment.local.kdl", "deployment.kdl"];

/// Locate the deployment file for the current working directory.
///
/// Search order:
/// 1. `CLOUDLOOM_CONFIG_PATH` (direct path)
/// 2. `deployment.local.kdl`, `deployment.kdl` in the working directory
/// 3. the same names under `./.cloudloom/`
pub fn find_deployment_file() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }
    find_deployment_file_in(&std::env::current_dir()?)
}

/// Locate the deployment file under an explicit directory.
pub fn find_deployment_file_in(dir: &Path) -> Result<PathBuf> {
    for name in CANDIDATES {
        let path = dir.join(name);
        if path.exists() {
            return Ok(path);
        }
    }

    let nested = dir.join(CONFIG_DIR);
    if nested.is_dir() {
        for name in CANDIDATES {
            let path = nested.join(name);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    Err(LoomError::DeploymentFileNotFound(dir.to_path_buf()))
}

/// Read, parse, and validate a deployment file.
pub fn load_params_from(path: &Path) -> Result<DeploymentParams> {
    debug!(path = %path.display(), "Loading deployment file");
    let content = std::fs::read_to_string(path)?;
    let params = parser::parse_str(&content)?;
    params.validate()?;
    info!(
        deployment_id = %params.deployment_id,
        region = %params.region,
        "Loaded deployment parameters"
    );
    Ok(params)
}

/// Discover and load the deployment file.
pub fn load_params() -> Result<DeploymentParams> {
    load_params_from(&find_deployment_file()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
        deployment "atlas-apac"
        database { password "s3cret" }
    "#;

    #[test]
    fn test_plain_file_is_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("deployment.kdl"), MINIMAL).unwrap();

        let found = find_deployment_file_in(dir.path()).unwrap();
        assert!(found.ends_with("deployment.kdl"));
    }

    #[test]
    fn test_local_file_wins_over_plain() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("deployment.kdl"), MINIMAL).unwrap();
        fs::write(dir.path().join("deployment.local.kdl"), MINIMAL).unwrap();

        let found = find_deployment_file_in(dir.path()).unwrap();
        assert!(found.ends_with("deployment.local.kdl"));
    }

    #[test]
    fn test_nested_config_dir_is_searched() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".cloudloom")).unwrap();
        fs::write(dir.path().join(".cloudloom/deployment.kdl"), MINIMAL).unwrap();

        let found = find_deployment_file_in(dir.path()).unwrap();
        assert!(found.ends_with(".cloudloom/deployment.kdl"));
    }

    #[test]
    fn test_missing_file_reports_the_search_root() {
        let dir = tempdir().unwrap();
        let err = find_deployment_file_in(dir.path()).unwrap_err();
        assert!(matches!(err, LoomError::DeploymentFileNotFound(_)));
    }

    #[test]
    fn test_load_parses_and_validates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment.kdl");
        fs::write(&path, MINIMAL).unwrap();

        let params = load_params_from(&path).unwrap();
        assert_eq!(params.deployment_id, "atlas-apac");
    }

    #[test]
    fn test_load_rejects_invalid_params() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment.kdl");
        fs::write(&path, "deployment \"atlas-apac\"").unwrap();

        // Parses, but fails validation: no database password.
        assert!(load_params_from(&path).is_err());
    }
}
