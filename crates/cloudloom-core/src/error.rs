//! Error types for cloudloom

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating, or synthesizing a deployment
#[derive(Error, Debug)]
pub enum LoomError {
    #[error("KDL parse error: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("node '{node}' is missing required field '{field}'")]
    MissingField { node: String, field: String },

    #[error(
        "deployment file not found\nsearched from: {0}\nhint: run inside a directory containing deployment.kdl, or set CLOUDLOOM_CONFIG_PATH"
    )]
    DeploymentFileNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, LoomError>;
