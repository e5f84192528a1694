//! Deployment naming
//!
//! Every resource name in a deployment carries a shared suffix so that
//! resources provisioned together are identifiable as one cohort, while
//! repeated deployments never collide on globally unique names (bucket
//! names in particular). The suffix is drawn lazily, exactly once per
//! [`DeploymentToken`], and reused by every caller.

use crate::error::{LoomError, Result};
use chrono::{NaiveDate, Utc};
use rand::Rng;
use std::sync::OnceLock;

/// Symbols a deployment token is drawn from: lowercase ASCII letters and
/// decimal digits. Bucket names only accept this alphabet.
pub const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Source of random token symbols.
///
/// The seam exists so tests can count draws; production code uses
/// [`EntropySource`].
pub trait SuffixSource: Send + Sync {
    /// Draw `length` symbols from [`TOKEN_ALPHABET`].
    fn draw(&self, length: usize) -> String;
}

/// Default source backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct EntropySource;

impl SuffixSource for EntropySource {
    fn draw(&self, length: usize) -> String {
        let mut rng = rand::rng();
        (0..length)
            .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
            .collect()
    }
}

/// A random token generated on first read and cached for the lifetime of
/// the instance.
///
/// Construction never draws randomness; the first [`get`](Self::get) does,
/// and every later call returns the identical cached value. Initialization
/// is serialized through a single-assignment cell, so concurrent first
/// readers still observe one value.
pub struct DeploymentToken {
    length: usize,
    source: Box<dyn SuffixSource>,
    value: OnceLock<String>,
}

impl DeploymentToken {
    /// Create a token provider drawing from the thread-local RNG.
    ///
    /// Fails when `length` is zero; a zero-length suffix would make every
    /// downstream name collide across deployments.
    pub fn new(length: usize) -> Result<Self> {
        Self::with_source(length, EntropySource)
    }

    /// Create a token provider with an explicit symbol source.
    pub fn with_source(length: usize, source: impl SuffixSource + 'static) -> Result<Self> {
        if length == 0 {
            return Err(LoomError::InvalidConfig(
                "token length must be positive".to_string(),
            ));
        }
        Ok(Self {
            length,
            source: Box::new(source),
            value: OnceLock::new(),
        })
    }

    /// Return the token, drawing it on first call.
    pub fn get(&self) -> &str {
        self.value.get_or_init(|| self.source.draw(self.length))
    }

    /// Configured token length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl std::fmt::Debug for DeploymentToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentToken")
            .field("length", &self.length)
            .field("value", &self.value.get())
            .finish()
    }
}

/// Derives every shared name suffix of a deployment.
///
/// One scheme is constructed per synthesis run and passed explicitly to
/// each factory that names resources, so all bucket names share one random
/// suffix and all role names share one dated suffix.
#[derive(Debug)]
pub struct NamingScheme {
    deployment_id: String,
    token: DeploymentToken,
}

impl NamingScheme {
    pub fn new(deployment_id: impl Into<String>, token: DeploymentToken) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            token,
        }
    }

    pub fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    /// Shared bucket-name suffix: `{deployment_id}-{token}`.
    pub fn suffix(&self) -> String {
        format!("{}-{}", self.deployment_id, self.token.get())
    }

    /// Bucket name for a base name: `{base}-{deployment_id}-{token}`.
    pub fn bucket_name(&self, base: &str) -> String {
        format!("{}-{}", base, self.suffix())
    }

    /// S3 ARN wildcard matching every bucket of this deployment.
    pub fn bucket_pattern(&self) -> String {
        format!("arn:aws:s3:::*-{}", self.suffix())
    }

    /// Shared role-name suffix: `{deployment_id}-{YYYYMMDD}` (UTC).
    pub fn dated_suffix(&self) -> String {
        self.dated_suffix_on(Utc::now().date_naive())
    }

    /// Dated suffix for an explicit date.
    pub fn dated_suffix_on(&self, date: NaiveDate) -> String {
        format!("{}-{}", self.deployment_id, date.format("%Y%m%d"))
    }

    /// Role name for a base name: `{base}-{deployment_id}-{YYYYMMDD}`.
    pub fn role_name(&self, base: &str) -> String {
        format!("{}-{}", base, self.dated_suffix())
    }
}

/// Validate a deployment id: lowercase alphanumeric words joined by single
/// hyphens. Ids feed directly into bucket and DNS-adjacent names, which
/// reject anything else.
pub fn validate_deployment_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && !id.starts_with('-')
        && !id.ends_with('-')
        && !id.contains("--")
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(LoomError::InvalidConfig(format!(
            "deployment id '{}' must be lowercase alphanumeric words joined by hyphens",
            id
        )))
    }
}
