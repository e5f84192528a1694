//! cloudloom core
//!
//! Declarative model of a code-analysis platform's cloud footprint.
//! Deployment parameters load from `deployment.kdl`, typed resource specs
//! describe the stack, and synthesis flattens everything into a versioned
//! descriptor manifest for the provisioning engine.
//!
//! ```text
//! deployment.kdl ──▶ DeploymentParams ──┐
//!                                       ├─▶ synthesize() ──▶ StackManifest
//!        NamingScheme (shared suffix) ──┘
//! ```
//!
//! Resource names are tied together by a [`naming::NamingScheme`]: bucket
//! names share one lazily drawn random suffix per synthesis run, role
//! names share one dated suffix. The scheme is passed explicitly wherever
//! a shared name is derived.

pub mod descriptor;
pub mod error;
pub mod loader;
pub mod model;
pub mod naming;
pub mod params;
pub mod parser;
pub mod stack;

// Re-exports
pub use descriptor::{Describe, DescriptorSet, ResourceDescriptor, ResourceKind};
pub use error::{LoomError, Result};
pub use loader::{find_deployment_file, load_params, load_params_from};
pub use naming::{DeploymentToken, NamingScheme, SuffixSource};
pub use params::DeploymentParams;
pub use stack::{StackManifest, naming_for, synthesize};
