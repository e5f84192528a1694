pub mod synth;
pub mod validate;

use cloudloom_core::{DeploymentParams, DescriptorSet, ResourceKind, Result};
use colored::Colorize;
use std::path::Path;

/// Load parameters from an explicit file or via discovery.
pub(crate) fn load(config: Option<&Path>) -> Result<DeploymentParams> {
    match config {
        Some(path) => cloudloom_core::load_params_from(path),
        None => cloudloom_core::load_params(),
    }
}

/// Print the per-kind resource summary of a synthesized set.
pub(crate) fn print_summary(resources: &DescriptorSet) {
    println!("Resources: {}", resources.len());
    for kind in ResourceKind::ALL {
        let count = resources.by_kind(kind).len();
        if count > 0 {
            println!("  {:<20} {}", kind.to_string().cyan(), count);
        }
    }
}
