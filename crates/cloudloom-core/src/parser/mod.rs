//! Parsing of `deployment.kdl` documents

use crate::error::{LoomError, Result};
use crate::params::DeploymentParams;
use kdl::{KdlDocument, KdlNode};
use tracing::debug;

#[cfg(test)]
mod tests;

/// First entry of a node, as a string.
fn string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// First entry of a node, as an integer.
fn integer_arg(node: &KdlNode) -> Option<i128> {
    node.entries().first().and_then(|e| e.value().as_integer())
}

/// First entry of a node, as a bool.
fn bool_arg(node: &KdlNode) -> Option<bool> {
    node.entries().first().and_then(|e| e.value().as_bool())
}

/// All string entries of a node.
fn string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter_map(|e| e.value().as_string().map(|s| s.to_string()))
        .collect()
}

/// Parse a KDL document into deployment parameters. Absent nodes keep
/// their defaults; the `deployment` node and its id are required.
pub fn parse_str(input: &str) -> Result<DeploymentParams> {
    let doc: KdlDocument = input.parse()?;
    let mut params = DeploymentParams::default();
    let mut saw_deployment = false;

    for node in doc.nodes() {
        match node.name().value() {
            "deployment" => {
                saw_deployment = true;
                params.deployment_id = string_arg(node).ok_or_else(|| LoomError::MissingField {
                    node: "deployment".to_string(),
                    field: "id".to_string(),
                })?;
                parse_deployment(node, &mut params);
            }
            "network" => parse_network(node, &mut params),
            "storage" => parse_storage(node, &mut params),
            "database" => parse_database(node, &mut params),
            "cluster" => parse_cluster(node, &mut params),
            other => {
                debug!(node = other, "Ignoring unknown top-level node");
            }
        }
    }

    if !saw_deployment {
        return Err(LoomError::InvalidConfig(
            "a deployment node is required".to_string(),
        ));
    }
    Ok(params)
}

fn parse_deployment(node: &KdlNode, params: &mut DeploymentParams) {
    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "region" => {
                    if let Some(region) = string_arg(child) {
                        params.region = region;
                    }
                }
                "availability-zones" | "availability_zones" => {
                    params.availability_zones = string_args(child);
                }
                "suffix-length" | "suffix_length" => {
                    if let Some(length) = integer_arg(child) {
                        params.suffix_length = length.max(0) as usize;
                    }
                }
                _ => {}
            }
        }
    }
}

fn parse_network(node: &KdlNode, params: &mut DeploymentParams) {
    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "cidr" => {
                    if let Some(cidr) = string_arg(child) {
                        params.network.cidr = cidr;
                    }
                }
                "public-subnet-mask" | "public_subnet_mask" => {
                    if let Some(mask) = integer_arg(child) {
                        params.network.public_subnet_mask = mask as u8;
                    }
                }
                "private-subnet-mask" | "private_subnet_mask" => {
                    if let Some(mask) = integer_arg(child) {
                        params.network.private_subnet_mask = mask as u8;
                    }
                }
                "isolated-subnet-mask" | "isolated_subnet_mask" => {
                    if let Some(mask) = integer_arg(child) {
                        params.network.isolated_subnet_mask = mask as u8;
                    }
                }
                "existing-vpc" | "existing_vpc" => {
                    params.network.existing_vpc_id = string_arg(child);
                }
                "reuse-flow-log-role" | "reuse_flow_log_role" => {
                    if let Some(reuse) = bool_arg(child) {
                        params.network.reuse_flow_log_role = reuse;
                    }
                }
                _ => {}
            }
        }
    }
}

fn parse_storage(node: &KdlNode, params: &mut DeploymentParams) {
    if let Some(children) = node.children() {
        for child in children.nodes() {
            if matches!(child.name().value(), "retention-days" | "retention_days") {
                if let Some(days) = integer_arg(child) {
                    params.storage.retention_days = days.max(0) as u32;
                }
            }
        }
    }
}

fn parse_database(node: &KdlNode, params: &mut DeploymentParams) {
    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "name" => {
                    if let Some(name) = string_arg(child) {
                        params.database.name = name;
                    }
                }
                "username" => {
                    if let Some(username) = string_arg(child) {
                        params.database.username = username;
                    }
                }
                "password" => {
                    if let Some(password) = string_arg(child) {
                        params.database.password = password;
                    }
                }
                _ => {}
            }
        }
    }
}

fn parse_cluster(node: &KdlNode, params: &mut DeploymentParams) {
    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "version" => {
                    if let Some(version) = string_arg(child) {
                        params.cluster.version = version;
                    }
                }
                "host-zone-id" | "host_zone_id" => {
                    params.cluster.host_zone_id = string_arg(child);
                }
                _ => {}
            }
        }
    }
}
