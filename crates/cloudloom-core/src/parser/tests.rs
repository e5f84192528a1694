use super::*;

#[test]
fn test_parse_full_document() {
    let kdl = r#"
        deployment "atlas-emea" {
            region "eu-west-1"
            availability-zones "eu-west-1a" "eu-west-1b" "eu-west-1c"
            suffix-length 8
        }

        network {
            cidr "10.42.0.0/16"
            public-subnet-mask 22
            private-subnet-mask 23
            isolated-subnet-mask 24
            existing-vpc "vpc-0123abcd"
            reuse-flow-log-role #true
        }

        storage {
            retention-days 30
        }

        database {
            name "atlasdb"
            username "atlas"
            password "hunter2-but-longer"
        }

        cluster {
            version "1.29"
            host-zone-id "Z0EXAMPLE"
        }
    "#;

    let params = parse_str(kdl).unwrap();
    assert_eq!(params.deployment_id, "atlas-emea");
    assert_eq!(params.region, "eu-west-1");
    assert_eq!(params.availability_zones.len(), 3);
    assert_eq!(params.suffix_length, 8);

    assert_eq!(params.network.cidr, "10.42.0.0/16");
    assert_eq!(params.network.public_subnet_mask, 22);
    assert_eq!(params.network.private_subnet_mask, 23);
    assert_eq!(params.network.isolated_subnet_mask, 24);
    assert_eq!(params.network.existing_vpc_id.as_deref(), Some("vpc-0123abcd"));
    assert!(params.network.reuse_flow_log_role);

    assert_eq!(params.storage.retention_days, 30);

    assert_eq!(params.database.name, "atlasdb");
    assert_eq!(params.database.username, "atlas");
    assert_eq!(params.database.password, "hunter2-but-longer");

    assert_eq!(params.cluster.version, "1.29");
    assert_eq!(params.cluster.host_zone_id.as_deref(), Some("Z0EXAMPLE"));

    assert!(params.validate().is_ok());
}

#[test]
fn test_minimal_document_keeps_defaults() {
    let kdl = r#"
        deployment "atlas-apac"

        database {
            password "s3cret"
        }
    "#;

    let params = parse_str(kdl).unwrap();
    assert_eq!(params.deployment_id, "atlas-apac");
    assert_eq!(params.region, "ap-southeast-1");
    assert_eq!(params.suffix_length, 6);
    assert_eq!(params.storage.retention_days, 90);
    assert_eq!(params.database.name, "platformdb");
    assert!(params.network.existing_vpc_id.is_none());
    assert!(params.validate().is_ok());
}

#[test]
fn test_snake_case_aliases_are_accepted() {
    let kdl = r#"
        deployment "atlas-apac" {
            suffix_length 10
        }

        network {
            public_subnet_mask 20
        }

        storage {
            retention_days 7
        }
    "#;

    let params = parse_str(kdl).unwrap();
    assert_eq!(params.suffix_length, 10);
    assert_eq!(params.network.public_subnet_mask, 20);
    assert_eq!(params.storage.retention_days, 7);
}

#[test]
fn test_deployment_node_is_required() {
    let err = parse_str("network { cidr \"10.0.0.0/16\" }").unwrap_err();
    assert!(matches!(err, LoomError::InvalidConfig(_)));
}

#[test]
fn test_deployment_id_is_required() {
    let err = parse_str("deployment { region \"eu-west-1\" }").unwrap_err();
    assert!(matches!(
        err,
        LoomError::MissingField { node, .. } if node == "deployment"
    ));
}

#[test]
fn test_malformed_kdl_is_a_parse_error() {
    let err = parse_str("deployment \"atlas\" {").unwrap_err();
    assert!(matches!(err, LoomError::KdlParse(_)));
}

#[test]
fn test_unknown_nodes_are_ignored() {
    let kdl = r#"
        deployment "atlas-apac"
        observability {
            metrics #true
        }
    "#;
    assert!(parse_str(kdl).is_ok());
}
