use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const DEPLOYMENT: &str = r#"
    deployment "atlas-apac" {
        region "ap-southeast-1"
        availability-zones "ap-southeast-1a" "ap-southeast-1b"
        suffix-length 6
    }

    database {
        password "integration-test-password"
    }
"#;

fn loom() -> Command {
    let mut cmd = Command::cargo_bin("loom").unwrap();
    cmd.env_remove("CLOUDLOOM_CONFIG_PATH");
    cmd
}

#[test]
fn test_cli_help() {
    loom()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("synth"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_cli_version() {
    loom()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudloom"));
}

#[test]
fn test_invalid_command() {
    loom().arg("provision").assert().failure();
}

#[test]
fn test_validate_without_deployment_file() {
    let dir = tempfile::tempdir().unwrap();
    loom()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn test_validate_reports_the_summary() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("deployment.kdl");
    fs::write(&config, DEPLOYMENT).unwrap();

    loom()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("atlas-apac"))
        .stdout(predicate::str::contains("bucket"));
}

#[test]
fn test_validate_rejects_missing_password() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("deployment.kdl");
    fs::write(&config, "deployment \"atlas-apac\"").unwrap();

    loom()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("password"));
}

#[test]
fn test_synth_writes_a_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("deployment.kdl");
    let out = dir.path().join("out/stack.json");
    fs::write(&config, DEPLOYMENT).unwrap();

    loom()
        .arg("synth")
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest written"));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(manifest["version"], 1);
    assert_eq!(manifest["deployment_id"], "atlas-apac");

    let resources = manifest["resources"].as_object().unwrap();
    let bucket_names: Vec<&str> = resources
        .keys()
        .filter_map(|k| k.strip_prefix("bucket:"))
        .collect();
    assert_eq!(bucket_names.len(), 21);

    // Every bucket carries the same 6-character random suffix.
    let suffix = bucket_names[0].rsplit('-').next().unwrap();
    assert_eq!(suffix.len(), 6);
    assert!(
        suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    );
    for name in &bucket_names {
        assert!(name.ends_with(suffix), "bucket {} misses suffix", name);
    }

    assert!(resources.contains_key("vpc:atlas-apac"));
    assert!(resources.contains_key("kubernetes-cluster:atlas-apac"));
}

#[test]
fn test_synth_uses_the_default_output_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("deployment.kdl"), DEPLOYMENT).unwrap();

    loom()
        .current_dir(dir.path())
        .arg("synth")
        .assert()
        .success();

    assert!(dir.path().join(".cloudloom/stack.json").exists());
}
