//! CLI integration tests for mtree
//!
//! These tests run the binary against manifest files on disk and check the
//! rendered trees, summaries and error handling.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command instance for the mtree binary
fn mtree_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("mtree"));
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

const DEPLOY: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
  labels:
    app: web
---
apiVersion: v1
kind: Service
metadata:
  name: web
  namespace: prod
  labels:
    app: web
---
apiVersion: v1
kind: ConfigMap
metadata:
  labels:
    app: web
";

/// Create a directory with a couple of manifest files
fn setup_manifests() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let manifests = dir.path().join("manifests");
    fs::create_dir_all(manifests.join("base")).unwrap();
    fs::write(manifests.join("deploy.yaml"), DEPLOY).unwrap();
    fs::write(
        manifests.join("base/pod.yml"),
        "apiVersion: v1\nkind: Pod\nmetadata:\n  name: debug\n",
    )
    .unwrap();
    (dir, manifests)
}

// =============================================================================
// Tree Tests
// =============================================================================

#[test]
fn test_tree_by_kind_for_file() {
    let (dir, manifests) = setup_manifests();

    mtree_cmd(&dir)
        .arg("tree")
        .arg(manifests.join("deploy.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("apps/v1 [1]"))
        .stdout(predicate::str::contains("v1 [1]"))
        .stdout(predicate::str::contains("Service [1]"))
        .stdout(predicate::str::contains("ConfigMap").not());
}

#[test]
fn test_tree_merges_folder() {
    let (dir, manifests) = setup_manifests();

    mtree_cmd(&dir)
        .args(["tree", "--axis", "ns"])
        .arg(&manifests)
        .assert()
        .success()
        .stdout(predicate::str::contains("prod [2]"))
        .stdout(predicate::str::contains("undefinedNs [1]"))
        .stdout(predicate::str::contains("v1/Pod:debug"));
}

#[test]
fn test_tree_by_labels_json() {
    let (dir, manifests) = setup_manifests();

    let output = mtree_cmd(&dir)
        .args(["--format", "json", "tree", "--axis", "labels"])
        .arg(&manifests)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["axis"], "labels");
    let app = &json["nodes"][0];
    assert_eq!(app["label"], "app [2]");
    assert_eq!(app["children"][0]["label"], "web [2]");
    let leaves = app["children"][0]["children"].as_array().unwrap();
    assert_eq!(leaves[0]["label"], "apps/v1/Deployment:web");
    assert_eq!(leaves[0]["open_at"]["line"], 1);
    assert_eq!(leaves[1]["label"], "v1/Service:web");
    assert_eq!(leaves[1]["open_at"]["line"], 9);
}

#[test]
fn test_tree_depth_limits_output() {
    let (dir, manifests) = setup_manifests();

    mtree_cmd(&dir)
        .args(["tree", "--depth", "1"])
        .arg(&manifests)
        .assert()
        .success()
        .stdout(predicate::str::contains("v1 [2]"))
        .stdout(predicate::str::contains("Pod").not());
}

#[test]
fn test_tree_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    mtree_cmd(&dir)
        .args(["tree", "missing.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read or parse"));
}

#[test]
fn test_tree_broken_yaml_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.yaml"), "kind: \"Pod\n").unwrap();

    mtree_cmd(&dir)
        .args(["tree", "broken.yaml"])
        .assert()
        .failure();
}

#[test]
fn test_project_config_sets_default_axis() {
    let (dir, manifests) = setup_manifests();
    fs::write(dir.path().join(".mtree.toml"), "default_axis = \"ns\"\n").unwrap();

    mtree_cmd(&dir)
        .arg("tree")
        .arg(&manifests)
        .assert()
        .success()
        .stdout(predicate::str::contains("prod [2]"));
}

#[test]
fn test_project_config_limits_extensions() {
    let (dir, manifests) = setup_manifests();
    fs::write(dir.path().join(".mtree.toml"), "extensions = [\"yaml\"]\n").unwrap();

    mtree_cmd(&dir)
        .arg("tree")
        .arg(&manifests)
        .assert()
        .success()
        .stdout(predicate::str::contains("debug").not());
}

// =============================================================================
// Summary and Invalid Tests
// =============================================================================

#[test]
fn test_summary_counts() {
    let (dir, manifests) = setup_manifests();

    mtree_cmd(&dir)
        .arg("summary")
        .arg(&manifests)
        .assert()
        .success()
        .stdout(predicate::str::contains("Manifests: 4"))
        .stdout(predicate::str::contains("Valid:   3"))
        .stdout(predicate::str::contains("Invalid: 1"))
        .stdout(predicate::str::contains("By labels:"));
}

#[test]
fn test_summary_json() {
    let (dir, manifests) = setup_manifests();

    let output = mtree_cmd(&dir)
        .args(["-f", "json", "summary"])
        .arg(&manifests)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total"], 4);
    assert_eq!(json["valid"], 3);
    assert_eq!(json["axes"]["ns"][0], "prod [2]");
}

#[test]
fn test_invalid_lists_unnamed_document() {
    let (dir, manifests) = setup_manifests();

    mtree_cmd(&dir)
        .arg("invalid")
        .arg(manifests.join("deploy.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid documents (1)"))
        .stdout(predicate::str::contains("ConfigMap"))
        .stdout(predicate::str::contains("deploy.yaml:17:1"));
}

// =============================================================================
// Follow Tests
// =============================================================================

#[test]
fn test_follow_redraws_on_active_document() {
    let (dir, manifests) = setup_manifests();
    let stdin = format!(
        "notes.txt\n{}\n",
        manifests.join("deploy.yaml").display()
    );

    mtree_cmd(&dir)
        .arg("follow")
        .write_stdin(stdin)
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy.yaml =="))
        .stdout(predicate::str::contains("[kind]"))
        .stdout(predicate::str::contains("[labels]"))
        .stdout(predicate::str::contains("[ns]"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn test_follow_reports_unreadable_document() {
    let dir = TempDir::new().unwrap();

    mtree_cmd(&dir)
        .arg("follow")
        .write_stdin("gone.yaml\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not read or parse"));
}

#[test]
fn test_follow_draws_initial_document() {
    let (dir, manifests) = setup_manifests();

    mtree_cmd(&dir)
        .arg("follow")
        .arg(manifests.join("deploy.yaml"))
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy.yaml =="))
        .stdout(predicate::str::contains("[kind]"))
        .stdout(predicate::str::contains("Deployment [1]"));
}

#[test]
fn test_follow_ignores_initial_non_manifest() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "hello\n").unwrap();

    mtree_cmd(&dir)
        .args(["follow", "notes.txt"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("==").not());
}

#[test]
fn test_summary_skips_blank_files_in_folder() {
    let (dir, manifests) = setup_manifests();
    fs::write(manifests.join("empty.yaml"), "").unwrap();
    fs::write(manifests.join("comments.yaml"), "# nothing here\n").unwrap();

    mtree_cmd(&dir)
        .arg("summary")
        .arg(&manifests)
        .assert()
        .success()
        .stdout(predicate::str::contains("Manifests: 4"))
        .stdout(predicate::str::contains("Invalid: 1"));
}
