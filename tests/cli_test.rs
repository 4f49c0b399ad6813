use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn skp(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("skp").expect("skp binary");
    cmd.env("SKP_DATA_DIR", data_dir)
        .env_remove("SKP_USER")
        .env_remove("REDIS_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run skp");
    assert!(
        output.status.success(),
        "skp failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    skp(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("equipment"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn status_change_is_audited_versioned_and_rollbackable() {
    let dir = TempDir::new().unwrap();
    let user = "64b7f0c2a1b2c3d4e5f60718";

    let created = json_output(skp(dir.path()).args([
        "--json",
        "--user",
        user,
        "equipment",
        "add",
        "Moving Head",
        "--category",
        "Lighting",
        "--serial",
        "MH-001",
    ]));
    let id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "AVAILABLE");
    assert!(created["qrCode"].as_str().unwrap().starts_with("SKP-EQ-"));

    skp(dir.path())
        .args(["--user", user, "equipment", "status", &id, "in-use"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now IN_USE"));

    let versions = json_output(skp(dir.path()).args(["--json", "history", "list", "equipment", &id]));
    let versions = versions.as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], 2);
    assert_eq!(versions[0]["changedBy"], user);
    assert_eq!(versions[0]["changes"][0]["field"], "status");
    assert_eq!(versions[0]["changes"][0]["oldValue"], "AVAILABLE");
    assert_eq!(versions[0]["changes"][0]["newValue"], "IN_USE");

    let updates = json_output(skp(dir.path()).args([
        "--json", "audit", "list", "--resource", "equipment", "--id", &id, "--action", "update",
    ]));
    assert_eq!(updates["total"], 1);
    assert_eq!(updates["logs"][0]["user"], user);

    skp(dir.path())
        .args(["history", "rollback", "equipment", &id, "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded as version 3"));

    let shown = json_output(skp(dir.path()).args(["--json", "equipment", "show", &id]));
    assert_eq!(shown["status"], "AVAILABLE");
}

#[test]
fn invalid_input_reports_an_error() {
    let dir = TempDir::new().unwrap();

    skp(dir.path())
        .args(["equipment", "list", "--status", "lost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected one of"));

    skp(dir.path())
        .args(["--json", "equipment", "show", "not-an-id"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\":false"));

    skp(dir.path())
        .args(["widget", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--user"));
}

#[test]
fn import_then_export_equipment() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("gear.csv");
    std::fs::write(
        &csv_path,
        "name,category,serialNumber,status,location,purchasePrice,notes\n\
         Fresnel 2kW,Lighting,FR-1,available,Hall A,899.00,\n\
         ,Lighting,FR-2,,,,\n",
    )
    .unwrap();

    skp(dir.path())
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 equipment item(s), 1 row(s) with errors"))
        .stdout(predicate::str::contains("line 3"));

    let out_path = dir.path().join("export.csv");
    skp(dir.path())
        .args(["export", "equipment"])
        .arg(&out_path)
        .assert()
        .success();

    let exported = std::fs::read_to_string(&out_path).unwrap();
    assert!(exported.starts_with("name,category,serialNumber"));
    assert!(exported.contains("Fresnel 2kW,Lighting,FR-1,AVAILABLE,Hall A"));
}
