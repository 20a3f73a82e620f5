// End-to-end tests for the `melorate` binary: exit codes and the --json
// stdout contract.
//
// Run with: cargo test -p melorate-cli --test cli_tests -- --nocapture

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::tempdir;

fn melorate() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_melorate"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("MELORATE_STORE");
    cmd
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../migrate/tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ===========================================================================
// melorate migrate
// ===========================================================================

#[test]
fn migrate_partial_exits_3_with_json_result() {
    let output = melorate()
        .args(["migrate", &fixture("stored-2025.json"), "--roster", &fixture("roster-2026.toml"), "--json"])
        .output()
        .expect("melorate migrate");

    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let val: serde_json::Value = serde_json::from_str(stdout.trim()).expect("stdout must be one JSON value");
    assert_eq!(val["migrated_count"], 8);
    assert_eq!(val["lost_count"], 2);
    assert_eq!(val["total_ratings"], 10);
    assert!(stderr(&output).contains("Nordic Echo - Northern Lights"));
}

#[test]
fn migrate_same_roster_succeeds_and_writes_output() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("migrated.json");

    let output = melorate()
        .args([
            "migrate",
            &fixture("stored-2025.json"),
            "--roster",
            &fixture("roster-2025.toml"),
            "--output",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("melorate migrate");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty(), "human mode writes nothing to stdout");

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 7);

    let check = melorate()
        .args(["validate", out_path.to_str().unwrap()])
        .output()
        .expect("melorate validate");
    assert!(check.status.success(), "stderr: {}", stderr(&check));
}

#[test]
fn migrate_missing_file_exits_5() {
    let output = melorate()
        .args(["migrate", "does-not-exist.json"])
        .output()
        .expect("melorate migrate");
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).starts_with("error: cannot read"));
}

// ===========================================================================
// melorate validate
// ===========================================================================

#[test]
fn validate_duplicate_ids_exits_4() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dupes.json");
    let entry = r#"{"id":"a-b","number":1,"artist":"A","song":"B","heat":"H","heatDate":"2026-01-31"}"#;
    std::fs::write(&path, format!("[{entry},{entry}]")).unwrap();

    let output = melorate()
        .args(["validate", path.to_str().unwrap()])
        .output()
        .expect("melorate validate");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Duplicate entry id: a-b"));
}

// ===========================================================================
// melorate version
// ===========================================================================

#[test]
fn version_reports_data_version() {
    let output = melorate()
        .args(["version", "--roster", &fixture("roster-2026.toml")])
        .output()
        .expect("melorate version");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("data version: 6023"), "{stdout}");
}

#[test]
fn builtin_version() {
    let output = melorate().arg("version").output().expect("melorate version");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("data version: 30465"));
}

// ===========================================================================
// melorate startup / export / import
// ===========================================================================

#[test]
fn startup_then_export_then_import() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::copy(fixture("stored-2025.json"), store.join("entries.json")).unwrap();
    std::fs::write(store.join("dataVersion.json"), "7028").unwrap();
    std::fs::write(store.join("profiles.json"), r#"[{"id":"p-anna","name":"Anna"},{"id":"p-bo","name":"Bo"}]"#)
        .unwrap();

    let store_arg = store.to_str().unwrap();
    let roster = fixture("roster-2026.toml");

    let first = melorate()
        .args(["startup", "--store", store_arg, "--roster", &roster])
        .output()
        .expect("melorate startup");
    assert_eq!(first.status.code(), Some(3), "stderr: {}", stderr(&first));

    let second = melorate()
        .args(["startup", "--store", store_arg, "--roster", &roster])
        .output()
        .expect("melorate startup");
    assert!(second.status.success());
    assert!(stderr(&second).contains("up to date"));

    let export_path = dir.path().join("export.json");
    let export = melorate()
        .args(["export", "--store", store_arg, "-o", export_path.to_str().unwrap()])
        .output()
        .expect("melorate export");
    assert!(export.status.success(), "stderr: {}", stderr(&export));

    let import = melorate()
        .args(["import", export_path.to_str().unwrap(), "--store", store_arg, "--dry-run"])
        .output()
        .expect("melorate import");
    assert!(import.status.success(), "stderr: {}", stderr(&import));
    assert!(stderr(&import).contains("imported 8 ratings, skipped 0"));
}

#[test]
fn import_into_empty_store_is_usage_error() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("doc.json");
    std::fs::write(&doc, r#"{"formatVersion":1,"dataVersion":1,"exportedAt":"2026-03-01T10:00:00Z"}"#).unwrap();

    let output = melorate()
        .args(["import", doc.to_str().unwrap(), "--store", dir.path().join("empty").to_str().unwrap()])
        .output()
        .expect("melorate import");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("hint:"));
}
