//! Integration tests for `resolvent defaults` and `resolvent version`.

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "resolvent-cli", "--bin", "resolvent", "--"]);
    cmd
}

#[test]
fn test_defaults_all_rows_json() {
    let output = cargo_bin()
        .args(["--json", "defaults"])
        .output()
        .expect("Failed to run defaults");

    assert!(output.status.success(), "Should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Should be valid JSON");

    assert_eq!(json["schema_version"].as_u64(), Some(1));

    let rows = json["rows"].as_array().expect("Should have rows array");
    assert_eq!(rows.len(), 6, "Three platforms x two formats");

    // Spot-check the browser/esm row
    let row = rows
        .iter()
        .find(|r| r["platform"].as_str() == Some("browser") && r["format"].as_str() == Some("esm"))
        .expect("Should include browser/esm");

    let fields: Vec<&str> = row["main_fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(fields, vec!["browser", "module", "main"]);

    let conditions: Vec<&str> = row["conditions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(conditions, vec!["browser", "import", "default"]);
}

#[test]
fn test_defaults_single_target_json() {
    let output = cargo_bin()
        .args([
            "--json",
            "defaults",
            "--platform",
            "node",
            "--format",
            "cjs",
        ])
        .output()
        .expect("Failed to run defaults");

    assert!(output.status.success(), "Should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Should be valid JSON");

    let rows = json["rows"].as_array().expect("Should have rows array");
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row["platform"].as_str(), Some("node"));
    assert_eq!(row["format"].as_str(), Some("cjs"));

    let fields: Vec<&str> = row["main_fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(fields, vec!["main", "module"]);

    let conditions: Vec<&str> = row["conditions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(conditions, vec!["node", "require", "default"]);
}

#[test]
fn test_defaults_platform_requires_format() {
    let output = cargo_bin()
        .args(["defaults", "--platform", "node"])
        .output()
        .expect("Failed to run defaults");

    assert!(!output.status.success(), "Should reject a lone --platform");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_defaults_rejects_unknown_format() {
    let output = cargo_bin()
        .args(["defaults", "--platform", "node", "--format", "umd"])
        .output()
        .expect("Failed to run defaults");

    assert_eq!(output.status.code(), Some(2), "Should exit with code 2");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unknown format"),
        "Should report the bad flag: {stderr}"
    );
}

#[test]
fn test_version_prints_package_version() {
    let output = cargo_bin()
        .args(["version"])
        .output()
        .expect("Failed to run version");

    assert!(output.status.success(), "Should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Should print the crate version: {stdout}"
    );
}
