//! Binary-level checks: argument parsing and startup failures.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("sheetquote-cli-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn help_describes_the_lookup() {
    Command::cargo_bin("sheetquote")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ticker symbols to resolve"));
}

#[test]
fn missing_tickers_is_a_usage_error() {
    Command::cargo_bin("sheetquote")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_config_file_exits_nonzero() {
    Command::cargo_bin("sheetquote")
        .unwrap()
        .args(["--config", "/definitely/not/here.toml", "VTI"])
        .env_remove("GOOGLE_SHEETS_CREDENTIALS")
        .env_remove("GOOGLE_SHEETS_ID")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn unreadable_credentials_exit_nonzero() {
    let config = write_temp_config(
        r#"
[sheets]
credentials_path = "/definitely/not/here.json"
spreadsheet_id = "1AbcDef"
"#,
    );

    Command::cargo_bin("sheetquote")
        .unwrap()
        .arg("--config")
        .arg(config.path())
        .arg("VTI")
        .env_remove("GOOGLE_SHEETS_CREDENTIALS")
        .env_remove("GOOGLE_SHEETS_ID")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to build client"));
}
