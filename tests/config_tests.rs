//! Configuration loading from files and the environment.

use std::io::Write;

use sheetquote::config::{Config, ENV_CREDENTIALS, ENV_SPREADSHEET_ID};
use sheetquote::error::{ConfigError, Error};

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("sheetquote-config-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn loads_a_full_config_file() {
    let file = write_temp_config(
        r#"
[sheets]
credentials_path = "/tmp/key.json"
spreadsheet_id = "1AbcDef"
sheet_name = "quotes"

[cache]
ttl_secs = 120
capacity = 500

[pool]
columns = 5

[retry]
read_attempts = 4
backoff_unit_ms = 250

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.sheets.sheet_name, "quotes");
    assert_eq!(config.cache.ttl_secs, 120);
    assert_eq!(config.cache.capacity, 500);
    assert_eq!(config.pool.columns, 5);
    assert_eq!(config.retry.read_attempts, 4);
    assert_eq!(config.retry.backoff_unit_ms, 250);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn missing_file_is_a_read_error() {
    match Config::load("/definitely/not/here.toml") {
        Err(Error::Config(ConfigError::ReadFile(_))) => {}
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_temp_config("this is not toml [");
    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::Parse(_))) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn invalid_pool_size_is_rejected_at_load() {
    let file = write_temp_config(
        r#"
[sheets]
credentials_path = "/tmp/key.json"
spreadsheet_id = "1AbcDef"

[pool]
columns = 9
"#,
    );
    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "pool.columns",
            ..
        })) => {}
        other => panic!("expected invalid pool.columns, got {other:?}"),
    }
}

// The other tests in this binary never assert on the two overridable
// fields, so the temporary mutation cannot race them into failure.
#[test]
fn environment_overrides_credentials_and_spreadsheet() {
    std::env::set_var(ENV_CREDENTIALS, "/env/key.json");
    std::env::set_var(ENV_SPREADSHEET_ID, "env-sheet-id");

    let config = Config::parse_toml(
        r#"
[sheets]
credentials_path = "/file/key.json"
spreadsheet_id = "file-sheet-id"
"#,
    )
    .unwrap();

    // With both values coming from the environment, an empty file is a
    // complete configuration.
    let env_only = Config::parse_toml("");

    std::env::remove_var(ENV_CREDENTIALS);
    std::env::remove_var(ENV_SPREADSHEET_ID);

    assert_eq!(config.sheets.credentials_path, "/env/key.json");
    assert_eq!(config.sheets.spreadsheet_id, "env-sheet-id");

    let env_only = env_only.unwrap();
    assert_eq!(env_only.sheets.credentials_path, "/env/key.json");
    assert_eq!(env_only.sheets.sheet_name, "price");
}
