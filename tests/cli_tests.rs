//! CLI command tests

#[cfg(feature = "cli")]
use std::io::Write;
#[cfg(feature = "cli")]
use tempfile::NamedTempFile;
#[cfg(feature = "cli")]
use xml_records::cli::commands::check::describe_config;
#[cfg(feature = "cli")]
use xml_records::cli::commands::extract::{ExtractArgs, handle_extract};
#[cfg(feature = "cli")]
use xml_records::cli::error::CliError;

#[cfg(feature = "cli")]
fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_extract_toml_config() {
    let config = write_temp(
        ".toml",
        r#"root = "orders/order"

[[schema]]
name = "id"
type = "long"

[[schema]]
name = "placed"
type = "timestamp"
format = "%Y-%m-%d %H:%M"
timezone = "+09:00"
"#,
    );
    let input = write_temp(
        ".xml",
        "<orders><order><id>7</id><placed>2024-01-01 09:00</placed></order></orders>",
    );
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("orders.jsonl");

    let summary = handle_extract(&ExtractArgs {
        config: config.path().to_path_buf(),
        inputs: vec![input.path().to_path_buf()],
        output: Some(output.clone()),
        force: false,
    })
    .unwrap();
    assert_eq!(summary.files, 1);
    assert_eq!(summary.records, 1);

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, "{\"id\":7,\"placed\":\"2024-01-01T00:00:00Z\"}\n");
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_extract_force_overwrites() {
    let config = write_temp(".json", r#"{"root": "a/b", "schema": [{"name": "c", "type": "string"}]}"#);
    let input = write_temp(".xml", "<a><b><c>x</c></b></a>");
    let output = write_temp(".jsonl", "stale\n");

    handle_extract(&ExtractArgs {
        config: config.path().to_path_buf(),
        inputs: vec![input.path().to_path_buf()],
        output: Some(output.path().to_path_buf()),
        force: true,
    })
    .unwrap();

    let written = std::fs::read_to_string(output.path()).unwrap();
    assert_eq!(written, "{\"c\":\"x\"}\n");
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_extract_reports_malformed_xml() {
    let config = write_temp(".yaml", "root: a/b\nschema:\n  - { name: c, type: string }\n");
    let input = write_temp(".xml", "<a><b><c>x</b></a>");
    let dir = tempfile::tempdir().unwrap();

    let result = handle_extract(&ExtractArgs {
        config: config.path().to_path_buf(),
        inputs: vec![input.path().to_path_buf()],
        output: Some(dir.path().join("out.jsonl")),
        force: false,
    });
    assert!(matches!(result, Err(CliError::ExtractError(_))));
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_check_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let result = describe_config(&dir.path().join("missing.yaml"));
    assert!(matches!(result, Err(CliError::FileNotFound(_))));
}
