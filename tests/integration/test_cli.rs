//! Tests for the `check` binary's request handling and exit codes

use crate::helpers::run_check;
use anyhow::Result;
use tempfile::TempDir;

const VALID_SOURCE: &str = r#"{
  "source": {
    "api_token": "some-api-token",
    "product_slug": "some-product",
    "stemcell_slug": "stemcells"
  },
  "version": null
}"#;

fn stderr(output: &std::process::Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_version_flag() -> Result<()> {
  let temp = TempDir::new()?;
  let output = run_check(temp.path(), &["--version"], "")?;

  assert!(output.status.success());
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
  Ok(())
}

#[test]
fn test_missing_api_token_is_user_error() -> Result<()> {
  let temp = TempDir::new()?;
  let request = r#"{"source": {"product_slug": "some-product", "stemcell_slug": "stemcells"}}"#;

  let output = run_check(temp.path(), &[], request)?;

  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());
  let stderr = stderr(&output);
  assert!(stderr.contains("api_token must be provided"), "stderr: {}", stderr);
  assert!(stderr.contains("Help:"), "stderr: {}", stderr);
  Ok(())
}

#[test]
fn test_missing_stemcell_slug_is_user_error() -> Result<()> {
  let temp = TempDir::new()?;
  let request = r#"{"source": {"api_token": "some-api-token", "product_slug": "some-product"}}"#;

  let output = run_check(temp.path(), &[], request)?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("stemcell_slug must be provided"));
  Ok(())
}

#[test]
fn test_invalid_json_is_user_error() -> Result<()> {
  let temp = TempDir::new()?;

  let output = run_check(temp.path(), &[], "{not json")?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("JSON error"));
  Ok(())
}

#[test]
fn test_unknown_sort_by_is_rejected() -> Result<()> {
  let temp = TempDir::new()?;
  let request = r#"{"source": {"api_token": "t", "product_slug": "p", "stemcell_slug": "s", "sort_by": "alphabetical"}}"#;

  let output = run_check(temp.path(), &[], request)?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("alphabetical"));
  Ok(())
}

#[test]
fn test_invalid_endpoint_override() -> Result<()> {
  let temp = TempDir::new()?;

  let output = run_check(temp.path(), &["--endpoint", "not a url"], VALID_SOURCE)?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("invalid endpoint: not a url"));
  Ok(())
}

#[test]
fn test_unreachable_catalog_is_system_error() -> Result<()> {
  let temp = TempDir::new()?;

  let output = run_check(temp.path(), &["--endpoint", "http://127.0.0.1:1"], VALID_SOURCE)?;

  assert_eq!(output.status.code(), Some(2));
  assert!(output.stdout.is_empty());
  assert!(stderr(&output).contains("request to http://127.0.0.1:1/api/v2/releases/release_types failed"));
  Ok(())
}

#[test]
fn test_request_from_file() -> Result<()> {
  let temp = TempDir::new()?;
  let request_path = temp.path().join("request.json");
  std::fs::write(&request_path, r#"{"source": {"api_token": "some-api-token"}}"#)?;

  let output = run_check(temp.path(), &["--request", "request.json"], "")?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("product_slug must be provided"));
  Ok(())
}

#[test]
fn test_missing_request_file() -> Result<()> {
  let temp = TempDir::new()?;

  let output = run_check(temp.path(), &["--request", "missing.json"], "")?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = stderr(&output);
  assert!(stderr.contains("Failed to read request from missing.json"), "stderr: {}", stderr);
  assert!(stderr.contains("--request"));
  Ok(())
}
