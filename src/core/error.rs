//! Error types for the resource with contextual messages and exit codes
//!
//! Every failure is fatal to a check run: nothing is retried and no partial
//! response is emitted. Errors raised by a filter, sorter or catalog are handed
//! back to the caller exactly as produced.

use std::fmt;
use std::io;

/// Exit codes for the `check` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (request, source config, unknown release type)
  User = 1,
  /// System error (catalog, network, I/O)
  System = 2,
  /// Reconciliation failure (nothing matched, unsortable versions)
  Reconcile = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for the resource
#[derive(Debug)]
pub enum ResourceError {
  /// Request/source configuration errors
  Config(ConfigError),

  /// Release catalog failures
  Catalog(CatalogError),

  /// `release_type` is not one the catalog knows about
  InvalidReleaseType { provided: String, valid: Vec<String> },

  /// Composite version did not contain exactly one `#`
  MalformedVersion { value: String },

  /// Raised by a release filter
  Filter { message: String },

  /// Raised by a release sorter
  Sort { message: String },

  /// Filtering left no product releases
  NoMatchingProductRelease,

  /// A new product release resolved to zero stemcell releases
  NoMatchingStemcellRelease { product_version: String },

  /// I/O errors
  Io(io::Error),

  /// JSON (de)serialization errors
  Json(serde_json::Error),

  /// Generic error with message and optional help
  Message { message: String, help: Option<String> },
}

impl ResourceError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ResourceError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ResourceError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Create a filter error
  pub fn filter(msg: impl Into<String>) -> Self {
    ResourceError::Filter { message: msg.into() }
  }

  /// Create a sort error
  pub fn sort(msg: impl Into<String>) -> Self {
    ResourceError::Sort { message: msg.into() }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ResourceError::Config(_) => ExitCode::User,
      ResourceError::InvalidReleaseType { .. } => ExitCode::User,
      ResourceError::MalformedVersion { .. } => ExitCode::User,
      ResourceError::Json(_) => ExitCode::User,
      ResourceError::Message { .. } => ExitCode::User,
      ResourceError::Catalog(_) => ExitCode::System,
      ResourceError::Io(_) => ExitCode::System,
      ResourceError::Filter { .. }
      | ResourceError::Sort { .. }
      | ResourceError::NoMatchingProductRelease
      | ResourceError::NoMatchingStemcellRelease { .. } => ExitCode::Reconcile,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ResourceError::Config(e) => e.help_message(),
      ResourceError::Catalog(e) => e.help_message(),
      ResourceError::NoMatchingProductRelease => {
        Some("Check `release_type` and `product_version` in the resource source.".to_string())
      }
      ResourceError::NoMatchingStemcellRelease { .. } => {
        Some("Check that `stemcell_slug` matches the product's declared stemcell dependency.".to_string())
      }
      ResourceError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ResourceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResourceError::Config(e) => write!(f, "{}", e),
      ResourceError::Catalog(e) => write!(f, "{}", e),
      ResourceError::InvalidReleaseType { provided, valid } => {
        write!(
          f,
          "provided release type: '{}' must be one of: ['{}']",
          provided,
          valid.join("', '")
        )
      }
      ResourceError::MalformedVersion { value } => {
        write!(f, "Invalid version and fingerprint: {}", value)
      }
      ResourceError::Filter { message } => write!(f, "{}", message),
      ResourceError::Sort { message } => write!(f, "{}", message),
      ResourceError::NoMatchingProductRelease => write!(f, "cannot find specified product release"),
      ResourceError::NoMatchingStemcellRelease { product_version } => {
        write!(f, "cannot find specified stemcell release for product version '{}'", product_version)
      }
      ResourceError::Io(e) => write!(f, "I/O error: {}", e),
      ResourceError::Json(e) => write!(f, "JSON error: {}", e),
      ResourceError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for ResourceError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ResourceError::Io(e) => Some(e),
      ResourceError::Json(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ResourceError {
  fn from(err: io::Error) -> Self {
    ResourceError::Io(err)
  }
}

impl From<serde_json::Error> for ResourceError {
  fn from(err: serde_json::Error) -> Self {
    ResourceError::Json(err)
  }
}

impl From<CatalogError> for ResourceError {
  fn from(err: CatalogError) -> Self {
    ResourceError::Catalog(err)
  }
}

impl From<ConfigError> for ResourceError {
  fn from(err: ConfigError) -> Self {
    ResourceError::Config(err)
  }
}

impl From<anyhow::Error> for ResourceError {
  fn from(err: anyhow::Error) -> Self {
    ResourceError::message(err.to_string())
  }
}

/// Request/source configuration errors
#[derive(Debug)]
pub enum ConfigError {
  /// Missing required source field
  MissingField { field: String },

  /// Endpoint could not be used as a base URL
  InvalidEndpoint { endpoint: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { field } => Some(format!("Set `{}` under `source:` in the resource definition.", field)),
      ConfigError::InvalidEndpoint { .. } => {
        Some("The endpoint must be an absolute http(s) URL, e.g. https://network.pivotal.io".to_string())
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingField { field } => write!(f, "{} must be provided", field),
      ConfigError::InvalidEndpoint { endpoint } => write!(f, "invalid endpoint: {}", endpoint),
    }
  }
}

/// Release catalog errors
#[derive(Debug)]
pub enum CatalogError {
  /// Request never produced a response
  Transport { url: String, message: String },

  /// Catalog answered with a non-success status
  Status { url: String, status: u16, body: String },

  /// Response body could not be decoded
  Decode { url: String, message: String },

  /// No release of `product_slug` carries `version`
  ReleaseNotFound { product_slug: String, version: String },
}

impl CatalogError {
  fn help_message(&self) -> Option<String> {
    match self {
      CatalogError::Status { status: 401 | 403, .. } => {
        Some("Check that `api_token` is a valid, unexpired catalog token.".to_string())
      }
      CatalogError::Transport { .. } => {
        Some("Check `endpoint` and network access; set `skip_ssl_verification` for self-signed endpoints.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for CatalogError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CatalogError::Transport { url, message } => write!(f, "request to {} failed: {}", url, message),
      CatalogError::Status { url, status, body } => {
        write!(f, "catalog returned HTTP {} for {}", status, url)?;
        if !body.is_empty() {
          write!(f, ": {}", body)?;
        }
        Ok(())
      }
      CatalogError::Decode { url, message } => write!(f, "could not decode response from {}: {}", url, message),
      CatalogError::ReleaseNotFound { product_slug, version } => {
        write!(f, "release not found for '{}' with version: '{}'", product_slug, version)
      }
    }
  }
}

/// Result type alias for the resource
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Print an error to stderr with help text
pub fn print_error(error: &ResourceError) {
  eprintln!("\nExiting with error: {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("Help: {}\n", help);
  }
}
