use crate::core::error::{ConfigError, ResourceResult};
use crate::release::SortBy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog endpoint used when `source.endpoint` is empty
pub const DEFAULT_ENDPOINT: &str = "https://network.pivotal.io";

/// Resource configuration supplied by the pipeline under `source:`
///
/// Keys consumed by other steps of the resource (e.g. `copy_metadata`) are
/// accepted and ignored here.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Source {
  /// Catalog API token (legacy token or UAA refresh token)
  #[serde(default)]
  pub api_token: String,

  /// Product whose releases are tracked
  #[serde(default)]
  pub product_slug: String,

  /// Stemcell family slug, matched by containment against dependency slugs
  #[serde(default)]
  pub stemcell_slug: String,

  /// Keep only product releases whose version contains this string
  #[serde(default)]
  pub product_version: String,

  /// Keep only product releases of exactly this release type
  #[serde(default)]
  pub release_type: String,

  /// Ordering applied to product and stemcell releases
  #[serde(default)]
  pub sort_by: SortBy,

  /// Catalog base URL (default: network.pivotal.io)
  #[serde(default)]
  pub endpoint: String,

  #[serde(default)]
  pub skip_ssl_verification: bool,

  /// Log at debug level
  #[serde(default)]
  pub verbose: bool,
}

impl Source {
  /// Endpoint to talk to, falling back to the public catalog
  pub fn endpoint(&self) -> &str {
    if self.endpoint.is_empty() {
      DEFAULT_ENDPOINT
    } else {
      &self.endpoint
    }
  }
}

// Keeps the API token out of logs.
impl fmt::Debug for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let token = if self.api_token.is_empty() { "" } else { "***REDACTED***" };
    f.debug_struct("Source")
      .field("api_token", &token)
      .field("product_slug", &self.product_slug)
      .field("stemcell_slug", &self.stemcell_slug)
      .field("product_version", &self.product_version)
      .field("release_type", &self.release_type)
      .field("sort_by", &self.sort_by)
      .field("endpoint", &self.endpoint())
      .field("skip_ssl_verification", &self.skip_ssl_verification)
      .field("verbose", &self.verbose)
      .finish()
  }
}

/// A (product, stemcell) pair of composite versions
///
/// This is the unit of "version" the pipeline checkpoints between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPair {
  #[serde(default)]
  pub product_version: String,
  #[serde(default)]
  pub stemcell_version: String,
}

impl VersionPair {
  pub fn new(product_version: impl Into<String>, stemcell_version: impl Into<String>) -> Self {
    Self {
      product_version: product_version.into(),
      stemcell_version: stemcell_version.into(),
    }
  }
}

/// Request body read by the `check` binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckRequest {
  pub source: Source,
  /// Last version pair the pipeline saw; `null` on the first run
  #[serde(default)]
  pub version: Option<VersionPair>,
}

impl CheckRequest {
  /// Parse a request from JSON
  pub fn from_json(input: &str) -> ResourceResult<Self> {
    Ok(serde_json::from_str(input)?)
  }

  /// Last-seen pair, empty markers on the first run
  pub fn last_seen(&self) -> VersionPair {
    self.version.clone().unwrap_or_default()
  }

  /// Ensure the fields every check needs are present
  pub fn validate(&self) -> ResourceResult<()> {
    let required = [
      ("api_token", &self.source.api_token),
      ("product_slug", &self.source.product_slug),
      ("stemcell_slug", &self.source.stemcell_slug),
    ];

    for (field, value) in required {
      if value.is_empty() {
        return Err(
          ConfigError::MissingField {
            field: field.to_string(),
          }
          .into(),
        );
      }
    }

    Ok(())
  }
}

/// Response body written by the `check` binary, newest pair first
pub type CheckResponse = Vec<VersionPair>;
