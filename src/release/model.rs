//! Release records as delivered by the catalog
//!
//! Records are built from a catalog response at the start of a check and are
//! never mutated afterwards.

use crate::versions::fingerprint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog-unique release identifier
pub type ReleaseId = u64;

/// Release type tag (e.g. "Major Release", "Security Release")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseType(String);

impl ReleaseType {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ReleaseType {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for ReleaseType {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl fmt::Display for ReleaseType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// One published version of a product or stemcell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
  pub id: ReleaseId,

  /// Human version string; not unique across re-published releases
  pub version: String,

  pub release_type: ReleaseType,

  /// Opaque, sortable timestamp of the last change to the release files.
  /// Doubles as the release's fingerprint.
  #[serde(rename = "software_files_updated_at", default)]
  pub last_updated_at: String,
}

impl Release {
  pub fn new(
    id: ReleaseId,
    version: impl Into<String>,
    release_type: ReleaseType,
    last_updated_at: impl Into<String>,
  ) -> Self {
    Self {
      id,
      version: version.into(),
      release_type,
      last_updated_at: last_updated_at.into(),
    }
  }

  /// `version#fingerprint` identifier reported to the pipeline
  pub fn composite_version(&self) -> String {
    fingerprint::encode(&self.version, &self.last_updated_at)
  }
}

/// A release another release depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDependency {
  pub release_id: ReleaseId,
  pub version: String,
  /// Slug of the product that owns the dependency release
  pub product_slug: String,
}

impl ReleaseDependency {
  /// Whether the dependency belongs to the family named by `family_slug`
  ///
  /// Families are matched by containment so that variant slugs
  /// (`stemcells-ubuntu-xenial`) match their family (`stemcells`).
  pub fn belongs_to(&self, family_slug: &str) -> bool {
    self.product_slug.contains(family_slug)
  }
}
