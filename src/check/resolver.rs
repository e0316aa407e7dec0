//! Stemcell resolution for product releases
//!
//! A product release declares its dependencies in the catalog. The stemcells
//! among them are the dependencies whose owning product slug contains the
//! configured stemcell family slug.

use crate::catalog::Catalog;
use crate::core::error::ResourceResult;
use crate::release::{Release, ReleaseId};
use std::collections::HashMap;
use tracing::info;

/// Stemcell versions a product release depends on, in catalog order
pub fn stemcell_versions(
  catalog: &dyn Catalog,
  product_slug: &str,
  release_id: ReleaseId,
  stemcell_slug: &str,
) -> ResourceResult<Vec<String>> {
  let dependencies = catalog.release_dependencies(product_slug, release_id)?;
  Ok(
    dependencies
      .into_iter()
      .filter(|dep| dep.belongs_to(stemcell_slug))
      .map(|dep| dep.version)
      .collect(),
  )
}

/// Stemcell releases already fetched during one check, keyed by version
///
/// Many product releases share a stemcell; each distinct version is looked up
/// in the catalog at most once per check.
#[derive(Debug, Default)]
pub struct StemcellCache {
  releases: HashMap<String, Release>,
}

impl StemcellCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cached release for `version`, fetching it on first use
  pub fn get_or_fetch(&mut self, catalog: &dyn Catalog, stemcell_slug: &str, version: &str) -> ResourceResult<Release> {
    if let Some(release) = self.releases.get(version) {
      return Ok(release.clone());
    }

    info!("Getting release details for '{}/{}'", stemcell_slug, version);
    let release = catalog.release_by_version(stemcell_slug, version)?;
    self.releases.insert(version.to_string(), release.clone());
    Ok(release)
  }

  #[cfg(test)]
  fn len(&self) -> usize {
    self.releases.len()
  }

  #[cfg(test)]
  fn is_empty(&self) -> bool {
    self.releases.is_empty()
  }
}
