//! Release catalog access
//!
//! The check only needs four questions answered by the catalog. [`Catalog`]
//! captures them so the reconciliation logic can run against the real HTTP
//! client ([`pivnet::PivnetClient`]) or an in-memory fixture.

pub mod pivnet;

use crate::core::error::ResourceResult;
use crate::release::{Release, ReleaseDependency, ReleaseId, ReleaseType};

pub use pivnet::{PivnetClient, PivnetConfig};

/// Read-only view of the release catalog
pub trait Catalog {
  /// All release types the catalog currently knows
  fn release_types(&self) -> ResourceResult<Vec<ReleaseType>>;

  /// All releases of a product, in catalog order
  fn releases_for_product(&self, product_slug: &str) -> ResourceResult<Vec<Release>>;

  /// Declared dependencies of one release
  fn release_dependencies(&self, product_slug: &str, release_id: ReleaseId) -> ResourceResult<Vec<ReleaseDependency>>;

  /// The release of `product_slug` carrying exactly `version`
  fn release_by_version(&self, product_slug: &str, version: &str) -> ResourceResult<Release>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
  fn release_types(&self) -> ResourceResult<Vec<ReleaseType>> {
    (**self).release_types()
  }

  fn releases_for_product(&self, product_slug: &str) -> ResourceResult<Vec<Release>> {
    (**self).releases_for_product(product_slug)
  }

  fn release_dependencies(&self, product_slug: &str, release_id: ReleaseId) -> ResourceResult<Vec<ReleaseDependency>> {
    (**self).release_dependencies(product_slug, release_id)
  }

  fn release_by_version(&self, product_slug: &str, version: &str) -> ResourceResult<Release> {
    (**self).release_by_version(product_slug, version)
  }
}
