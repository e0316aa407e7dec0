//! The `check` step: discover (product, stemcell) version pairs the pipeline has not seen
//!
//! # Algorithm
//!
//! 1. Validate `release_type` against the catalog's release types
//! 2. Filter product releases by release type, then by version containment
//! 3. Sort product releases per `sort_by`
//! 4. Cut the product list at the last-seen product version
//! 5. For each new product release, resolve its stemcells, cut them at the
//!    last-seen stemcell version, fetch and sort them
//! 6. Emit one pair per (product, stemcell), newest product first and newest
//!    stemcell first within a product
//!
//! Every step is a hard stop on error. Nothing is persisted: the pipeline feeds
//! the newest emitted pair back in as the last-seen version on the next run.

pub mod resolver;

use crate::catalog::Catalog;
use crate::core::config::{CheckRequest, CheckResponse, Source, VersionPair};
use crate::core::error::{ResourceError, ResourceResult};
use crate::release::{Filter, Release, ReleaseFilter, ReleasePredicate, ReleaseSorter, ReleaseType, SortBy, Sorter};
use crate::versions::{self, fingerprint};
use resolver::StemcellCache;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Reconciles the catalog against the last-seen version pair
pub struct CheckCommand<C: Catalog> {
  catalog: C,
  filter: Box<dyn Filter>,
  sorter: Box<dyn Sorter>,
}

impl<C: Catalog> CheckCommand<C> {
  /// Create a check with the default filter and sorter
  pub fn new(catalog: C) -> Self {
    Self {
      catalog,
      filter: Box::new(ReleaseFilter),
      sorter: Box::new(ReleaseSorter),
    }
  }

  /// Replace the release filter
  pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
    self.filter = Box::new(filter);
    self
  }

  /// Replace the release sorter
  pub fn with_sorter(mut self, sorter: impl Sorter + 'static) -> Self {
    self.sorter = Box::new(sorter);
    self
  }

  /// Run the check
  pub fn run(&self, request: &CheckRequest) -> ResourceResult<CheckResponse> {
    info!("Received input, starting check");
    debug!(source = ?request.source, version = ?request.version, "check request");

    let source = &request.source;
    let last_seen = request.last_seen();

    self.validate_release_type(&source.release_type)?;

    info!("Getting all product releases");
    let mut product_releases = self.catalog.releases_for_product(&source.product_slug)?;

    for predicate in predicates(source) {
      info!("Filtering all product releases by {}", predicate);
      product_releases = predicate.apply(self.filter.as_ref(), product_releases)?;
    }

    let product_releases = self.sort(source.sort_by, product_releases, "product")?;

    if product_releases.is_empty() {
      return Err(ResourceError::NoMatchingProductRelease);
    }

    info!("Gathering new product versions");
    let last_product = last_seen_version(&last_seen.product_version);
    let new_product_releases = versions::since_release(&product_releases, last_product);

    info!("Gathering new stemcell versions");
    let last_stemcell = last_seen_version(&last_seen.stemcell_version);
    let mut cache = StemcellCache::new();
    let mut stemcells_by_product: HashMap<String, Vec<String>> = HashMap::new();

    for product_release in new_product_releases {
      let stemcells = self.new_stemcells(source, product_release, last_stemcell, &mut cache)?;
      stemcells_by_product.insert(product_release.composite_version(), stemcells);
    }

    info!("New versions: {:?}", stemcells_by_product);

    let response = pair_versions(&product_releases, &stemcells_by_product);

    info!("Finishing check and returning {} version(s)", response.len());
    Ok(response)
  }

  fn validate_release_type(&self, release_type: &str) -> ResourceResult<()> {
    info!("Validating release type: '{}'", release_type);
    let release_types = self.catalog.release_types()?;

    if release_type.is_empty() || release_types.iter().any(|t| t.as_str() == release_type) {
      return Ok(());
    }

    Err(ResourceError::InvalidReleaseType {
      provided: release_type.to_string(),
      valid: release_types.iter().map(ReleaseType::to_string).collect(),
    })
  }

  fn sort(&self, sort_by: SortBy, releases: Vec<Release>, kind: &str) -> ResourceResult<Vec<Release>> {
    if sort_by != SortBy::None {
      info!("Sorting all {} releases by {}", kind, sort_by);
    }
    sort_by.apply(self.sorter.as_ref(), releases)
  }

  /// Composite versions of the stemcells that are new for one product release,
  /// in ascending sort order
  fn new_stemcells(
    &self,
    source: &Source,
    product_release: &Release,
    last_stemcell: &str,
    cache: &mut StemcellCache,
  ) -> ResourceResult<Vec<String>> {
    info!(
      "Getting release dependencies for '{}/{}'",
      source.product_slug, product_release.version
    );
    let stemcell_versions = resolver::stemcell_versions(
      &self.catalog,
      &source.product_slug,
      product_release.id,
      &source.stemcell_slug,
    )?;

    let mut stemcells = Vec::new();
    for version in versions::since(&stemcell_versions, last_stemcell) {
      stemcells.push(cache.get_or_fetch(&self.catalog, &source.stemcell_slug, version)?);
    }

    let stemcells = self.sort(source.sort_by, stemcells, "stemcell")?;

    if stemcells.is_empty() {
      return Err(ResourceError::NoMatchingStemcellRelease {
        product_version: product_release.composite_version(),
      });
    }

    Ok(stemcells.iter().map(Release::composite_version).collect())
  }
}

/// Filters configured in the source, in application order
pub fn predicates(source: &Source) -> Vec<ReleasePredicate> {
  let mut predicates = Vec::new();
  if !source.release_type.is_empty() {
    predicates.push(ReleasePredicate::ByType(ReleaseType::from(source.release_type.as_str())));
  }
  if !source.product_version.is_empty() {
    predicates.push(ReleasePredicate::ByVersion(source.product_version.clone()));
  }
  predicates
}

/// Bare version of a last-seen composite version
///
/// Anything that does not decode (nothing seen yet, or a bare version) yields an
/// empty marker, which the cutter treats as "report only the first release".
fn last_seen_version(composite: &str) -> &str {
  match fingerprint::decode(composite) {
    Ok((version, _)) => version,
    Err(e) => {
      if !composite.is_empty() {
        warn!("Ignoring last-seen version: {}", e);
      }
      ""
    }
  }
}

/// Flatten the product → stemcells mapping into response pairs
///
/// Walks every filtered product release newest first; products that were not
/// new have no stemcells and contribute nothing.
fn pair_versions(product_releases: &[Release], stemcells_by_product: &HashMap<String, Vec<String>>) -> CheckResponse {
  let product_versions: Vec<String> = product_releases.iter().map(Release::composite_version).collect();

  let mut response = Vec::new();
  for product_version in versions::reverse(&product_versions) {
    let Some(stemcells) = stemcells_by_product.get(&product_version) else {
      continue;
    };
    for stemcell_version in versions::reverse(stemcells) {
      response.push(VersionPair::new(product_version.clone(), stemcell_version));
    }
  }
  response
}
