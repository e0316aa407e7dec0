//! Test helpers for integration tests

use anyhow::{Context, Result};
use product_stemcell_resource::catalog::Catalog;
use product_stemcell_resource::core::error::{CatalogError, ResourceResult};
use product_stemcell_resource::release::{Release, ReleaseDependency, ReleaseId, ReleaseType};
use product_stemcell_resource::{CheckRequest, Source, VersionPair};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

pub const PRODUCT_SLUG: &str = "some-product";
pub const STEMCELL_FAMILY: &str = "stemcells";
pub const STEMCELL_SLUG: &str = "stemcells-ubuntu-xenial";

/// Catalog call that should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
  ReleaseTypes,
  Releases,
  Dependencies,
  ReleaseLookup,
}

/// In-memory catalog that records every call made against it
pub struct FixtureCatalog {
  pub release_types: Vec<ReleaseType>,
  pub products: Vec<Release>,
  pub stemcells: Vec<Release>,
  pub dependencies: HashMap<ReleaseId, Vec<ReleaseDependency>>,
  pub fail_on: Option<FailOn>,
  pub release_list_calls: RefCell<usize>,
  pub dependency_calls: RefCell<Vec<ReleaseId>>,
  pub release_lookups: RefCell<Vec<String>>,
}

impl FixtureCatalog {
  /// Three product releases, each depending on one stemcell
  ///
  /// | id | product | updated | stemcell      |
  /// |----|---------|---------|---------------|
  /// | 1  | 1.2.3   | time1   | 100.21#time1  |
  /// | 2  | 2.3.4   | time2   | 210.97#time2  |
  /// | 3  | 1.2.4   | time3   | 150.64#time3  |
  pub fn standard() -> Self {
    let release_types = vec![
      ReleaseType::from("foo release"),
      ReleaseType::from("bar"),
      ReleaseType::from("third release type"),
    ];

    let products = vec![
      Release::new(1, "1.2.3", release_types[0].clone(), "time1"),
      Release::new(2, "2.3.4", release_types[1].clone(), "time2"),
      Release::new(3, "1.2.4", release_types[2].clone(), "time3"),
    ];

    let stemcells = vec![
      Release::new(11, "100.21", release_types[0].clone(), "time1"),
      Release::new(12, "210.97", release_types[1].clone(), "time2"),
      Release::new(13, "150.64", release_types[2].clone(), "time3"),
    ];

    Self {
      release_types,
      products,
      stemcells,
      dependencies: HashMap::new(),
      fail_on: None,
      release_list_calls: RefCell::new(0),
      dependency_calls: RefCell::new(Vec::new()),
      release_lookups: RefCell::new(Vec::new()),
    }
    .depends_on(1, &["100.21"])
    .depends_on(2, &["210.97"])
    .depends_on(3, &["150.64"])
  }

  /// Replace the stemcell dependencies of a product release
  ///
  /// An unrelated tile dependency is always declared alongside the stemcells.
  pub fn depends_on(mut self, release_id: ReleaseId, stemcell_versions: &[&str]) -> Self {
    let mut deps: Vec<ReleaseDependency> = stemcell_versions
      .iter()
      .map(|version| dependency(STEMCELL_SLUG, version))
      .collect();
    deps.insert(0, dependency("p-redis", "1.14.2"));
    self.dependencies.insert(release_id, deps);
    self
  }

  pub fn with_products(mut self, products: Vec<Release>) -> Self {
    self.products = products;
    self
  }

  pub fn failing(mut self, fail_on: FailOn) -> Self {
    self.fail_on = Some(fail_on);
    self
  }

  pub fn product(&self, version: &str) -> Release {
    self
      .products
      .iter()
      .find(|r| r.version == version)
      .cloned()
      .unwrap_or_else(|| panic!("no product fixture {}", version))
  }

  fn fail(&self, call: FailOn) -> ResourceResult<()> {
    if self.fail_on == Some(call) {
      return Err(
        CatalogError::Status {
          url: format!("https://catalog.test/{:?}", call),
          status: 500,
          body: "some error".to_string(),
        }
        .into(),
      );
    }
    Ok(())
  }
}

impl Catalog for FixtureCatalog {
  fn release_types(&self) -> ResourceResult<Vec<ReleaseType>> {
    self.fail(FailOn::ReleaseTypes)?;
    Ok(self.release_types.clone())
  }

  fn releases_for_product(&self, product_slug: &str) -> ResourceResult<Vec<Release>> {
    assert_eq!(product_slug, PRODUCT_SLUG);
    *self.release_list_calls.borrow_mut() += 1;
    self.fail(FailOn::Releases)?;
    Ok(self.products.clone())
  }

  fn release_dependencies(&self, product_slug: &str, release_id: ReleaseId) -> ResourceResult<Vec<ReleaseDependency>> {
    assert_eq!(product_slug, PRODUCT_SLUG);
    self.dependency_calls.borrow_mut().push(release_id);
    self.fail(FailOn::Dependencies)?;
    Ok(self.dependencies.get(&release_id).cloned().unwrap_or_default())
  }

  fn release_by_version(&self, product_slug: &str, version: &str) -> ResourceResult<Release> {
    assert_eq!(product_slug, STEMCELL_FAMILY);
    self.release_lookups.borrow_mut().push(version.to_string());
    self.fail(FailOn::ReleaseLookup)?;
    self.stemcells.iter().find(|r| r.version == version).cloned().ok_or_else(|| {
      CatalogError::ReleaseNotFound {
        product_slug: product_slug.to_string(),
        version: version.to_string(),
      }
      .into()
    })
  }
}

fn dependency(slug: &str, version: &str) -> ReleaseDependency {
  ReleaseDependency {
    release_id: 100,
    version: version.to_string(),
    product_slug: slug.to_string(),
  }
}

/// Check request for the fixture catalog
pub fn request(last_seen: Option<(&str, &str)>) -> CheckRequest {
  CheckRequest {
    source: Source {
      api_token: "some-api-token".to_string(),
      product_slug: PRODUCT_SLUG.to_string(),
      stemcell_slug: STEMCELL_FAMILY.to_string(),
      ..Default::default()
    },
    version: last_seen.map(|(product, stemcell)| VersionPair::new(product, stemcell)),
  }
}

/// Pairs as plain tuples for compact assertions
pub fn pairs(response: &[VersionPair]) -> Vec<(&str, &str)> {
  response
    .iter()
    .map(|p| (p.product_version.as_str(), p.stemcell_version.as_str()))
    .collect()
}

/// Run the check binary, feeding `stdin` to it
///
/// Unlike most helpers this does not fail on a non-zero exit: callers inspect
/// the status themselves.
pub fn run_check(cwd: &Path, args: &[&str], stdin: &str) -> Result<Output> {
  let check_bin = env!("CARGO_BIN_EXE_check");

  let mut child = Command::new(check_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to run check")?;

  child
    .stdin
    .take()
    .context("check stdin was not piped")?
    .write_all(stdin.as_bytes())?;

  Ok(child.wait_with_output()?)
}
