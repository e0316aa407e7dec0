//! Release filtering
//!
//! Both filters keep the relative order of the releases they retain, and an
//! empty result is not an error.

use crate::core::error::ResourceResult;
use crate::release::model::{Release, ReleaseType};
use std::fmt;

/// Strategy for narrowing a release list
pub trait Filter {
  /// Keep releases whose type equals `release_type` exactly
  fn by_release_type(&self, releases: Vec<Release>, release_type: &ReleaseType) -> ResourceResult<Vec<Release>>;

  /// Keep releases whose version contains `version`
  fn by_version(&self, releases: Vec<Release>, version: &str) -> ResourceResult<Vec<Release>>;
}

/// Default filter: exact type match, case-sensitive version containment
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseFilter;

impl Filter for ReleaseFilter {
  fn by_release_type(&self, releases: Vec<Release>, release_type: &ReleaseType) -> ResourceResult<Vec<Release>> {
    Ok(releases.into_iter().filter(|r| &r.release_type == release_type).collect())
  }

  fn by_version(&self, releases: Vec<Release>, version: &str) -> ResourceResult<Vec<Release>> {
    Ok(releases.into_iter().filter(|r| r.version.contains(version)).collect())
  }
}

/// A single filtering criterion from the resource source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleasePredicate {
  ByType(ReleaseType),
  ByVersion(String),
}

impl ReleasePredicate {
  /// Run this predicate through `filter`
  ///
  /// Errors from the filter are returned unchanged.
  pub fn apply(&self, filter: &dyn Filter, releases: Vec<Release>) -> ResourceResult<Vec<Release>> {
    match self {
      ReleasePredicate::ByType(release_type) => filter.by_release_type(releases, release_type),
      ReleasePredicate::ByVersion(version) => filter.by_version(releases, version),
    }
  }
}

impl fmt::Display for ReleasePredicate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleasePredicate::ByType(release_type) => write!(f, "release type: '{}'", release_type),
      ReleasePredicate::ByVersion(version) => write!(f, "product version: '{}'", version),
    }
  }
}
