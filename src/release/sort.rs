//! Release ordering
//!
//! Both orderings are ascending and stable: releases that compare equal keep
//! their catalog order.

use crate::core::error::{ResourceError, ResourceResult};
use crate::release::model::Release;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering policy from the resource source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
  /// Keep the order the catalog delivered
  #[default]
  #[serde(alias = "")]
  None,
  /// Semantic version precedence
  Semver,
  /// Last-updated timestamp
  LastUpdated,
}

impl SortBy {
  /// Order `releases` according to this policy
  ///
  /// `None` hands the releases back without consulting the sorter. Sorter
  /// errors are returned unchanged.
  pub fn apply(self, sorter: &dyn Sorter, releases: Vec<Release>) -> ResourceResult<Vec<Release>> {
    match self {
      SortBy::None => Ok(releases),
      SortBy::Semver => sorter.by_semver(releases),
      SortBy::LastUpdated => sorter.by_last_updated(releases),
    }
  }
}

impl fmt::Display for SortBy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SortBy::None => write!(f, "catalog order"),
      SortBy::Semver => write!(f, "semver"),
      SortBy::LastUpdated => write!(f, "release date"),
    }
  }
}

/// Strategy for ordering a release list
pub trait Sorter {
  /// Ascending by semantic version; fails if any version cannot be parsed
  fn by_semver(&self, releases: Vec<Release>) -> ResourceResult<Vec<Release>>;

  /// Ascending by last-updated timestamp
  fn by_last_updated(&self, releases: Vec<Release>) -> ResourceResult<Vec<Release>>;
}

/// Default sorter
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseSorter;

impl Sorter for ReleaseSorter {
  fn by_semver(&self, releases: Vec<Release>) -> ResourceResult<Vec<Release>> {
    let mut keyed = releases
      .into_iter()
      .map(|release| match to_semver(&release.version) {
        Ok(version) => Ok((version, release)),
        Err(e) => Err(ResourceError::sort(format!(
          "could not parse version '{}' of release {} as semver: {}",
          release.version, release.id, e
        ))),
      })
      .collect::<ResourceResult<Vec<_>>>()?;

    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(keyed.into_iter().map(|(_, release)| release).collect())
  }

  fn by_last_updated(&self, mut releases: Vec<Release>) -> ResourceResult<Vec<Release>> {
    let parsed: Option<Vec<DateTime<FixedOffset>>> = releases
      .iter()
      .map(|r| DateTime::parse_from_rfc3339(&r.last_updated_at).ok())
      .collect();

    match parsed {
      Some(instants) => {
        let mut keyed: Vec<_> = instants.into_iter().zip(releases).collect();
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(keyed.into_iter().map(|(_, release)| release).collect())
      }
      // Not all timestamps are RFC 3339: fall back to comparing the raw tokens
      None => {
        releases.sort_by(|a, b| a.last_updated_at.cmp(&b.last_updated_at));
        Ok(releases)
      }
    }
  }
}

/// Parse a catalog version as semver, padding missing minor/patch components
///
/// Stemcell versions such as `"100.21"` or `"3586"` are not strict semver.
/// Any pre-release or build suffix is kept.
pub fn to_semver(raw: &str) -> Result<semver::Version, semver::Error> {
  let strict_err = match semver::Version::parse(raw) {
    Ok(version) => return Ok(version),
    Err(e) => e,
  };

  let split = raw.find(['-', '+']).unwrap_or(raw.len());
  let (core, suffix) = raw.split_at(split);
  let padding = match core.split('.').count() {
    1 => ".0.0",
    2 => ".0",
    _ => return Err(strict_err),
  };

  semver::Version::parse(&format!("{}{}{}", core, padding, suffix)).map_err(|_| strict_err)
}
