//! Sequence cutting: find what is new since a previously seen marker
//!
//! Lists are scanned in the order given. When the marker is found, everything
//! up to and including it is new. When it is not found (first run, or the
//! marked release disappeared upstream) only the first element is reported.

use crate::release::Release;

/// Prefix of `items` up to and including the first element matching `is_marker`,
/// or just the first element when nothing matches
///
/// An empty input yields an empty prefix.
pub fn cut_at<T>(items: &[T], is_marker: impl Fn(&T) -> bool) -> &[T] {
  match items.iter().position(is_marker) {
    Some(index) => &items[..=index],
    None => &items[..items.len().min(1)],
  }
}

/// Versions that are new relative to `since`
pub fn since<'a, S: AsRef<str>>(versions: &'a [S], since: &str) -> &'a [S] {
  cut_at(versions, |v| v.as_ref() == since)
}

/// Releases that are new relative to the bare version `since`
pub fn since_release<'a>(releases: &'a [Release], since: &str) -> &'a [Release] {
  cut_at(releases, |r| r.version == since)
}

/// Reversed copy of `items`
pub fn reverse<T: Clone>(items: &[T]) -> Vec<T> {
  items.iter().rev().cloned().collect()
}
