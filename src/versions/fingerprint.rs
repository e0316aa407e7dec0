//! Composite version codec
//!
//! Catalog version strings are not unique: a release can be re-published under
//! the same version. The resource therefore reports `version#fingerprint`,
//! where the fingerprint is the release's files-updated timestamp.
//!
//! Encoding drops the delimiter when the fingerprint is empty, and decoding
//! requires exactly one delimiter. A bare version is a valid encode output but
//! not a valid decode input.

use crate::core::error::{ResourceError, ResourceResult};

/// Separates the version from its fingerprint
pub const FINGERPRINT_DELIMITER: char = '#';

/// Combine a version and fingerprint into a composite version
pub fn encode(version: &str, fingerprint: &str) -> String {
  if fingerprint.is_empty() {
    return version.to_string();
  }
  format!("{}{}{}", version, FINGERPRINT_DELIMITER, fingerprint)
}

/// Split a composite version into `(version, fingerprint)`
///
/// Fails with [`ResourceError::MalformedVersion`] unless the input holds
/// exactly one `#`. Either side may be empty.
pub fn decode(composite: &str) -> ResourceResult<(&str, &str)> {
  let mut parts = composite.split(FINGERPRINT_DELIMITER);
  match (parts.next(), parts.next(), parts.next()) {
    (Some(version), Some(fingerprint), None) => Ok((version, fingerprint)),
    _ => Err(ResourceError::MalformedVersion {
      value: composite.to_string(),
    }),
  }
}
