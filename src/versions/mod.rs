//! Version bookkeeping shared by products and stemcells
//!
//! - **fingerprint**: composite `version#fingerprint` identifiers
//! - **cutter**: "what's new since the marker" prefixes over ordered lists

pub mod cutter;
pub mod fingerprint;

pub use cutter::{reverse, since, since_release};
pub use fingerprint::{FINGERPRINT_DELIMITER, decode, encode};
