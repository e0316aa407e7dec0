//! Concourse resource tracking paired product and stemcell releases
//!
//! Given the last (product, stemcell) version pair a pipeline saw, the `check`
//! step computes the newer pairs published in the release catalog.
//!
//! - **catalog**: the catalog interface and its HTTP client
//! - **check**: reconciliation of the catalog against the last-seen pair
//! - **core**: request types, configuration and errors
//! - **release**: release records, filtering and sorting
//! - **versions**: composite versions and "new since" cutting

pub mod catalog;
pub mod check;
pub mod core;
pub mod release;
pub mod versions;

pub use check::CheckCommand;
pub use core::config::{CheckRequest, CheckResponse, Source, VersionPair};
pub use core::error::{ResourceError, ResourceResult};
