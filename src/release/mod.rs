//! Catalog releases and the operations the check applies to them
//!
//! - **model**: releases, release types and dependency edges as the catalog reports them
//! - **filter**: narrowing product releases by release type or version
//! - **sort**: ordering releases by semver precedence or last-updated timestamp
//!
//! Filtering and sorting are strategies behind the [`Filter`] and [`Sorter`]
//! traits. The closed sets of policies ([`ReleasePredicate`], [`SortBy`])
//! dispatch to them, so callers never branch on raw config strings.

pub mod filter;
pub mod model;
pub mod sort;

pub use filter::{Filter, ReleaseFilter, ReleasePredicate};
pub use model::{Release, ReleaseDependency, ReleaseId, ReleaseType};
pub use sort::{ReleaseSorter, SortBy, Sorter};
