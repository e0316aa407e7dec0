//! Core plumbing shared by every step of the resource
//!
//! - **config**: request, source and response types read from / written to the pipeline
//! - **error**: error types with contextual help messages and exit codes

pub mod config;
pub mod error;
