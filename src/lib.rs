//! Multi-region inventory of tagged AWS resources
//!
//! - [`aws`] - Tagging API access, errors, and regions
//! - [`resource`] - ARN parsing, per-region collection, and aggregation
//! - [`progress`] - Progress observers driven by the aggregator
//! - [`report`] - CSV output
//! - [`config`] - Optional settings file

pub mod aws;
pub mod config;
pub mod progress;
pub mod report;
pub mod resource;

/// Version injected at compile time via TAGSCAN_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("TAGSCAN_VERSION") {
    Some(v) => v,
    None => "dev",
};
