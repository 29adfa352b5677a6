//! AWS API interaction module
//!
//! This module provides everything the collector needs from AWS: the
//! tagging API seam, its SDK and in-memory implementations, error
//! classification, and the region list.
//!
//! # Module Structure
//!
//! - [`tagging`] - `TaggingApi` and `RegionConnector` traits
//! - [`client`] - SDK backed implementations
//! - [`memory`] - In-memory implementations for tests
//! - [`error`] - Per-region error types and hints
//! - [`regions`] - Built-in region list and validation
//!
//! # Example
//!
//! ```ignore
//! use tagscan::aws::{RegionConnector, SdkConnector};
//!
//! async fn example() -> Result<(), tagscan::aws::CollectError> {
//!     let api = SdkConnector::new(None).connect("us-east-1").await?;
//!     let page = api.get_resources(100, None).await?;
//!     println!("{} tagged resources on the first page", page.entries.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod memory;
pub mod regions;
pub mod tagging;

pub use client::{SdkConnector, SdkTaggingClient};
pub use error::{CollectError, CollectionError};
pub use memory::{InMemoryConnector, InMemoryTagging};
pub use tagging::{RegionConnector, ResourcePage, TaggedEntry, TaggingApi};
