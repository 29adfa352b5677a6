//! Resource inventory layer
//!
//! This module turns raw tagging API pages into normalized [`Resource`]
//! records and fans collection out across regions.
//!
//! # Architecture
//!
//! - [`identifier`] - Splits an ARN resource part into type and id
//! - [`arn`] - Decomposes a full ARN into its sections
//! - [`collector`] - Paginates one region with a fixed back-off
//! - [`aggregator`] - Runs one collector per region and merges the outcomes
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tagscan::aws::SdkConnector;
//! use tagscan::progress::LogObserver;
//! use tagscan::resource::Aggregator;
//!
//! async fn inventory() {
//!     let aggregator = Aggregator::new(Arc::new(SdkConnector::new(None)));
//!     let regions = vec!["us-east-1".to_string(), "eu-west-1".to_string()];
//!     let inventory = aggregator.run(&regions, &LogObserver).await;
//!     println!("{} resources, {} failed regions", inventory.resources.len(), inventory.errors.len());
//! }
//! ```

pub mod aggregator;
pub mod arn;
pub mod collector;
pub mod identifier;
mod model;

pub use aggregator::{Aggregator, Inventory, DEFAULT_TICK_INTERVAL};
pub use arn::Arn;
pub use collector::{RegionCollector, Throttle, DEFAULT_PAGE_SIZE};
pub use identifier::{parse_resource_part, IdentifierError, ParsedIdentifier};
pub use model::{Resource, Tag};
