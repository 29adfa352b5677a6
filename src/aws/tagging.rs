//! Tagging API seam
//!
//! The collector only needs one call, `GetResources`, and the aggregator only
//! needs a way to get a region-scoped client. Both are traits so the SDK can
//! be swapped for the in-memory backend in tests.

use super::error::CollectError;
use crate::resource::Tag;
use async_trait::async_trait;
use std::sync::Arc;

/// One entry of a `GetResources` page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEntry {
    pub arn: String,
    pub tags: Vec<Tag>,
}

/// One page of `GetResources` output
#[derive(Debug, Clone, Default)]
pub struct ResourcePage {
    pub entries: Vec<TaggedEntry>,
    pub pagination_token: Option<String>,
}

impl ResourcePage {
    /// Token for the next page; `None` when the listing is exhausted.
    /// The service signals the end with an empty string rather than omitting it.
    pub fn next_token(&self) -> Option<&str> {
        self.pagination_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// Region-scoped access to the resource tagging API
#[async_trait]
pub trait TaggingApi: Send + Sync {
    /// Fetch one page of tagged resources
    async fn get_resources(
        &self,
        page_size: i32,
        pagination_token: Option<&str>,
    ) -> Result<ResourcePage, CollectError>;
}

/// Produces a tagging client for a region
#[async_trait]
pub trait RegionConnector: Send + Sync {
    async fn connect(&self, region: &str) -> Result<Arc<dyn TaggingApi>, CollectError>;
}
