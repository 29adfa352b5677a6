//! In-memory tagging backend
//!
//! Serves a fixed set of entries per region with the same pagination
//! contract as the real service (offset tokens, empty string at the end).
//! Used by the unit and integration tests.

use super::error::CollectError;
use super::tagging::{RegionConnector, ResourcePage, TaggedEntry, TaggingApi};
use crate::resource::Tag;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A single region's worth of tagged resources
#[derive(Debug, Default)]
pub struct InMemoryTagging {
    entries: Vec<TaggedEntry>,
    /// 1-based page number that fails with an API error
    fail_on_page: Option<usize>,
    requests: AtomicUsize,
}

impl InMemoryTagging {
    pub fn new(entries: Vec<TaggedEntry>) -> Self {
        Self {
            entries,
            fail_on_page: None,
            requests: AtomicUsize::new(0),
        }
    }

    /// Make the given page (1-based) fail with `InternalServiceException`
    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    /// Number of `get_resources` calls served so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaggingApi for InMemoryTagging {
    async fn get_resources(
        &self,
        page_size: i32,
        pagination_token: Option<&str>,
    ) -> Result<ResourcePage, CollectError> {
        let page = self.requests.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fail_on_page == Some(page) {
            return Err(CollectError::Api {
                code: Some("InternalServiceException".to_string()),
                message: format!("injected failure on page {page}"),
            });
        }

        let start = match pagination_token {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| CollectError::Api {
                code: Some("PaginationTokenExpiredException".to_string()),
                message: format!("unknown pagination token {token:?}"),
            })?,
        };

        let page_size = usize::try_from(page_size).unwrap_or(0).max(1);
        let end = (start + page_size).min(self.entries.len());
        let entries = self.entries.get(start..end).unwrap_or_default().to_vec();

        let pagination_token = if end < self.entries.len() {
            end.to_string()
        } else {
            String::new()
        };

        Ok(ResourcePage {
            entries,
            pagination_token: Some(pagination_token),
        })
    }
}

/// Connector over a fixed map of in-memory regions
#[derive(Debug, Default)]
pub struct InMemoryConnector {
    regions: HashMap<String, Arc<InMemoryTagging>>,
    config_failures: HashSet<String>,
    connects: AtomicUsize,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `backend` for `region`
    pub fn with_region(mut self, region: &str, backend: InMemoryTagging) -> Self {
        self.regions.insert(region.to_string(), Arc::new(backend));
        self
    }

    /// Fail configuration loading for `region`
    pub fn with_config_failure(mut self, region: &str) -> Self {
        self.config_failures.insert(region.to_string());
        self
    }

    /// Backend registered for `region`, for request assertions
    pub fn backend(&self, region: &str) -> Option<Arc<InMemoryTagging>> {
        self.regions.get(region).cloned()
    }

    /// Number of `connect` calls served so far
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegionConnector for InMemoryConnector {
    async fn connect(&self, region: &str) -> Result<Arc<dyn TaggingApi>, CollectError> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        if self.config_failures.contains(region) {
            return Err(CollectError::Config(format!(
                "no credentials provider resolved for {region}"
            )));
        }

        let backend: Arc<dyn TaggingApi> = match self.regions.get(region) {
            Some(backend) => backend.clone(),
            None => Arc::new(InMemoryTagging::default()),
        };
        Ok(backend)
    }
}

/// Generate `count` EC2 instance entries in `region`, each with a `Name` tag
pub fn synthetic_entries(region: &str, account_id: &str, count: usize) -> Vec<TaggedEntry> {
    (0..count)
        .map(|i| TaggedEntry {
            arn: format!("arn:aws:ec2:{region}:{account_id}:instance/i-{i:017x}"),
            tags: vec![Tag::new("Name", format!("{region}-{i}"))],
        })
        .collect()
}
