//! Region Collector
//!
//! Pages through `GetResources` for a single region and turns every entry
//! into a [`Resource`].

use super::model::Resource;
use crate::aws::{CollectError, TaggedEntry, TaggingApi};
use std::time::Duration;
use tracing::{debug, info};

/// Largest page the tagging API accepts
pub const DEFAULT_PAGE_SIZE: i32 = 100;

/// Fixed pause policy between pages.
///
/// After `burst` consecutive pages the collector sleeps for `pause` before
/// asking for the next one. A `burst` of zero disables pausing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    pub burst: usize,
    pub pause: Duration,
}

impl Throttle {
    pub const fn new(burst: usize, pause: Duration) -> Self {
        Self { burst, pause }
    }

    pub const fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    fn is_due(&self, pages_since_pause: usize) -> bool {
        self.burst > 0 && pages_since_pause >= self.burst
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(4, Duration::from_secs(3))
    }
}

/// Collects every tagged resource of one region
#[derive(Debug, Clone)]
pub struct RegionCollector {
    region: String,
    page_size: i32,
    throttle: Throttle,
}

impl RegionCollector {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            page_size: DEFAULT_PAGE_SIZE,
            throttle: Throttle::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Fetch all pages (auto-paginate).
    ///
    /// Any API or parse failure discards what this region collected so far.
    pub async fn collect(&self, api: &dyn TaggingApi) -> Result<Vec<Resource>, CollectError> {
        let mut resources = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;
        let mut pages_since_pause = 0usize;

        loop {
            let page = api
                .get_resources(self.page_size, page_token.as_deref())
                .await?;
            pages += 1;
            pages_since_pause += 1;

            debug!(
                region = %self.region,
                page = pages,
                entries = page.entries.len(),
                "Fetched GetResources page"
            );

            let next_token = page.next_token().map(str::to_string);

            for entry in page.entries {
                resources.push(normalize(entry)?);
            }

            let Some(token) = next_token else {
                break;
            };
            page_token = Some(token);

            if self.throttle.is_due(pages_since_pause) {
                debug!(region = %self.region, pause = ?self.throttle.pause, "Pausing between pages");
                tokio::time::sleep(self.throttle.pause).await;
                pages_since_pause = 0;
            }
        }

        info!(
            region = %self.region,
            pages,
            resources = resources.len(),
            "Region collected"
        );

        Ok(resources)
    }
}

fn normalize(entry: TaggedEntry) -> Result<Resource, CollectError> {
    let TaggedEntry { arn, tags } = entry;

    match Resource::parse(&arn, tags) {
        Ok(resource) => Ok(resource),
        Err(source) => Err(CollectError::Identifier { arn, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::memory::synthetic_entries;
    use crate::aws::InMemoryTagging;
    use crate::resource::{IdentifierError, Tag};
    use std::collections::HashSet;
    use tokio::time::Instant;

    fn collector() -> RegionCollector {
        RegionCollector::new("us-east-1").with_throttle(Throttle::disabled())
    }

    #[tokio::test]
    async fn test_collects_250_resources_over_three_pages() {
        let backend = InMemoryTagging::new(synthetic_entries("us-east-1", "123456789012", 250));

        let resources = collector().collect(&backend).await.unwrap();

        assert_eq!(resources.len(), 250);
        assert_eq!(backend.requests(), 3);

        let unique: HashSet<&str> = resources.iter().map(|r| r.arn.as_str()).collect();
        assert_eq!(unique.len(), 250);
    }

    #[tokio::test]
    async fn test_page_order_is_preserved() {
        let backend = InMemoryTagging::new(synthetic_entries("eu-west-1", "123456789012", 7));

        let resources = collector()
            .with_page_size(3)
            .collect(&backend)
            .await
            .unwrap();

        let ids: Vec<&str> = resources.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<String> = (0..7).map(|i| format!("i-{i:017x}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(backend.requests(), 3);
    }

    #[tokio::test]
    async fn test_tags_are_copied_verbatim() {
        let backend = InMemoryTagging::new(vec![TaggedEntry {
            arn: "arn:aws:s3:::logs-bucket".to_string(),
            tags: vec![Tag::new("env", "prod"), Tag::new("env", "prod")],
        }]);

        let resources = collector().collect(&backend).await.unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].resource_type, "");
        assert_eq!(resources[0].id, "logs-bucket");
        assert_eq!(resources[0].tags.len(), 2);
    }

    #[tokio::test]
    async fn test_api_failure_discards_partial_results() {
        let backend =
            InMemoryTagging::new(synthetic_entries("us-east-1", "123456789012", 250)).failing_on_page(2);

        let err = collector().collect(&backend).await.unwrap_err();

        assert!(matches!(err, CollectError::Api { .. }));
        assert_eq!(backend.requests(), 2);
    }

    #[tokio::test]
    async fn test_unparsable_arn_aborts_region() {
        let mut entries = synthetic_entries("us-east-1", "123456789012", 2);
        entries.push(TaggedEntry {
            arn: "arn:aws:lambda:us-east-1:123456789012:function:f:live".to_string(),
            tags: Vec::new(),
        });
        let backend = InMemoryTagging::new(entries);

        let err = collector().collect(&backend).await.unwrap_err();

        match err {
            CollectError::Identifier { arn, source } => {
                assert!(arn.ends_with("function:f:live"));
                assert!(matches!(source, IdentifierError::Unrecognized(_)));
            }
            other => panic!("expected identifier error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_pauses_after_every_fourth_page() {
        let backend = InMemoryTagging::new(synthetic_entries("us-east-1", "123456789012", 9));
        let collector = RegionCollector::new("us-east-1")
            .with_page_size(1)
            .with_throttle(Throttle::new(4, Duration::from_secs(3)));

        let start = Instant::now();
        let resources = collector.collect(&backend).await.unwrap();

        assert_eq!(resources.len(), 9);
        assert_eq!(backend.requests(), 9);
        // Pauses after pages 4 and 8 only
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(6), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(9), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_after_final_page() {
        let backend = InMemoryTagging::new(synthetic_entries("us-east-1", "123456789012", 4));
        let collector = RegionCollector::new("us-east-1")
            .with_page_size(1)
            .with_throttle(Throttle::default());

        let start = Instant::now();
        collector.collect(&backend).await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(RegionCollector::new("r").with_page_size(0).page_size, 1);
        assert_eq!(RegionCollector::new("r").with_page_size(500).page_size, 100);
    }
}
