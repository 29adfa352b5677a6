//! AWS SDK backed tagging client
//!
//! Wraps `aws_sdk_resourcegroupstagging::Client` behind [`TaggingApi`] and
//! loads one SDK configuration per region.

use super::error::{classify_sdk_error, CollectError};
use super::tagging::{RegionConnector, ResourcePage, TaggedEntry, TaggingApi};
use crate::resource::Tag;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_resourcegroupstagging::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_resourcegroupstagging::types::ResourceTagMapping;
use aws_sdk_resourcegroupstagging::Client;
use std::sync::Arc;

/// Tagging client for a single region
#[derive(Clone, Debug)]
pub struct SdkTaggingClient {
    client: Client,
}

impl SdkTaggingClient {
    /// Create a client from a loaded SDK configuration
    pub fn new(config: &SdkConfig) -> Self {
        Self::from_client(Client::new(config))
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaggingApi for SdkTaggingClient {
    async fn get_resources(
        &self,
        page_size: i32,
        pagination_token: Option<&str>,
    ) -> Result<ResourcePage, CollectError> {
        let output = self
            .client
            .get_resources()
            .resources_per_page(page_size)
            .set_pagination_token(pagination_token.map(str::to_string))
            .send()
            .await
            .map_err(|err| {
                classify_sdk_error(
                    err.code(),
                    err.message(),
                    DisplayErrorContext(&err).to_string(),
                )
            })?;

        let entries = output
            .resource_tag_mapping_list()
            .iter()
            .map(tagged_entry)
            .collect();

        Ok(ResourcePage {
            entries,
            pagination_token: output.pagination_token().map(str::to_string),
        })
    }
}

fn tagged_entry(mapping: &ResourceTagMapping) -> TaggedEntry {
    TaggedEntry {
        // A missing ARN is left empty and rejected by ARN decomposition
        arn: mapping.resource_arn().unwrap_or_default().to_string(),
        tags: mapping
            .tags()
            .iter()
            .map(|tag| Tag::new(tag.key(), tag.value()))
            .collect(),
    }
}

/// Loads region-scoped SDK configuration from the ambient credential chain
#[derive(Clone, Debug, Default)]
pub struct SdkConnector {
    profile: Option<String>,
}

impl SdkConnector {
    /// Create a connector, optionally pinned to a named profile
    pub fn new(profile: Option<String>) -> Self {
        Self { profile }
    }

    async fn load_config(&self, region: &str) -> SdkConfig {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }

        loader.load().await
    }
}

#[async_trait]
impl RegionConnector for SdkConnector {
    async fn connect(&self, region: &str) -> Result<Arc<dyn TaggingApi>, CollectError> {
        let config = self.load_config(region).await;

        let provider = config.credentials_provider().ok_or_else(|| {
            CollectError::Config(format!("no credentials provider resolved for {region}"))
        })?;

        // Resolve once so a missing profile or empty chain fails as configuration
        provider
            .provide_credentials()
            .await
            .map_err(|err| CollectError::Config(DisplayErrorContext(&err).to_string()))?;

        tracing::debug!("Loaded AWS configuration for {}", region);
        Ok(Arc::new(SdkTaggingClient::new(&config)))
    }
}
