//! Normalized resource records

use super::arn::Arn;
use super::identifier::{parse_resource_part, IdentifierError};

/// A single tag as returned by the tagging API
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A tagged resource with its ARN broken out into columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub arn: String,
    pub account_id: String,
    pub region: String,
    pub service: String,
    /// Empty when the ARN carries no resource type
    pub resource_type: String,
    pub id: String,
    /// In API order; duplicate keys are kept
    pub tags: Vec<Tag>,
}

impl Resource {
    /// Build a resource from its ARN and tag list
    pub fn parse(arn: &str, tags: Vec<Tag>) -> Result<Self, IdentifierError> {
        let parts = Arn::parse(arn)?;
        let identifier = parse_resource_part(parts.resource)?;

        Ok(Self {
            arn: arn.to_string(),
            account_id: parts.account_id.to_string(),
            region: parts.region.to_string(),
            service: parts.service.to_string(),
            resource_type: identifier.resource_type,
            id: identifier.resource_id,
            tags,
        })
    }
}
