//! Resource identifier parsing
//!
//! Splits the resource part of an ARN (everything after the account id) into
//! a resource type and a resource id. AWS services encode this part either as
//! `type/id` or as `type:id`, and a handful mix both.

use thiserror::Error;

/// Errors produced while decomposing an ARN or its resource part
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("empty resource string")]
    Empty,

    #[error("could not parse ARN: {0}")]
    MalformedArn(String),

    #[error("could not parse resource string: {0}")]
    Unrecognized(String),
}

/// Resource type and id extracted from an ARN resource part
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedIdentifier {
    /// Resource type, empty when the service does not encode one
    pub resource_type: String,
    pub resource_id: String,
}

impl ParsedIdentifier {
    fn new(resource_type: &str, resource_id: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            resource_id: resource_id.to_string(),
        }
    }
}

/// Parse the resource part of an ARN.
///
/// The slash form wins when there is no colon at all, or when there is a
/// single colon and a slash appears before it (`foo/hoge:6`). A single colon
/// without a preceding slash splits on the colon (`secret:hoge/bar`). Any
/// other shape is rejected.
pub fn parse_resource_part(resource: &str) -> Result<ParsedIdentifier, IdentifierError> {
    if resource.is_empty() {
        return Err(IdentifierError::Empty);
    }

    let colon_parts: Vec<&str> = resource.split(':').collect();

    match colon_parts.as_slice() {
        [_] => Ok(parse_slash_form(resource)),
        [head, _] if head.contains('/') => Ok(parse_slash_form(resource)),
        [resource_type, resource_id] => Ok(ParsedIdentifier::new(resource_type, resource_id)),
        _ => Err(IdentifierError::Unrecognized(resource.to_string())),
    }
}

fn parse_slash_form(resource: &str) -> ParsedIdentifier {
    match resource.split_once('/') {
        Some((resource_type, resource_id)) => ParsedIdentifier::new(resource_type, resource_id),
        None => ParsedIdentifier::new("", resource),
    }
}
