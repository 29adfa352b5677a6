//! ARN decomposition
//!
//! `arn:partition:service:region:account-id:resource`, where the resource
//! section may itself contain `:` and `/`.

use super::identifier::IdentifierError;

const ARN_PREFIX: &str = "arn";
const ARN_SECTIONS: usize = 6;

/// A decomposed Amazon Resource Name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn<'a> {
    pub partition: &'a str,
    pub service: &'a str,
    /// Empty for global services (S3, IAM, ...)
    pub region: &'a str,
    pub account_id: &'a str,
    pub resource: &'a str,
}

impl<'a> Arn<'a> {
    /// Split an ARN into its sections without validating their contents
    pub fn parse(arn: &'a str) -> Result<Self, IdentifierError> {
        let sections: Vec<&str> = arn.splitn(ARN_SECTIONS, ':').collect();

        match sections[..] {
            [ARN_PREFIX, partition, service, region, account_id, resource] => Ok(Self {
                partition,
                service,
                region,
                account_id,
                resource,
            }),
            _ => Err(IdentifierError::MalformedArn(arn.to_string())),
        }
    }
}
