//! Collection error classification
//!
//! Per-region failures are typed so the caller can report them after the
//! report has been written, with a hint for the AWS error codes people hit
//! most often.

use crate::resource::IdentifierError;
use thiserror::Error;

/// Why a single region could not be collected
#[derive(Debug, Error)]
pub enum CollectError {
    /// Region-scoped configuration or credential resolution failed
    #[error("failed to load AWS configuration: {0}")]
    Config(String),

    /// The GetResources call failed
    #[error("GetResources failed: {message}")]
    Api {
        code: Option<String>,
        message: String,
    },

    /// A returned ARN could not be decomposed
    #[error("unparsable resource {arn}: {source}")]
    Identifier {
        arn: String,
        #[source]
        source: IdentifierError,
    },

    /// The collection task panicked or was cancelled
    #[error("collection task aborted: {0}")]
    Aborted(String),
}

impl CollectError {
    /// AWS error code, when the failure came from the service
    pub fn code(&self) -> Option<&str> {
        match self {
            CollectError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Check if the service rejected the call for rate limiting
    pub fn is_throttled(&self) -> bool {
        self.code()
            .is_some_and(|code| THROTTLING_CODES.contains(&code))
    }

    /// Get a user-friendly suggestion for resolving this error, if available
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CollectError::Config(_) => Some(CONFIG_HINT),
            CollectError::Api { .. } if self.is_throttled() => Some(THROTTLING_HINT),
            CollectError::Api { code: Some(code), .. } => suggestion_for_code(code),
            _ => None,
        }
    }
}

/// One region's failure, recorded without stopping the other regions
#[derive(Debug, Error)]
#[error("{region}: {cause}")]
pub struct CollectionError {
    pub region: String,
    #[source]
    pub cause: CollectError,
}

/// Known AWS error codes for throttling/rate limiting
///
/// The tagging API itself answers with `ThrottledException`.
const THROTTLING_CODES: &[&str] = &[
    "ThrottledException",
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
];

const THROTTLING_HINT: &str =
    "AWS API rate limit hit. Try again later, or scan fewer regions at once with --region.";

const CONFIG_HINT: &str =
    "Configure credentials via environment variables, ~/.aws/credentials, or --profile.";

/// Error code to user-friendly suggestion mapping
const SUGGESTIONS: &[(&str, &str)] = &[
    (
        "AccessDeniedException",
        "Permission denied. The caller needs tag:GetResources in this region.",
    ),
    (
        "UnrecognizedClientException",
        "The security token is invalid, or this opt-in region is not enabled for the account.",
    ),
    (
        "InvalidClientTokenId",
        "The security token is invalid, or this opt-in region is not enabled for the account.",
    ),
    (
        "ExpiredTokenException",
        "Credentials have expired. Refresh your AWS session and retry.",
    ),
];

/// Get a user-friendly suggestion for a known error code.
fn suggestion_for_code(code: &str) -> Option<&'static str> {
    SUGGESTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| *s)
}

/// Build an API error from the code and message an SDK error carries
pub fn classify_sdk_error(code: Option<&str>, message: Option<&str>, fallback: String) -> CollectError {
    let message = match (code, message) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => fallback,
    };

    CollectError::Api {
        code: code.map(str::to_string),
        message,
    }
}
