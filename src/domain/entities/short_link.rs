//! Short link entity created by a successful submission.

use chrono::{DateTime, Utc};

use crate::api::dto::{LinkMetadata, LinkResponse};

/// A short link issued by the service.
///
/// Immutable once created. The session keeps it until the URL input changes.
/// `created_at` is the local time the service's answer arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLinkResult {
    pub short_code: String,
    pub long_url: String,
    pub metadata: LinkMetadata,
    pub created_at: DateTime<Utc>,
}

impl ShortLinkResult {
    /// Creates a new result stamped with the current time.
    pub fn new(short_code: String, long_url: String, metadata: LinkMetadata) -> Self {
        Self {
            short_code,
            long_url,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Composes the public short link from the front-end origin and the code.
    pub fn short_link(&self, origin: &str) -> String {
        format!("{}/{}", origin.trim_end_matches('/'), self.short_code)
    }
}

impl From<LinkResponse> for ShortLinkResult {
    fn from(response: LinkResponse) -> Self {
        Self::new(response.shortened_url, response.long_url, response.metadata)
    }
}
