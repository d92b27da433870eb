//! The service contract consumed by the request pipeline.

use crate::api::dto::{AliasAvailability, LinkCreate, LinkMetadata, LinkResponse};
use crate::error::ApiError;
use async_trait::async_trait;

/// Remote operations of the shortening service.
///
/// Every error payload, non-success status and transport failure is returned
/// as an [`ApiError`]; implementations never panic on bad input from the
/// service.
///
/// # Implementations
///
/// - [`crate::api::HttpLinkApi`] - HTTP/JSON implementation over `reqwest`
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkApi: Send + Sync {
    /// Suggests up to `count` aliases for a long URL.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the service is unreachable or rejects the URL.
    async fn suggest_aliases(&self, long_url: &str, count: usize)
    -> Result<Vec<String>, ApiError>;

    /// Creates a short link.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] if the alias is occupied or the URL is
    /// rejected, other variants on transport failures.
    async fn shorten(&self, request: LinkCreate) -> Result<LinkResponse, ApiError>;

    /// Checks whether an alias can still be claimed.
    ///
    /// # Errors
    ///
    /// A taken alias is `Ok` with `is_available == false`. Errors are reserved
    /// for transport failures and error payloads.
    async fn check_alias_availability(&self, alias: &str) -> Result<AliasAvailability, ApiError>;

    /// Resolves an alias to its destination URL.
    ///
    /// # Errors
    ///
    /// Returns a `NOT_FOUND` [`ApiError::Application`], possibly with a
    /// redirect hint, when the alias does not exist.
    async fn get_redirect(&self, alias: &str) -> Result<String, ApiError>;

    /// Fetches click statistics for a short code.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the code is unknown or the service fails.
    async fn get_metadata(&self, short_code: &str) -> Result<LinkMetadata, ApiError>;
}
