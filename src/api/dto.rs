//! DTOs exchanged with the shortening service.
//!
//! Every response may be either the success body or the shared error
//! payload. [`Reply`] captures that union; the error variant is tried first so
//! that any body carrying an `error` field is treated as a failure even when it
//! also carries success-looking fields.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Request body for `POST /url/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCreate {
    pub long_url: String,

    /// Custom alias. Omitted from the body when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LinkCreate {
    /// Builds a request, treating an empty alias as "no custom alias".
    pub fn new(long_url: impl Into<String>, alias: &str) -> Self {
        Self {
            long_url: long_url.into(),
            name: (!alias.is_empty()).then(|| alias.to_string()),
        }
    }
}

/// Click statistics attached to a short link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub clicks: u64,
    #[serde(default)]
    pub last_ip: Option<String>,
    #[serde(default)]
    pub custom_name: Option<String>,
}

/// Successful shorten or metadata response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkResponse {
    /// The short code (not a full URL).
    pub shortened_url: String,
    pub long_url: String,
    #[serde(default)]
    pub metadata: LinkMetadata,
}

/// Shared error payload.
///
/// Some service endpoints send `reason` instead of `message`; both are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, alias = "reason")]
    pub message: String,
    #[serde(default)]
    pub redirect_to: Option<String>,
}

/// Response of `POST /alias/suggest`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AliasSuggestionResponse {
    #[serde(default)]
    pub suggested_aliases: Vec<String>,
}

/// Response of `GET /alias/check`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AliasAvailability {
    pub alias: String,
    pub is_available: bool,
}

/// Response of `GET /url/{alias}/redirect`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedirectResponse {
    pub long_url: String,
}

/// Response of `GET /url/{code}/metadata`.
///
/// The service wraps the metadata in a full link object; a bare metadata
/// object is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MetadataResponse {
    Link(LinkResponse),
    Bare(LinkMetadata),
}

impl MetadataResponse {
    pub fn into_metadata(self) -> LinkMetadata {
        match self {
            Self::Link(link) => link.metadata,
            Self::Bare(metadata) => metadata,
        }
    }
}

/// Either an error payload or the expected success body.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Error(ErrorResponse),
    Success(T),
}

impl<T> Reply<T> {
    /// Converts the reply into a result, mapping error payloads to [`ApiError`].
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Self::Error(payload) => Err(payload.into()),
            Self::Success(body) => Ok(body),
        }
    }
}
