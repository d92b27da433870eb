//! Error types shared by the API client and the request pipeline.
//!
//! Two layers exist:
//!
//! - [`ApiError`] is what a [`crate::api::LinkApi`] call returns. It keeps the
//!   transport-level detail (status codes, decode errors, service payloads).
//! - [`FailureReason`] is what a failed flow holds. It normalizes every
//!   [`ApiError`] into a machine-checkable [`ErrorKind`] plus a display message
//!   and an optional redirect hint.
//!
//! An unavailable alias is not an error at all: the availability flow reports
//! it as a successful `false` verdict.

use std::fmt;

use crate::api::dto::ErrorResponse;

/// Error kind reported by the service for missing aliases and URLs.
const NOT_FOUND_KIND: &str = "NOT_FOUND";

/// Message shown to the user when the service could not be reached.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Could not reach the shortening service. Please try again.";

/// Errors returned by [`crate::api::LinkApi`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, reset).
    #[error("network failure: {0}")]
    Network(String),

    /// The service answered with a non-success status and no error payload.
    #[error("service responded with status {status}")]
    Status { status: u16 },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The service returned a well-formed error payload.
    #[error("{kind}: {message}")]
    Application {
        kind: String,
        message: String,
        redirect_to: Option<String>,
    },

    /// The configured API base URL cannot be used to build endpoints.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    pub fn application(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Application {
            kind: kind.into(),
            message: message.into(),
            redirect_to: None,
        }
    }

    pub fn not_found(message: impl Into<String>, redirect_to: Option<String>) -> Self {
        Self::Application {
            kind: NOT_FOUND_KIND.to_string(),
            message: message.into(),
            redirect_to,
        }
    }

    /// Returns the normalized kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::NetworkFailure,
            Self::Application { kind, .. } if kind == NOT_FOUND_KIND => ErrorKind::NotFound,
            Self::Status { .. }
            | Self::Decode(_)
            | Self::Application { .. }
            | Self::InvalidBaseUrl(_) => ErrorKind::ApplicationError,
        }
    }
}

impl From<ErrorResponse> for ApiError {
    fn from(payload: ErrorResponse) -> Self {
        Self::Application {
            kind: payload.error,
            message: payload.message,
            redirect_to: payload.redirect_to,
        }
    }
}

/// Machine-checkable failure category carried by every failed flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport-level failure, no response.
    NetworkFailure,
    /// Well-formed error payload, non-success status or undecodable body.
    ApplicationError,
    /// The alias or URL is absent. May carry a redirect hint.
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkFailure => write!(f, "network_failure"),
            Self::ApplicationError => write!(f, "application_error"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

/// Why a flow ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub kind: ErrorKind,
    pub message: String,
    pub redirect_to: Option<String>,
}

impl FailureReason {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            redirect_to: None,
        }
    }

    /// Text suitable for showing to the user.
    ///
    /// Service messages are passed through verbatim; transport failures get a
    /// generic retry hint instead of the raw transport error.
    pub fn user_message(&self) -> &str {
        match self.kind {
            ErrorKind::NetworkFailure => NETWORK_FAILURE_MESSAGE,
            ErrorKind::ApplicationError | ErrorKind::NotFound => &self.message,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<ApiError> for FailureReason {
    fn from(err: ApiError) -> Self {
        let kind = err.kind();
        match err {
            ApiError::Application {
                message,
                redirect_to,
                ..
            } => Self {
                kind,
                message,
                redirect_to,
            },
            other => Self::new(kind, other.to_string()),
        }
    }
}

/// Reasons a submit request is refused before any shorten request is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("a submission is already in progress")]
    AlreadyPending,

    #[error("enter a URL to shorten")]
    EmptyUrl,

    #[error("alias '{alias}' is still being checked")]
    AliasChecking { alias: String },

    #[error("alias '{alias}' is already taken")]
    AliasTaken { alias: String },

    #[error("alias '{alias}' could not be verified: {reason}")]
    AliasUnverified { alias: String, reason: String },
}

/// Returned when an input is edited while a submission is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("inputs are locked while a submission is pending")]
pub struct InputLocked;
