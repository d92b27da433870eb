//! # LnkUp
//!
//! Client for the LnkUp link shortener, built around an asynchronous
//! input-coordination pipeline.
//!
//! ## Architecture
//!
//! The crate keeps the same layer separation as the service it talks to:
//!
//! - **API Layer** ([`api`]) - The [`api::LinkApi`] contract, wire DTOs and the
//!   `reqwest` transport
//! - **Domain Layer** ([`domain`]) - Values produced by finished flows
//! - **Application Layer** ([`application`]) - Debouncer, request coordinator,
//!   the four flows and the shortening session
//! - **Utilities** ([`utils`]) - Clipboard access for the terminal front-end
//!
//! ## Pipeline
//!
//! ```text
//! keystrokes -> Debouncer -> stabilized value -> RequestCoordinator -> FlowState -> view
//! ```
//!
//! Every request gets a token. Only the newest token per flow may change that
//! flow's state, so a slow answer for an input the user has already edited
//! away can never overwrite a fresher one.
//!
//! ## Quick Start
//!
//! ```bash
//! export LNKUP_API_URL="http://localhost:8000/api"
//!
//! # Interactive shortening
//! cargo run
//!
//! # Resolve an alias
//! cargo run -- open my-docs
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod utils;

pub mod config;
pub mod telemetry;

pub use error::{ApiError, ErrorKind, FailureReason};

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for the binary and
/// integration tests.
pub mod prelude {
    pub use crate::api::dto::{AliasAvailability, LinkCreate, LinkMetadata, LinkResponse};
    pub use crate::api::{HttpLinkApi, LinkApi};
    pub use crate::application::flows::{
        AliasVerdict, AvailabilityIndicator, Navigator, RedirectPage, RedirectState,
        SuggestionSlots,
    };
    pub use crate::application::session::{SessionSettings, SessionView, ShortenSession};
    pub use crate::config::Config;
    pub use crate::domain::entities::{RedirectOutcome, ShortLinkResult};
    pub use crate::error::{
        ApiError, ErrorKind, FailureReason, InputLocked, SubmitRejected, NETWORK_FAILURE_MESSAGE,
    };
}
