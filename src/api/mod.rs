//! Client side of the LnkUp service API.
//!
//! The pipeline never talks HTTP directly: it only sees the [`LinkApi`] trait.
//! This keeps the coordination logic testable with mocks and leaves the
//! transport swappable.
//!
//! # Modules
//!
//! - [`dto`] - Wire payloads for requests and responses
//! - [`link_api`] - The [`LinkApi`] contract consumed by the flows
//! - [`http`] - [`HttpLinkApi`], the `reqwest` implementation

pub mod dto;
pub mod http;
pub mod link_api;

pub use http::HttpLinkApi;
pub use link_api::LinkApi;

#[cfg(test)]
pub use link_api::MockLinkApi;
