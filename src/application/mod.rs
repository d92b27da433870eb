//! Application layer: the asynchronous input-coordination pipeline.
//!
//! Keystrokes go through a [`pipeline::Debouncer`], stabilized values are
//! turned into requests by a [`pipeline::RequestCoordinator`], and each flow
//! projects its state for the presentation layer.
//!
//! # Modules
//!
//! - [`pipeline`] - Debouncer, request coordinator and flow state
//! - [`flows`] - Suggestion, availability, submission and redirect flows
//! - [`session`] - [`session::ShortenSession`], which wires the shortening
//!   page's flows to its two input fields
//!
//! # Concurrency
//!
//! Flow state is only ever mutated through `&mut self` by the task owning the
//! session. Network calls run on spawned tasks and report back over a channel;
//! those calls are the only suspension points.

pub mod flows;
pub mod pipeline;
pub mod session;
