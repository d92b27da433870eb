//! Domain layer: the values the pipeline hands to the presentation layer.
//!
//! # Architecture
//!
//! - [`entities`] - Results produced by completed flows
//!
//! Entities carry no I/O. They are built by the flows in
//! [`crate::application`] from [`crate::api`] responses.

pub mod entities;
