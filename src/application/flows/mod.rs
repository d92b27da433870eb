//! The four request flows built on [`RequestCoordinator`].
//!
//! Each flow owns its coordinator and translates the raw [`FlowState`] into
//! what the presentation layer needs. Completions from all flows travel over
//! one channel as [`FlowEvent`]s; the owner routes each back to its flow.
//!
//! [`RequestCoordinator`]: crate::application::pipeline::RequestCoordinator
//! [`FlowState`]: crate::application::pipeline::FlowState

pub mod availability;
pub mod redirect;
pub mod submission;
pub mod suggestion;

use tokio::sync::mpsc::UnboundedSender;

use crate::application::pipeline::{Outcome, RequestToken};
use crate::domain::entities::ShortLinkResult;

pub use availability::{AliasVerdict, AvailabilityFlow, AvailabilityIndicator};
pub use redirect::{Navigator, RedirectFlow, RedirectPage, RedirectState};
pub use submission::SubmissionFlow;
pub use suggestion::{SuggestionFlow, SuggestionSlots};

/// A finished request, tagged with the token it was issued under.
#[derive(Debug)]
pub enum FlowEvent {
    Suggestions(RequestToken, Outcome<Vec<String>>),
    Availability(RequestToken, Outcome<bool>),
    Shortened(RequestToken, Outcome<ShortLinkResult>),
    Redirect(RequestToken, Outcome<String>),
}

/// Sending half of the completion channel shared by a page's flows.
pub type EventSender = UnboundedSender<FlowEvent>;
