//! Final shorten action, gated on alias availability.

use std::sync::Arc;

use tracing::info;

use crate::api::LinkApi;
use crate::api::dto::LinkCreate;
use crate::application::flows::{AvailabilityFlow, EventSender, FlowEvent};
use crate::application::pipeline::{Flow, FlowState, Outcome, RequestCoordinator, RequestToken};
use crate::domain::entities::ShortLinkResult;
use crate::error::SubmitRejected;

/// Action label while idle.
pub const SUBMIT_LABEL: &str = "Lnk Up!";
/// Action label while a submission is pending.
pub const PENDING_LABEL: &str = "Processing...";

/// Issues the shorten request and holds its result.
///
/// # Gating
///
/// [`SubmissionFlow::submit`] refuses to issue a request when:
/// - a submission is already pending
/// - the URL is empty
/// - the alias is non-empty and its availability is anything other than
///   confirmed available
///
/// The availability state is read at the moment of the call, never cached.
#[derive(Debug)]
pub struct SubmissionFlow {
    coordinator: RequestCoordinator<LinkCreate, ShortLinkResult>,
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self {
            coordinator: RequestCoordinator::new(Flow::Submission),
        }
    }

    pub fn state(&self) -> &FlowState<ShortLinkResult> {
        self.coordinator.state()
    }

    pub fn is_pending(&self) -> bool {
        self.coordinator.state().is_pending()
    }

    /// Checks every gate without issuing anything.
    ///
    /// # Errors
    ///
    /// Returns the first [`SubmitRejected`] reason that applies.
    pub fn check(
        &self,
        url: &str,
        alias: &str,
        availability: &AvailabilityFlow,
    ) -> Result<(), SubmitRejected> {
        if self.is_pending() {
            return Err(SubmitRejected::AlreadyPending);
        }

        if url.trim().is_empty() {
            return Err(SubmitRejected::EmptyUrl);
        }

        availability.gate(alias)
    }

    /// Issues a single shorten request for `url` and the optional `alias`.
    ///
    /// Surrounding whitespace is stripped from `url` before it is sent.
    ///
    /// # Errors
    ///
    /// See [`Self::check`]. No request is issued on error.
    pub fn submit(
        &mut self,
        url: &str,
        alias: &str,
        availability: &AvailabilityFlow,
        api: &Arc<dyn LinkApi>,
        events: &EventSender,
    ) -> Result<RequestToken, SubmitRejected> {
        let url = url.trim();
        self.check(url, alias, availability)?;

        let request = LinkCreate::new(url, alias);
        let body = request.clone();
        let api = Arc::clone(api);
        let call = async move { api.shorten(body).await.map(ShortLinkResult::from) };

        info!(url, alias, "Submitting shorten request");
        Ok(self
            .coordinator
            .issue(request, call, events, FlowEvent::Shortened))
    }

    pub fn apply(&mut self, token: RequestToken, outcome: Outcome<ShortLinkResult>) -> bool {
        self.coordinator.complete(token, outcome)
    }

    pub fn result(&self) -> Option<&ShortLinkResult> {
        self.coordinator.state().succeeded()
    }

    /// The failure to show under the action, if the last submission failed.
    pub fn error_message(&self) -> Option<&str> {
        self.coordinator
            .state()
            .failure()
            .map(|reason| reason.user_message())
    }

    pub fn action_label(&self) -> &'static str {
        if self.is_pending() {
            PENDING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Forgets the previous result or failure. Ignored while pending.
    pub fn clear(&mut self) {
        if !self.is_pending() {
            self.coordinator.reset();
        }
    }
}
