//! Alias suggestions for the stabilized URL.

use std::sync::Arc;

use crate::api::LinkApi;
use crate::application::flows::{EventSender, FlowEvent};
use crate::application::pipeline::{Flow, FlowState, Outcome, RequestCoordinator, RequestToken};

/// What the suggestion row should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionSlots {
    /// No URL has been entered yet.
    Hidden,
    /// A request is pending: render exactly this many skeleton slots.
    Placeholders(usize),
    /// Suggestions to offer. Empty when the request failed.
    Aliases(Vec<String>),
}

impl SuggestionSlots {
    /// Number of slots occupied in the row.
    pub fn len(&self) -> usize {
        match self {
            Self::Hidden => 0,
            Self::Placeholders(count) => *count,
            Self::Aliases(aliases) => aliases.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns a stabilized URL into a bounded list of suggested aliases.
///
/// Suggestions are advisory: a failure renders an empty list and never
/// blocks submission.
#[derive(Debug)]
pub struct SuggestionFlow {
    coordinator: RequestCoordinator<String, Vec<String>>,
    count: usize,
}

impl SuggestionFlow {
    pub fn new(count: usize) -> Self {
        Self {
            coordinator: RequestCoordinator::new(Flow::Suggestion),
            count,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn state(&self) -> &FlowState<Vec<String>> {
        self.coordinator.state()
    }

    /// Reacts to a newly stabilized URL.
    ///
    /// An empty URL hides the row and invalidates any in-flight request. A
    /// URL already behind the current token issues nothing.
    pub fn on_stabilized(
        &mut self,
        long_url: &str,
        api: &Arc<dyn LinkApi>,
        events: &EventSender,
    ) -> Option<RequestToken> {
        if long_url.is_empty() {
            self.coordinator.reset();
            return None;
        }

        let input = long_url.to_string();
        if self.coordinator.is_tracking(&input) {
            return None;
        }

        let api = Arc::clone(api);
        let count = self.count;
        let url = input.clone();
        let call = async move { api.suggest_aliases(&url, count).await };

        Some(
            self.coordinator
                .issue(input, call, events, FlowEvent::Suggestions),
        )
    }

    /// Applies a completion; suggestions beyond `count` are dropped.
    pub fn apply(&mut self, token: RequestToken, outcome: Outcome<Vec<String>>) -> bool {
        let count = self.count;
        let outcome = outcome.map(|mut aliases| {
            aliases.truncate(count);
            aliases
        });
        self.coordinator.complete(token, outcome)
    }

    pub fn slots(&self) -> SuggestionSlots {
        match self.coordinator.state() {
            FlowState::Idle => SuggestionSlots::Hidden,
            FlowState::Pending => SuggestionSlots::Placeholders(self.count),
            FlowState::Succeeded(aliases) => SuggestionSlots::Aliases(aliases.clone()),
            FlowState::Failed(_) => SuggestionSlots::Aliases(Vec::new()),
        }
    }
}
