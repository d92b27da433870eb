//! Alias resolution and the one-shot navigation that follows it.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};

use crate::api::LinkApi;
use crate::application::flows::{EventSender, FlowEvent};
use crate::application::pipeline::{Flow, FlowState, Outcome, RequestCoordinator, RequestToken};
use crate::domain::entities::RedirectOutcome;

/// Redirect page state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectState {
    Idle,
    Pending,
    Resolved(String),
    /// Resolution failed. `None` means render the not-found view.
    Failed(Option<String>),
}

/// Performs navigation side effects for the redirect page.
pub trait Navigator {
    /// Leaves the application for `url`.
    fn hard_navigate(&mut self, url: &str);

    /// Switches to another route inside the application.
    fn route_to(&mut self, path: &str);
}

/// Resolves an alias and navigates once.
///
/// Navigation is edge-triggered: it is keyed to the `(alias, outcome)` pair
/// and guarded, so observing the same resolved state again does nothing.
#[derive(Debug)]
pub struct RedirectFlow {
    coordinator: RequestCoordinator<String, String>,
    performed: Option<(String, RedirectOutcome)>,
}

impl Default for RedirectFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RedirectFlow {
    pub fn new() -> Self {
        Self {
            coordinator: RequestCoordinator::new(Flow::Redirect),
            performed: None,
        }
    }

    /// Issues the resolution request for `alias`.
    ///
    /// Entering the same alias again issues nothing.
    pub fn enter(
        &mut self,
        alias: &str,
        api: &Arc<dyn LinkApi>,
        events: &EventSender,
    ) -> Option<RequestToken> {
        if self.alias() == Some(alias) {
            return None;
        }

        let api = Arc::clone(api);
        let owned = alias.to_string();
        let call = async move { api.get_redirect(&owned).await };

        Some(
            self.coordinator
                .issue(alias.to_string(), call, events, FlowEvent::Redirect),
        )
    }

    pub fn apply(&mut self, token: RequestToken, outcome: Outcome<String>) -> bool {
        self.coordinator.complete(token, outcome)
    }

    pub fn alias(&self) -> Option<&str> {
        self.coordinator.current_input().map(String::as_str)
    }

    pub fn state(&self) -> RedirectState {
        match self.coordinator.state() {
            FlowState::Idle => RedirectState::Idle,
            FlowState::Pending => RedirectState::Pending,
            FlowState::Succeeded(url) => RedirectState::Resolved(url.clone()),
            FlowState::Failed(reason) => RedirectState::Failed(reason.redirect_to.clone()),
        }
    }

    /// Where the finished resolution points, if anywhere.
    pub fn outcome(&self) -> Option<RedirectOutcome> {
        match self.state() {
            RedirectState::Resolved(url) => Some(RedirectOutcome::Destination(url)),
            RedirectState::Failed(Some(path)) => Some(RedirectOutcome::Fallback(path)),
            RedirectState::Idle | RedirectState::Pending | RedirectState::Failed(None) => None,
        }
    }

    /// True when the resolution failed without a fallback route.
    pub fn is_not_found(&self) -> bool {
        self.state() == RedirectState::Failed(None)
    }

    /// Performs the navigation for the current outcome at most once.
    ///
    /// Returns the outcome if navigation happened during this call.
    pub fn observe(&mut self, navigator: &mut dyn Navigator) -> Option<RedirectOutcome> {
        let alias = self.alias()?.to_string();
        let outcome = self.outcome()?;

        if self
            .performed
            .as_ref()
            .is_some_and(|(done_alias, done)| *done_alias == alias && *done == outcome)
        {
            return None;
        }

        match &outcome {
            RedirectOutcome::Destination(url) => {
                info!(%alias, %url, "Redirecting to destination");
                navigator.hard_navigate(url);
            }
            RedirectOutcome::Fallback(path) => {
                warn!(%alias, %path, "Alias not resolved, routing to fallback");
                navigator.route_to(path);
            }
        }

        self.performed = Some((alias, outcome.clone()));
        Some(outcome)
    }
}

/// A redirect page: one flow plus its own completion channel.
pub struct RedirectPage {
    api: Arc<dyn LinkApi>,
    flow: RedirectFlow,
    events_tx: EventSender,
    events_rx: UnboundedReceiver<FlowEvent>,
}

impl RedirectPage {
    pub fn new(api: Arc<dyn LinkApi>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            flow: RedirectFlow::new(),
            events_tx,
            events_rx,
        }
    }

    pub fn flow(&self) -> &RedirectFlow {
        &self.flow
    }

    /// Resolves `alias`, waits for the answer and navigates once.
    pub async fn open(&mut self, alias: &str, navigator: &mut dyn Navigator) -> RedirectState {
        self.flow.enter(alias, &self.api, &self.events_tx);

        while self.flow.state() == RedirectState::Pending {
            match self.events_rx.recv().await {
                Some(FlowEvent::Redirect(token, outcome)) => {
                    self.flow.apply(token, outcome);
                }
                Some(_) => {}
                None => break,
            }
        }

        self.flow.observe(navigator);
        self.flow.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockLinkApi;
    use crate::error::ApiError;

    #[derive(Default)]
    struct RecordingNavigator {
        hard: Vec<String>,
        routes: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn hard_navigate(&mut self, url: &str) {
            self.hard.push(url.to_string());
        }

        fn route_to(&mut self, path: &str) {
            self.routes.push(path.to_string());
        }
    }

    fn api_resolving(result: Result<String, ApiError>) -> Arc<dyn LinkApi> {
        let mut mock = MockLinkApi::new();
        mock.expect_get_redirect()
            .withf(|alias| alias == "foo")
            .times(1)
            .returning(move |_| result.clone());
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_navigation_fires_exactly_once() {
        let mut page = RedirectPage::new(api_resolving(Ok("https://example.com".to_string())));
        let mut navigator = RecordingNavigator::default();

        let state = page.open("foo", &mut navigator).await;
        assert_eq!(state, RedirectState::Resolved("https://example.com".to_string()));

        // Re-observing the same resolved state must not navigate again.
        assert!(page.flow.observe(&mut navigator).is_none());
        assert!(page.flow.observe(&mut navigator).is_none());
        assert_eq!(page.open("foo", &mut navigator).await, state);

        assert_eq!(navigator.hard, vec!["https://example.com".to_string()]);
        assert!(navigator.routes.is_empty());
    }

    #[tokio::test]
    async fn test_failure_with_hint_routes_once() {
        let mut page = RedirectPage::new(api_resolving(Err(ApiError::not_found(
            "The requested URL was not found",
            Some("/404".to_string()),
        ))));
        let mut navigator = RecordingNavigator::default();

        let state = page.open("foo", &mut navigator).await;
        assert_eq!(state, RedirectState::Failed(Some("/404".to_string())));
        assert!(page.flow.observe(&mut navigator).is_none());

        assert_eq!(navigator.routes, vec!["/404".to_string()]);
        assert!(navigator.hard.is_empty());
        assert!(!page.flow().is_not_found());
    }

    #[tokio::test]
    async fn test_failure_without_hint_is_terminal() {
        let mut page = RedirectPage::new(api_resolving(Err(ApiError::Network(
            "connection refused".into(),
        ))));
        let mut navigator = RecordingNavigator::default();

        let state = page.open("foo", &mut navigator).await;

        assert_eq!(state, RedirectState::Failed(None));
        assert!(page.flow().is_not_found());
        assert!(page.flow().outcome().is_none());
        assert!(navigator.hard.is_empty());
        assert!(navigator.routes.is_empty());
    }

    #[test]
    fn test_observe_before_resolution_does_nothing() {
        let mut flow = RedirectFlow::new();
        let mut navigator = RecordingNavigator::default();

        assert!(flow.observe(&mut navigator).is_none());
        assert_eq!(flow.state(), RedirectState::Idle);
    }
}
