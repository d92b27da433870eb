//! Token-based request coordination.
//!
//! A [`RequestCoordinator`] owns one flow's [`FlowState`]. Every issued request
//! gets a fresh [`RequestToken`]; only the most recent token is current. The
//! network call runs on a spawned task and reports back through a channel with
//! its token attached, and the owner feeds that completion into
//! [`RequestCoordinator::complete`]. Completions carrying a superseded token
//! are dropped without touching the state.
//!
//! Superseded calls are not aborted. They finish over the network and are
//! discarded by token comparison.

use std::fmt;
use std::future::Future;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::application::pipeline::flow_state::{Flow, FlowState, Outcome};
use crate::error::{ApiError, FailureReason};

/// Identifies one issued request within a flow.
///
/// Tokens increase monotonically per coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct Current<K> {
    token: RequestToken,
    input: K,
}

/// At-most-one-current-request state holder for a single flow.
///
/// `K` is the input a request was issued for, `T` the success payload.
#[derive(Debug)]
pub struct RequestCoordinator<K, T> {
    flow: Flow,
    minted: u64,
    current: Option<Current<K>>,
    state: FlowState<T>,
}

impl<K, T> RequestCoordinator<K, T>
where
    K: fmt::Debug + PartialEq,
{
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            minted: 0,
            current: None,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> &FlowState<T> {
        &self.state
    }

    /// The input behind the current token.
    pub fn current_input(&self) -> Option<&K> {
        self.current.as_ref().map(|current| &current.input)
    }

    pub fn current_token(&self) -> Option<RequestToken> {
        self.current.as_ref().map(|current| current.token)
    }

    /// True if the current token was issued for exactly this input.
    pub fn is_tracking(&self, input: &K) -> bool {
        self.current_input() == Some(input)
    }

    /// Mints a token for `input` and moves to `Pending`.
    ///
    /// Any previously issued token stops being current.
    pub fn begin(&mut self, input: K) -> RequestToken {
        self.minted += 1;
        let token = RequestToken(self.minted);

        if let Some(previous) = &self.current
            && self.state.is_pending()
        {
            debug!(
                flow = %self.flow,
                superseded = %previous.token,
                by = %token,
                "Request superseded"
            );
        }

        debug!(flow = %self.flow, %token, input = ?input, "Request issued");
        self.current = Some(Current { token, input });
        self.state = FlowState::Pending;
        token
    }

    /// Applies a completion.
    ///
    /// Returns `false` and leaves the state untouched if `token` is not the
    /// current one or the current request already finished.
    pub fn complete(&mut self, token: RequestToken, outcome: Outcome<T>) -> bool {
        let is_current = self.current_token() == Some(token);

        if !is_current || !self.state.is_pending() {
            debug!(flow = %self.flow, %token, "Discarded stale response");
            return false;
        }

        let state = std::mem::take(&mut self.state);
        self.state = state.resolve(outcome);
        debug!(flow = %self.flow, %token, status = self.state.status(), "Request finished");
        true
    }

    /// Returns to `Idle` and invalidates the current token.
    pub fn reset(&mut self) {
        if let Some(current) = self.current.take() {
            debug!(flow = %self.flow, token = %current.token, "Flow reset");
        }
        self.state = FlowState::Idle;
    }
}

impl<K, T> RequestCoordinator<K, T>
where
    K: fmt::Debug + PartialEq,
    T: Send + 'static,
{
    /// Issues a request: mints a token, goes `Pending` and spawns `call`.
    ///
    /// The completion is sent to `events` as `wrap(token, outcome)`. A closed
    /// channel means the owner is gone and the completion is dropped.
    pub fn issue<F, E, W>(
        &mut self,
        input: K,
        call: F,
        events: &UnboundedSender<E>,
        wrap: W,
    ) -> RequestToken
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
        E: Send + 'static,
        W: FnOnce(RequestToken, Outcome<T>) -> E + Send + 'static,
    {
        let token = self.begin(input);
        let events = events.clone();

        tokio::spawn(async move {
            let outcome = call.await.map_err(FailureReason::from);
            let _ = events.send(wrap(token, outcome));
        });

        token
    }
}
