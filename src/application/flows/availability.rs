//! Availability checks for the stabilized custom alias.

use std::sync::Arc;

use crate::api::LinkApi;
use crate::application::flows::{EventSender, FlowEvent};
use crate::application::pipeline::{Flow, FlowState, Outcome, RequestCoordinator, RequestToken};
use crate::error::{FailureReason, SubmitRejected};

/// Availability of one specific alias, as known right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasVerdict {
    /// The alias field is empty; availability does not apply.
    NotApplicable,
    /// No request has been issued for this alias yet (still debouncing).
    Unchecked,
    Checking,
    Available,
    /// The service reported the alias as taken. Not an error.
    Taken,
    /// The check itself failed.
    Unverified(FailureReason),
}

impl AliasVerdict {
    /// Only an empty alias or a confirmed available one lets submission through.
    pub fn permits_submission(&self) -> bool {
        matches!(self, Self::NotApplicable | Self::Available)
    }

    pub fn indicator(&self) -> AvailabilityIndicator {
        match self {
            Self::NotApplicable => AvailabilityIndicator::None,
            Self::Unchecked | Self::Checking => AvailabilityIndicator::Checking,
            Self::Available => AvailabilityIndicator::Available,
            Self::Taken => AvailabilityIndicator::Taken,
            Self::Unverified(reason) => {
                AvailabilityIndicator::Unverified(reason.user_message().to_string())
            }
        }
    }
}

/// What the alias field shows next to the input.
///
/// `Taken` and `Unverified` block submission the same way but read
/// differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityIndicator {
    /// No indicator at all (empty alias).
    None,
    Checking,
    Available,
    Taken,
    Unverified(String),
}

impl AvailabilityIndicator {
    pub fn message(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Checking => Some("Checking availability...".to_string()),
            Self::Available => Some("Alias is available".to_string()),
            Self::Taken => Some("Alias is already taken".to_string()),
            Self::Unverified(reason) => Some(format!("Could not verify alias: {reason}")),
        }
    }
}

/// Turns a stabilized alias into an availability verdict.
///
/// The newest stabilized alias always wins: an answer for an alias the user
/// has since edited away is discarded by the coordinator.
#[derive(Debug)]
pub struct AvailabilityFlow {
    coordinator: RequestCoordinator<String, bool>,
}

impl Default for AvailabilityFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityFlow {
    pub fn new() -> Self {
        Self {
            coordinator: RequestCoordinator::new(Flow::Availability),
        }
    }

    pub fn state(&self) -> &FlowState<bool> {
        self.coordinator.state()
    }

    /// The alias the current state belongs to.
    pub fn checked_alias(&self) -> Option<&str> {
        self.coordinator.current_input().map(String::as_str)
    }

    /// Reacts to a newly stabilized alias.
    ///
    /// An empty alias issues nothing and drops any in-flight check. An alias
    /// already behind the current token issues nothing either.
    pub fn on_stabilized(
        &mut self,
        alias: &str,
        api: &Arc<dyn LinkApi>,
        events: &EventSender,
    ) -> Option<RequestToken> {
        if alias.is_empty() {
            self.coordinator.reset();
            return None;
        }

        if self.checked_alias() == Some(alias) {
            return None;
        }

        Some(self.issue(alias, api, events))
    }

    /// Checks `alias` again even though it is the alias already behind the
    /// current token.
    ///
    /// Issues nothing for an empty alias or while its check is still pending.
    pub fn recheck(
        &mut self,
        alias: &str,
        api: &Arc<dyn LinkApi>,
        events: &EventSender,
    ) -> Option<RequestToken> {
        if alias.is_empty() || self.verdict_for(alias) == AliasVerdict::Checking {
            return None;
        }

        Some(self.issue(alias, api, events))
    }

    fn issue(&mut self, alias: &str, api: &Arc<dyn LinkApi>, events: &EventSender) -> RequestToken {
        let api = Arc::clone(api);
        let owned = alias.to_string();
        let call = async move {
            api.check_alias_availability(&owned)
                .await
                .map(|availability| availability.is_available)
        };

        self.coordinator
            .issue(alias.to_string(), call, events, FlowEvent::Availability)
    }

    pub fn apply(&mut self, token: RequestToken, outcome: Outcome<bool>) -> bool {
        self.coordinator.complete(token, outcome)
    }

    /// Availability of `alias`, which is normally the live alias field value.
    ///
    /// A state recorded for a different alias says nothing about this one and
    /// reads as [`AliasVerdict::Unchecked`].
    pub fn verdict_for(&self, alias: &str) -> AliasVerdict {
        if alias.is_empty() {
            return AliasVerdict::NotApplicable;
        }

        if self.checked_alias() != Some(alias) {
            return AliasVerdict::Unchecked;
        }

        match self.coordinator.state() {
            FlowState::Idle => AliasVerdict::Unchecked,
            FlowState::Pending => AliasVerdict::Checking,
            FlowState::Succeeded(true) => AliasVerdict::Available,
            FlowState::Succeeded(false) => AliasVerdict::Taken,
            FlowState::Failed(reason) => AliasVerdict::Unverified(reason.clone()),
        }
    }

    /// Submission gate for `alias`.
    ///
    /// # Errors
    ///
    /// Returns the [`SubmitRejected`] variant matching why the alias cannot be
    /// used yet.
    pub fn gate(&self, alias: &str) -> Result<(), SubmitRejected> {
        match self.verdict_for(alias) {
            AliasVerdict::NotApplicable | AliasVerdict::Available => Ok(()),
            AliasVerdict::Unchecked | AliasVerdict::Checking => Err(SubmitRejected::AliasChecking {
                alias: alias.to_string(),
            }),
            AliasVerdict::Taken => Err(SubmitRejected::AliasTaken {
                alias: alias.to_string(),
            }),
            AliasVerdict::Unverified(reason) => Err(SubmitRejected::AliasUnverified {
                alias: alias.to_string(),
                reason: reason.user_message().to_string(),
            }),
        }
    }
}
