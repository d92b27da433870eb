//! Per-flow request state.

use std::fmt;

use crate::error::FailureReason;

/// Result delivered by a finished request.
pub type Outcome<T> = Result<T, FailureReason>;

/// Which flow a coordinator serves. Used as a tracing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Suggestion,
    Availability,
    Submission,
    Redirect,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suggestion => write!(f, "suggestion"),
            Self::Availability => write!(f, "availability"),
            Self::Submission => write!(f, "submission"),
            Self::Redirect => write!(f, "redirect"),
        }
    }
}

/// The single `{status, data, error}` view of one flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(FailureReason),
}

impl<T> FlowState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Applies a finished request's outcome.
    ///
    /// Only `Pending` moves; terminal and idle states are returned unchanged,
    /// so a token can never leave a terminal state or re-enter `Pending`.
    pub fn resolve(self, outcome: Outcome<T>) -> Self {
        match self {
            Self::Pending => match outcome {
                Ok(value) => Self::Succeeded(value),
                Err(reason) => Self::Failed(reason),
            },
            other => other,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

impl<T> Default for FlowState<T> {
    fn default() -> Self {
        Self::Idle
    }
}
