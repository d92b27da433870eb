//! Redirect outcome entity.

use std::fmt;

/// Where a finished redirect resolution sends the user.
///
/// Consumed exactly once by the redirect flow's navigation guard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RedirectOutcome {
    /// Hard navigation to the resolved destination URL.
    Destination(String),
    /// Client-side route change to the fallback supplied by a failed resolution.
    Fallback(String),
}

impl RedirectOutcome {
    pub fn target(&self) -> &str {
        match self {
            Self::Destination(url) | Self::Fallback(url) => url,
        }
    }
}

impl fmt::Display for RedirectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destination(url) => write!(f, "navigate to {url}"),
            Self::Fallback(path) => write!(f, "route to {path}"),
        }
    }
}
