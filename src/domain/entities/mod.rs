//! Results produced by completed flows.
//!
//! - [`ShortLinkResult`] - The outcome of a successful submission
//! - [`RedirectOutcome`] - Where a redirect resolution sends the user

pub mod redirect;
pub mod short_link;

pub use redirect::RedirectOutcome;
pub use short_link::ShortLinkResult;
