//! Flow-agnostic building blocks of the input pipeline.
//!
//! - [`debounce`] - Turns keystrokes into stabilized values
//! - [`coordinator`] - Issues requests and discards stale responses
//! - [`flow_state`] - The `Idle / Pending / Succeeded / Failed` view of a flow

pub mod coordinator;
pub mod debounce;
pub mod flow_state;

pub use coordinator::{RequestCoordinator, RequestToken};
pub use debounce::Debouncer;
pub use flow_state::{Flow, FlowState, Outcome};
