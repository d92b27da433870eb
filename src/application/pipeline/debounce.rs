//! Deadline-based input debouncing.

use std::time::Duration;

use tokio::time::Instant;

/// Delays an input value until it has been stable for a quiet period.
///
/// The debouncer owns no timer. It records a deadline, and the owner's event
/// loop sleeps until [`Debouncer::deadline`] and then calls
/// [`Debouncer::poll_at`]. This keeps the debouncer a plain value that can be
/// driven with explicit instants in tests.
///
/// # Behavior
///
/// - Observing a value different from the latest one re-arms the deadline
/// - Observing the latest value again changes nothing
/// - Once the deadline passes, the value becomes the stabilized value
/// - A value that settles back to the current stabilized value produces no
///   new stabilization
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    stabilized: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq + Default> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            stabilized: T::default(),
            pending: None,
        }
    }

    pub fn observe(&mut self, value: T) {
        self.observe_at(value, Instant::now());
    }

    pub fn observe_at(&mut self, value: T, now: Instant) {
        let latest = self
            .pending
            .as_ref()
            .map_or(&self.stabilized, |(pending, _)| pending);

        if *latest == value {
            return;
        }

        self.pending = Some((value, now + self.quiet));
    }

    /// When the pending value stabilizes, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Promotes the pending value if its deadline has passed.
    ///
    /// Returns the newly stabilized value, or `None` if nothing changed.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_none_or(|deadline| deadline > now) {
            return None;
        }

        let (value, _) = self.pending.take()?;
        if value == self.stabilized {
            return None;
        }

        self.stabilized = value.clone();
        Some(value)
    }

    pub fn stabilized(&self) -> &T {
        &self.stabilized
    }

    /// True while a change is waiting out its quiet period.
    pub fn is_settling(&self) -> bool {
        self.pending.is_some()
    }
}
