//! The shortening page: two debounced inputs feeding three flows.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::api::LinkApi;
use crate::application::flows::{
    AliasVerdict, AvailabilityFlow, AvailabilityIndicator, EventSender, FlowEvent, SubmissionFlow,
    SuggestionFlow, SuggestionSlots,
};
use crate::application::pipeline::{Debouncer, RequestToken};
use crate::config::{Config, DEFAULT_DEBOUNCE_MS, DEFAULT_PUBLIC_ORIGIN, DEFAULT_SUGGESTION_COUNT};
use crate::domain::entities::ShortLinkResult;
use crate::error::{InputLocked, SubmitRejected};
use crate::utils::{Clipboard, ClipboardResult};

/// Tunables for a [`ShortenSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub debounce: Duration,
    pub suggestion_count: usize,
    pub public_origin: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            suggestion_count: DEFAULT_SUGGESTION_COUNT,
            public_origin: DEFAULT_PUBLIC_ORIGIN.to_string(),
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            suggestion_count: config.suggestion_count,
            public_origin: config.public_origin.clone(),
        }
    }
}

/// Everything the shortening page renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub url: String,
    pub alias: String,
    pub suggestions: SuggestionSlots,
    pub availability: AvailabilityIndicator,
    pub inputs_locked: bool,
    pub action_label: &'static str,
    pub action_enabled: bool,
    pub short_link: Option<String>,
    pub error: Option<String>,
    /// True once the current short link has been copied.
    pub copied: bool,
}

/// Owner of the shortening page's state.
///
/// Input edits go through [`Self::set_url`] and [`Self::set_alias`] and only
/// reach the network once they stabilize. Time and completions are driven by
/// [`Self::step`] (or [`Self::settle`]); nothing happens between calls. All
/// mutation goes through `&mut self`, so a session has exactly one owner.
pub struct ShortenSession {
    api: Arc<dyn LinkApi>,
    settings: SessionSettings,
    url: String,
    alias: String,
    url_input: Debouncer<String>,
    alias_input: Debouncer<String>,
    suggestions: SuggestionFlow,
    availability: AvailabilityFlow,
    submission: SubmissionFlow,
    copied: Option<String>,
    events_tx: EventSender,
    events_rx: UnboundedReceiver<FlowEvent>,
}

impl ShortenSession {
    pub fn new(api: Arc<dyn LinkApi>, settings: SessionSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            api,
            url: String::new(),
            alias: String::new(),
            url_input: Debouncer::new(settings.debounce),
            alias_input: Debouncer::new(settings.debounce),
            suggestions: SuggestionFlow::new(settings.suggestion_count),
            availability: AvailabilityFlow::new(),
            submission: SubmissionFlow::new(),
            copied: None,
            settings,
            events_tx,
            events_rx,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn suggestions(&self) -> &SuggestionFlow {
        &self.suggestions
    }

    pub fn availability(&self) -> &AvailabilityFlow {
        &self.availability
    }

    pub fn submission(&self) -> &SubmissionFlow {
        &self.submission
    }

    /// Availability of the alias currently in the field.
    pub fn alias_verdict(&self) -> AliasVerdict {
        self.availability.verdict_for(&self.alias)
    }

    /// Replaces the URL field.
    ///
    /// A changed URL drops the previous short link or failure.
    ///
    /// # Errors
    ///
    /// [`InputLocked`] while a submission is pending.
    pub fn set_url(&mut self, value: impl Into<String>) -> Result<(), InputLocked> {
        self.ensure_unlocked()?;

        let value = value.into();
        if value == self.url {
            return Ok(());
        }

        self.submission.clear();
        self.copied = None;
        self.url_input.observe(value.clone());
        self.url = value;
        Ok(())
    }

    /// Replaces the alias field.
    ///
    /// # Errors
    ///
    /// [`InputLocked`] while a submission is pending.
    pub fn set_alias(&mut self, value: impl Into<String>) -> Result<(), InputLocked> {
        self.ensure_unlocked()?;

        let value = value.into();
        if value == self.alias {
            return Ok(());
        }

        self.alias_input.observe(value.clone());
        self.alias = value;
        Ok(())
    }

    /// Puts a suggested alias into the alias field.
    ///
    /// It is debounced and checked like a typed alias.
    ///
    /// # Errors
    ///
    /// [`InputLocked`] while a submission is pending.
    pub fn pick_suggestion(&mut self, alias: &str) -> Result<(), InputLocked> {
        debug!(alias, "Suggestion picked");
        self.set_alias(alias)
    }

    /// Checks the alias field again, e.g. after a failed check.
    ///
    /// Issues nothing while the alias is still settling, while its check is
    /// pending or when the field is empty.
    pub fn recheck_alias(&mut self) -> Option<RequestToken> {
        if self.alias_input.is_settling() {
            return None;
        }

        let token = self
            .availability
            .recheck(&self.alias, &self.api, &self.events_tx);
        if token.is_some() {
            debug!(alias = %self.alias, "Alias check repeated");
        }
        token
    }

    /// Submits the current URL and alias.
    ///
    /// # Errors
    ///
    /// Returns why the submission was refused. No request is issued then.
    pub fn submit(&mut self) -> Result<RequestToken, SubmitRejected> {
        let result = self.submission.submit(
            &self.url,
            &self.alias,
            &self.availability,
            &self.api,
            &self.events_tx,
        );

        if let Err(reason) = &result {
            info!(%reason, "Submission refused");
        }

        result
    }

    /// True while any flow waits for a response.
    pub fn is_busy(&self) -> bool {
        self.suggestions.state().is_pending()
            || self.availability.state().is_pending()
            || self.submission.is_pending()
    }

    /// True while an input has not stabilized yet.
    pub fn is_settling(&self) -> bool {
        self.url_input.is_settling() || self.alias_input.is_settling()
    }

    /// The earliest instant an input stabilizes, if any is settling.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.url_input.deadline(), self.alias_input.deadline()) {
            (Some(url), Some(alias)) => Some(url.min(alias)),
            (url, alias) => url.or(alias),
        }
    }

    /// Promotes inputs whose quiet period has passed and issues their requests.
    pub fn poll_inputs(&mut self, now: Instant) {
        if let Some(url) = self.url_input.poll_at(now) {
            debug!(%url, "URL stabilized");
            self.suggestions
                .on_stabilized(&url, &self.api, &self.events_tx);
        }

        if let Some(alias) = self.alias_input.poll_at(now) {
            debug!(%alias, "Alias stabilized");
            self.availability
                .on_stabilized(&alias, &self.api, &self.events_tx);
        }
    }

    /// Waits for the next thing to happen and applies it.
    ///
    /// That is either an input deadline passing or a completion arriving while
    /// a flow is pending. Returns `false` without waiting when neither can
    /// happen.
    pub async fn step(&mut self) -> bool {
        let deadline = self.next_deadline();
        let busy = self.is_busy();

        tokio::select! {
            () = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                self.poll_inputs(Instant::now());
                true
            }
            Some(event) = self.events_rx.recv(), if busy => {
                self.handle(event);
                true
            }
            else => false,
        }
    }

    /// Steps until every input is stable and no flow is pending.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Applies every completion already delivered, without waiting.
    ///
    /// Returns how many of them changed a flow.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.handle(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Routes a completion to its flow. Returns `false` if it was stale.
    pub fn handle(&mut self, event: FlowEvent) -> bool {
        match event {
            FlowEvent::Suggestions(token, outcome) => self.suggestions.apply(token, outcome),
            FlowEvent::Availability(token, outcome) => self.availability.apply(token, outcome),
            FlowEvent::Shortened(token, outcome) => {
                let applied = self.submission.apply(token, outcome);
                if applied && let Some(link) = self.short_link() {
                    info!(%link, "Short link created");
                }
                applied
            }
            FlowEvent::Redirect(token, _) => {
                debug!(%token, "Ignoring redirect completion");
                false
            }
        }
    }

    pub fn result(&self) -> Option<&ShortLinkResult> {
        self.submission.result()
    }

    /// The public short link of the last successful submission.
    pub fn short_link(&self) -> Option<String> {
        self.result()
            .map(|result| result.short_link(&self.settings.public_origin))
    }

    /// Copies the current short link.
    ///
    /// Returns the copied link, or `None` if there is nothing to copy.
    ///
    /// # Errors
    ///
    /// Propagates the clipboard's error.
    pub fn copy_short_link(
        &mut self,
        clipboard: &mut dyn Clipboard,
    ) -> ClipboardResult<Option<String>> {
        let Some(result) = self.result() else {
            return Ok(None);
        };

        let code = result.short_code.clone();
        let link = result.short_link(&self.settings.public_origin);
        clipboard.copy(&link)?;
        self.copied = Some(code);
        Ok(Some(link))
    }

    pub fn view(&self) -> SessionView {
        let copied = match (self.result(), &self.copied) {
            (Some(result), Some(code)) => result.short_code == *code,
            _ => false,
        };

        SessionView {
            url: self.url.clone(),
            alias: self.alias.clone(),
            suggestions: self.suggestions.slots(),
            availability: self.alias_verdict().indicator(),
            inputs_locked: self.submission.is_pending(),
            action_label: self.submission.action_label(),
            action_enabled: self
                .submission
                .check(&self.url, &self.alias, &self.availability)
                .is_ok(),
            short_link: self.short_link(),
            error: self.submission.error_message().map(str::to_string),
            copied,
        }
    }

    fn ensure_unlocked(&self) -> Result<(), InputLocked> {
        if self.submission.is_pending() {
            Err(InputLocked)
        } else {
            Ok(())
        }
    }
}
