#![allow(dead_code)]

use async_trait::async_trait;
use lnkup::api::LinkApi;
use lnkup::api::dto::{AliasAvailability, LinkCreate, LinkMetadata, LinkResponse};
use lnkup::application::session::{SessionSettings, ShortenSession};
use lnkup::error::ApiError;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Scripted<T> = (Duration, Result<T, ApiError>);

/// `LinkApi` fake with per-input latency and canned answers.
///
/// Unscripted inputs answer immediately: no suggestions, alias available,
/// shorten succeeds with code `a1b2c3d4`, redirect not found.
#[derive(Default)]
pub struct ScriptedApi {
    suggestions: HashMap<String, Scripted<Vec<String>>>,
    availability: HashMap<String, Scripted<bool>>,
    failed_checks: Mutex<HashMap<String, VecDeque<ApiError>>>,
    redirects: HashMap<String, Scripted<String>>,
    shorten: Mutex<VecDeque<Scripted<String>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suggestions(mut self, url: &str, delay_ms: u64, aliases: &[&str]) -> Self {
        let aliases = aliases.iter().map(|a| a.to_string()).collect();
        self.suggestions
            .insert(url.to_string(), (Duration::from_millis(delay_ms), Ok(aliases)));
        self
    }

    pub fn with_suggestion_error(mut self, url: &str, err: ApiError) -> Self {
        self.suggestions
            .insert(url.to_string(), (Duration::ZERO, Err(err)));
        self
    }

    pub fn with_availability(mut self, alias: &str, delay_ms: u64, is_available: bool) -> Self {
        self.availability.insert(
            alias.to_string(),
            (Duration::from_millis(delay_ms), Ok(is_available)),
        );
        self
    }

    pub fn with_availability_error(mut self, alias: &str, err: ApiError) -> Self {
        self.availability
            .insert(alias.to_string(), (Duration::ZERO, Err(err)));
        self
    }

    /// Fails the next check of `alias` once, then answers as scripted.
    pub fn with_failed_check(self, alias: &str, err: ApiError) -> Self {
        self.failed_checks
            .lock()
            .unwrap()
            .entry(alias.to_string())
            .or_default()
            .push_back(err);
        self
    }

    pub fn with_redirect(mut self, alias: &str, result: Result<&str, ApiError>) -> Self {
        self.redirects.insert(
            alias.to_string(),
            (Duration::from_millis(20), result.map(str::to_string)),
        );
        self
    }

    /// Queues the answer of the next shorten call. `Ok` carries the code.
    pub fn with_shorten(self, delay_ms: u64, result: Result<&str, ApiError>) -> Self {
        self.shorten
            .lock()
            .unwrap()
            .push_back((Duration::from_millis(delay_ms), result.map(str::to_string)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls of one operation, e.g. `"check"`.
    pub fn count(&self, operation: &str) -> usize {
        let prefix = format!("{operation}:");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    fn record(&self, operation: &str, input: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation}:{input}"));
    }
}

async fn answer<T>((delay, result): Scripted<T>) -> Result<T, ApiError> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    result
}

#[async_trait]
impl LinkApi for ScriptedApi {
    async fn suggest_aliases(&self, long_url: &str, _count: usize) -> Result<Vec<String>, ApiError> {
        // Scripted lists are returned untrimmed so callers can check their own bound.
        self.record("suggest", long_url);
        let scripted = self
            .suggestions
            .get(long_url)
            .cloned()
            .unwrap_or((Duration::ZERO, Ok(Vec::new())));
        answer(scripted).await
    }

    async fn shorten(&self, request: LinkCreate) -> Result<LinkResponse, ApiError> {
        self.record("shorten", &request.long_url);
        let scripted = self
            .shorten
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok("a1b2c3d4".to_string())));
        let code = answer(scripted).await?;

        Ok(LinkResponse {
            shortened_url: request.name.clone().unwrap_or(code),
            long_url: request.long_url,
            metadata: LinkMetadata {
                clicks: 0,
                last_ip: None,
                custom_name: request.name,
            },
        })
    }

    async fn check_alias_availability(&self, alias: &str) -> Result<AliasAvailability, ApiError> {
        self.record("check", alias);
        let failure = self
            .failed_checks
            .lock()
            .unwrap()
            .get_mut(alias)
            .and_then(VecDeque::pop_front);
        if let Some(err) = failure {
            return Err(err);
        }

        let scripted = self
            .availability
            .get(alias)
            .cloned()
            .unwrap_or((Duration::ZERO, Ok(true)));

        Ok(AliasAvailability {
            alias: alias.to_string(),
            is_available: answer(scripted).await?,
        })
    }

    async fn get_redirect(&self, alias: &str) -> Result<String, ApiError> {
        self.record("redirect", alias);
        let scripted = self.redirects.get(alias).cloned().unwrap_or((
            Duration::ZERO,
            Err(ApiError::not_found("The requested URL was not found", None)),
        ));
        answer(scripted).await
    }

    async fn get_metadata(&self, short_code: &str) -> Result<LinkMetadata, ApiError> {
        self.record("metadata", short_code);
        Ok(LinkMetadata::default())
    }
}

pub fn create_session(api: &Arc<ScriptedApi>) -> ShortenSession {
    let api: Arc<dyn LinkApi> = api.clone();
    ShortenSession::new(api, SessionSettings::default())
}

/// Types `text` into the URL field one character at a time.
pub fn type_url(session: &mut ShortenSession, text: &str) {
    for (i, c) in text.char_indices() {
        session.set_url(&text[..i + c.len_utf8()]).unwrap();
    }
}

/// Types `text` into the alias field one character at a time.
pub fn type_alias(session: &mut ShortenSession, text: &str) {
    for (i, c) in text.char_indices() {
        session.set_alias(&text[..i + c.len_utf8()]).unwrap();
    }
}
