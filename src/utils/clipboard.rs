//! Clipboard access for copying short links.
//!
//! [`SystemClipboard`] talks to the desktop clipboard. Over SSH or on a bare
//! console there is none, so [`TerminalClipboard`] falls back to the OSC 52
//! escape sequence, which most terminal emulators (and tmux with
//! `set-clipboard on`) forward to the local clipboard.

use std::error::Error;

use copypasta_ext::copypasta::ClipboardProvider;
use copypasta_ext::osc52::Osc52ClipboardContext;
use tracing::{debug, warn};

#[cfg(all(unix, not(target_os = "macos")))]
use copypasta_ext::x11_fork::ClipboardContext;

#[cfg(not(all(unix, not(target_os = "macos"))))]
use copypasta_ext::copypasta::ClipboardContext;

pub type ClipboardResult<T> = Result<T, Box<dyn Error + Send + Sync + 'static>>;

/// Destination for copied text.
pub trait Clipboard {
    /// Places `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the text could not be handed over.
    fn copy(&mut self, text: &str) -> ClipboardResult<()>;
}

/// The desktop clipboard.
///
/// On X11 the contents are served by a forked process, so they outlive the
/// CLI.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> ClipboardResult<()> {
        let mut ctx = ClipboardContext::new()?;
        ctx.set_contents(text.to_string())?;
        debug!(copied = %text, "Copied to system clipboard");
        Ok(())
    }
}

/// OSC 52 "set clipboard" sequence written to the terminal. Set only.
#[derive(Debug, Default)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn copy(&mut self, text: &str) -> ClipboardResult<()> {
        let mut ctx = Osc52ClipboardContext::new()?;
        ctx.set_contents(text.to_string())?;
        debug!(copied = %text, "Copied through OSC 52");
        Ok(())
    }
}

/// Tries `primary` and hands the text to `fallback` when it fails.
#[derive(Debug, Default)]
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
}

/// System clipboard first, OSC 52 when no system clipboard is reachable.
pub type TerminalClipboard = WithFallback<SystemClipboard, Osc52Clipboard>;

impl<P, F> WithFallback<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn into_parts(self) -> (P, F) {
        (self.primary, self.fallback)
    }
}

impl<P: Clipboard, F: Clipboard> Clipboard for WithFallback<P, F> {
    fn copy(&mut self, text: &str) -> ClipboardResult<()> {
        match self.primary.copy(text) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Clipboard unavailable, using fallback");
                self.fallback.copy(text)
            }
        }
    }
}

/// In-process clipboard. Keeps every copied value in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    copied: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.copied.last().map(String::as_str)
    }

    pub fn copies(&self) -> usize {
        self.copied.len()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> ClipboardResult<()> {
        self.copied.push(text.to_string());
        Ok(())
    }
}
