//! Helpers for the terminal front-end.
//!
//! - [`clipboard`] - Copying short links to the system clipboard

pub mod clipboard;

pub use clipboard::{
    Clipboard, ClipboardResult, MemoryClipboard, Osc52Clipboard, SystemClipboard,
    TerminalClipboard, WithFallback,
};
