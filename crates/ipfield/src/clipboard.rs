//! Clipboard backends for copy, cut and paste.
//!
//! The address control talks to the clipboard through the [`TextClipboard`]
//! trait. Two backends are provided:
//!
//! - [`MemoryClipboard`]: a process-local buffer, used by default and in tests
//! - [`SystemClipboard`]: the platform clipboard via the `arboard` crate
//!
//! # Example
//!
//! ```ignore
//! use ipfield::{AddressControl, SystemClipboard};
//!
//! let control = match SystemClipboard::new() {
//!     Ok(clipboard) => AddressControl::new().with_clipboard(clipboard),
//!     Err(_) => AddressControl::new(),
//! };
//! ```
//!
//! # Platform Notes
//!
//! - **Windows**: Uses the Win32 clipboard API
//! - **macOS**: Uses NSPasteboard
//! - **Linux**: Uses X11 selections or Wayland data-control protocol

use std::fmt;

/// Error type for clipboard operations.
#[derive(Debug)]
pub struct ClipboardError {
    message: String,
}

impl ClipboardError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clipboard error: {}", self.message)
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Plain-text clipboard access.
pub trait TextClipboard {
    /// Get the current text content.
    fn get_text(&mut self) -> Result<String, ClipboardError>;

    /// Replace the clipboard content with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// A clipboard held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clipboard already holding `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }

    /// The current contents, if any.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl TextClipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.contents
            .clone()
            .ok_or_else(|| ClipboardError::new("the clipboard is empty"))
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The platform clipboard.
///
/// Clipboard operations are best performed on the main/UI thread for
/// compatibility across platforms.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Open the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be accessed, which can happen
    /// if the system clipboard is unavailable or locked by another process.
    pub fn new() -> Result<Self, ClipboardError> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

impl fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl TextClipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.inner.get_text().map_err(Into::into)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner.set_text(text).map_err(Into::into)
    }
}
