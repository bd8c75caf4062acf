//! The fixed glyph drawn between two segments.

use std::fmt;

/// The glyph separating segments of a dotted-quad address.
pub const SEPARATOR: &str = ".";

/// A static, non-editable element between two segments.
///
/// A separator only carries the glyph and mirrors the control's read-only
/// state so the host can render it accordingly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator {
    text: &'static str,
    read_only: bool,
}

impl Default for Separator {
    fn default() -> Self {
        Self::new()
    }
}

impl Separator {
    /// Create a separator showing [`SEPARATOR`].
    pub fn new() -> Self {
        Self {
            text: SEPARATOR,
            read_only: false,
        }
    }

    /// The glyph.
    pub fn text(&self) -> &'static str {
        self.text
    }

    /// Whether the separator is read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Set read-only mode; cascaded from the owning control.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}
