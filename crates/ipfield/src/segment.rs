//! A single bounded-integer field of an address control.
//!
//! A [`Segment`] owns a short digit buffer, a cursor with an optional
//! selection, and an inclusive `[range_lower, range_upper]` byte range. Every
//! text change is validated immediately:
//!
//! - Text that is not a decimal integer becomes empty.
//! - A value above the upper bound is replaced by the upper bound.
//! - A full-width (three digit) value below the lower bound is replaced by the
//!   lower bound. Shorter values are left alone while the user is still
//!   typing and only snap up when the segment loses focus.
//! - Anything else is rewritten without leading zeros.
//!
//! Key handling never moves focus directly. Keys that should take the user to
//! another segment produce a [`KeyOutcome::Cede`] carrying a
//! [`CedeFocus`] request for the owning control to route.
//!
//! # Example
//!
//! ```
//! use ipfield::{KeyOutcome, KeyPressEvent, Segment};
//!
//! let mut segment = Segment::new(0);
//! for ch in ['1', '9'] {
//!     segment.handle_key(&KeyPressEvent::digit(ch).unwrap());
//! }
//! assert_eq!(segment.text(), "19");
//!
//! // The third digit fills the segment and asks to move on.
//! let outcome = segment.handle_key(&KeyPressEvent::digit('2').unwrap());
//! assert!(matches!(outcome, KeyOutcome::Cede(_)));
//! ```

use std::fmt;

use ipfield_core::logging::targets;

use crate::events::{Key, KeyPressEvent};
use crate::focus::{CedeAction, CedeFocus, Placement};

/// Maximum number of characters a user can type into a segment.
pub const MAX_LENGTH: usize = 3;

/// Smallest value a segment range can hold.
pub const MINIMUM_VALUE: u8 = u8::MIN;

/// Largest value a segment range can hold.
pub const MAXIMUM_VALUE: u8 = u8::MAX;

/// Result of offering a key press to a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key edited the text or moved the cursor.
    Handled,
    /// The key was swallowed without effect.
    Suppressed,
    /// The key is not for the segment; the host should process it.
    Ignored,
    /// The key asks for focus to move to another segment.
    Cede(CedeFocus),
}

impl KeyOutcome {
    /// Whether the key was consumed, so the host must not process it.
    pub fn is_consumed(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }

    /// The cede request carried by this outcome, if any.
    pub fn cede(&self) -> Option<CedeFocus> {
        match self {
            KeyOutcome::Cede(request) => Some(*request),
            _ => None,
        }
    }
}

/// One octet field of an address.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Position within the owning control.
    index: usize,

    /// Digit buffer.
    text: String,

    /// Inclusive lower bound.
    range_lower: u8,

    /// Inclusive upper bound.
    range_upper: u8,

    /// Cursor position (byte offset, always a char boundary).
    cursor_pos: usize,

    /// Selection anchor; the selection spans anchor..cursor.
    selection_anchor: Option<usize>,

    /// Whether edits are refused.
    read_only: bool,

    /// Whether Tab stops on this segment.
    tab_stop: bool,
}

impl Segment {
    /// Create an empty segment at `index` with the full 0..=255 range.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            text: String::new(),
            range_lower: MINIMUM_VALUE,
            range_upper: MAXIMUM_VALUE,
            cursor_pos: 0,
            selection_anchor: None,
            read_only: false,
            tab_stop: false,
        }
    }

    /// Set the range using builder pattern.
    pub fn with_range(mut self, lower: u8, upper: u8) -> Self {
        self.set_range(lower, upper);
        self
    }

    /// Set the text using builder pattern.
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    // =========================================================================
    // Text and Value
    // =========================================================================

    /// Position of this segment within its control.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the current text in characters.
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Whether the text is empty.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// The numeric value, clamped into the range.
    ///
    /// A blank segment reports its lower bound.
    pub fn value(&self) -> u8 {
        match self.parsed() {
            Some(value) => {
                let clamped = value.clamp(u32::from(self.range_lower), u32::from(self.range_upper));
                u8::try_from(clamped).unwrap_or(self.range_upper)
            }
            None => self.range_lower,
        }
    }

    /// Replace the text.
    ///
    /// The cursor moves to the start and the new text is validated, so
    /// non-numeric input leaves the segment blank and out-of-range input is
    /// clamped.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor_pos = 0;
        self.selection_anchor = None;
        self.apply_text_rules();
    }

    /// Set the value as text.
    pub fn set_value(&mut self, value: u8) {
        self.set_text(&value.to_string());
    }

    /// Empty the text and reset the cursor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_pos = 0;
        self.selection_anchor = None;
    }

    // =========================================================================
    // Range
    // =========================================================================

    /// The inclusive lower bound.
    pub fn range_lower(&self) -> u8 {
        self.range_lower
    }

    /// The inclusive upper bound.
    pub fn range_upper(&self) -> u8 {
        self.range_upper
    }

    /// Set the lower bound, clamped to the current upper bound.
    ///
    /// A non-blank value below the new bound snaps up to it.
    pub fn set_range_lower(&mut self, lower: u8) {
        self.range_lower = lower.min(self.range_upper);
        if let Some(value) = self.parsed()
            && value < u32::from(self.range_lower)
        {
            self.set_value(self.range_lower);
        }
    }

    /// Set the upper bound, clamped to at least the current lower bound.
    ///
    /// A value above the new bound snaps down to it.
    pub fn set_range_upper(&mut self, upper: u8) {
        self.range_upper = upper.max(self.range_lower);
        if let Some(value) = self.parsed()
            && value > u32::from(self.range_upper)
        {
            self.set_value(self.range_upper);
        }
    }

    /// Set both bounds at once.
    ///
    /// `upper` is taken as given and `lower` is clamped to it. The current
    /// value, if any, snaps to the nearest bound when it falls outside.
    pub fn set_range(&mut self, lower: u8, upper: u8) {
        self.range_upper = upper;
        self.range_lower = lower.min(upper);

        if let Some(value) = self.parsed() {
            if value < u32::from(self.range_lower) {
                self.set_value(self.range_lower);
            } else if value > u32::from(self.range_upper) {
                self.set_value(self.range_upper);
            }
        }
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Whether the segment refuses edits.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Set whether the segment refuses edits.
    ///
    /// Navigation and copying still work on a read-only segment.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether Tab stops on this segment.
    pub fn tab_stop(&self) -> bool {
        self.tab_stop
    }

    /// Set whether Tab stops on this segment.
    pub fn set_tab_stop(&mut self, tab_stop: bool) {
        self.tab_stop = tab_stop;
    }

    // =========================================================================
    // Cursor and Selection
    // =========================================================================

    /// The cursor position.
    pub fn cursor_position(&self) -> usize {
        self.cursor_pos
    }

    /// Start of the selection, or the cursor position when nothing is selected.
    pub fn selection_start(&self) -> usize {
        self.selection_range()
            .map(|(start, _)| start)
            .unwrap_or(self.cursor_pos)
    }

    /// Number of selected characters.
    pub fn selection_length(&self) -> usize {
        self.selection_range()
            .map(|(start, end)| end - start)
            .unwrap_or(0)
    }

    /// Whether any text is selected.
    pub fn has_selection(&self) -> bool {
        self.selection_range().is_some()
    }

    /// The selected text, empty when nothing is selected.
    pub fn selected_text(&self) -> &str {
        match self.selection_range() {
            Some((start, end)) => &self.text[start..end],
            None => "",
        }
    }

    /// Select the whole text.
    pub fn select_all(&mut self) {
        if self.text.is_empty() {
            self.cursor_pos = 0;
            self.selection_anchor = None;
        } else {
            self.selection_anchor = Some(0);
            self.cursor_pos = self.text.len();
        }
    }

    /// Select `length` characters starting at `start`.
    pub fn select(&mut self, start: usize, length: usize) {
        let start = start.min(self.text.len());
        let end = start.saturating_add(length).min(self.text.len());
        self.selection_anchor = (start != end).then_some(start);
        self.cursor_pos = end;
    }

    /// Move the cursor, clearing any selection.
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor_pos = pos.min(self.text.len());
        self.selection_anchor = None;
    }

    /// Selection as an ordered, non-empty `(start, end)` pair.
    fn selection_range(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?;
        let (start, end) = if anchor < self.cursor_pos {
            (anchor, self.cursor_pos)
        } else {
            (self.cursor_pos, anchor)
        };
        (start != end).then_some((start, end))
    }

    /// Delete the selected text. Returns `true` if anything was removed.
    fn delete_selection(&mut self) -> bool {
        if let Some((start, end)) = self.selection_range() {
            self.text.replace_range(start..end, "");
            self.cursor_pos = start;
            self.selection_anchor = None;
            return true;
        }
        self.selection_anchor = None;
        false
    }

    /// Move the cursor, extending the selection when `extend` is set.
    fn move_cursor(&mut self, to: usize, extend: bool) {
        if extend {
            if self.selection_anchor.is_none() {
                self.selection_anchor = Some(self.cursor_pos);
            }
        } else {
            self.selection_anchor = None;
        }
        self.cursor_pos = to.min(self.text.len());
        if self.selection_anchor == Some(self.cursor_pos) {
            self.selection_anchor = None;
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Apply a cursor placement when this segment receives focus.
    pub fn take_focus(&mut self, placement: Placement) {
        match placement {
            Placement::Start => self.set_cursor(0),
            Placement::End => self.set_cursor(self.text.len()),
            Placement::SelectAll => self.select_all(),
            Placement::TrimLast => {
                if self.text.pop().is_some() {
                    self.selection_anchor = None;
                    self.cursor_pos = self.cursor_pos.min(self.text.len());
                    self.apply_text_rules();
                }
                self.set_cursor(self.text.len());
            }
        }
    }

    /// Validation run when focus leaves the segment.
    ///
    /// A non-blank value below the lower bound snaps up to it. Returns `true`
    /// if the text changed.
    pub fn validate(&mut self) -> bool {
        if let Some(value) = self.parsed()
            && value < u32::from(self.range_lower)
        {
            tracing::debug!(
                target: targets::SEGMENT,
                index = self.index,
                value,
                lower = self.range_lower,
                "snapping to lower bound on focus loss"
            );
            self.set_value(self.range_lower);
            return true;
        }
        false
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Handle a key press.
    ///
    /// Digits insert at the cursor, Backspace and Delete edit, arrows move the
    /// cursor, and navigation that leaves the segment is returned as a
    /// [`KeyOutcome::Cede`]. Enter, Tab, modifier keys and the clipboard
    /// shortcuts (exactly Ctrl+C, Ctrl+X, Ctrl+V) are left to the caller.
    /// Everything else is suppressed.
    pub fn handle_key(&mut self, event: &KeyPressEvent) -> KeyOutcome {
        let modifiers = event.modifiers;

        match event.key {
            Key::Home => return self.cede(CedeAction::Home),
            Key::End => return self.cede(CedeAction::End),
            Key::Period | Key::NumpadDecimal | Key::Space => {
                if !self.is_blank() && !self.has_selection() && self.cursor_pos != 0 {
                    return self.cede(CedeAction::FORWARD_ALL);
                }
                return KeyOutcome::Suppressed;
            }
            Key::ArrowRight | Key::ArrowDown => {
                if modifiers.control {
                    return self.cede(CedeAction::FORWARD_ALL);
                }
                if !self.has_selection() && self.cursor_pos == self.text.len() {
                    return self.cede(CedeAction::FORWARD_NONE);
                }
                let to = match self.selection_range() {
                    Some((_, end)) if !modifiers.shift => end,
                    _ => self.cursor_pos + 1,
                };
                self.move_cursor(to, modifiers.shift);
                return KeyOutcome::Handled;
            }
            Key::ArrowLeft | Key::ArrowUp => {
                if modifiers.control {
                    return self.cede(CedeAction::REVERSE_ALL);
                }
                if !self.has_selection() && self.cursor_pos == 0 {
                    return self.cede(CedeAction::REVERSE_NONE);
                }
                let to = match self.selection_range() {
                    Some((start, _)) if !modifiers.shift => start,
                    _ => self.cursor_pos.saturating_sub(1),
                };
                self.move_cursor(to, modifiers.shift);
                return KeyOutcome::Handled;
            }
            Key::Backspace => return self.backspace(),
            Key::Delete => return self.delete_forward(),
            Key::Enter | Key::NumpadEnter | Key::Tab => return KeyOutcome::Ignored,
            Key::C | Key::X | Key::V if event.is_ctrl_only() => return KeyOutcome::Ignored,
            key if key.is_modifier() => return KeyOutcome::Ignored,
            _ => {}
        }

        match event.key.digit() {
            Some(ch) if modifiers.none() => self.insert_digit(ch),
            _ => KeyOutcome::Suppressed,
        }
    }

    /// Insert pasted text at the cursor, replacing any selection.
    ///
    /// The payload is truncated to the remaining capacity and the result is
    /// validated like typed input.
    pub fn paste(&mut self, text: &str) -> KeyOutcome {
        if self.read_only {
            return KeyOutcome::Suppressed;
        }

        let kept = self.text.len() - self.selection_length();
        let capacity = MAX_LENGTH.saturating_sub(kept);
        let insert: String = text.chars().take(capacity).collect();
        if insert.is_empty() {
            return KeyOutcome::Suppressed;
        }

        self.delete_selection();
        self.text.insert_str(self.cursor_pos, &insert);
        self.cursor_pos += insert.len();
        self.apply_text_rules();
        self.auto_advance()
    }

    /// Remove and return the selected text.
    ///
    /// Returns `None` when nothing is selected or the segment is read-only.
    pub fn cut(&mut self) -> Option<String> {
        if self.read_only {
            return None;
        }
        let removed = self.selected_text().to_string();
        if removed.is_empty() {
            return None;
        }
        self.delete_selection();
        self.apply_text_rules();
        Some(removed)
    }

    fn insert_digit(&mut self, ch: char) -> KeyOutcome {
        if self.read_only || (!self.has_selection() && self.text.len() >= MAX_LENGTH) {
            return KeyOutcome::Suppressed;
        }

        self.delete_selection();
        self.text.insert(self.cursor_pos, ch);
        self.cursor_pos += ch.len_utf8();
        self.apply_text_rules();
        self.auto_advance()
    }

    fn backspace(&mut self) -> KeyOutcome {
        if self.read_only {
            return KeyOutcome::Suppressed;
        }
        if self.is_blank() || (self.cursor_pos == 0 && !self.has_selection()) {
            return self.cede(CedeAction::Trim);
        }

        if !self.delete_selection() {
            let prev = self.text[..self.cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.replace_range(prev..self.cursor_pos, "");
            self.cursor_pos = prev;
        }
        self.apply_text_rules();
        KeyOutcome::Handled
    }

    fn delete_forward(&mut self) -> KeyOutcome {
        if self.read_only {
            return KeyOutcome::Suppressed;
        }

        if !self.delete_selection() {
            if self.cursor_pos >= self.text.len() {
                return KeyOutcome::Handled;
            }
            let next = self.text[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.text.len());
            self.text.replace_range(self.cursor_pos..next, "");
        }
        self.apply_text_rules();
        KeyOutcome::Handled
    }

    fn cede(&self, action: CedeAction) -> KeyOutcome {
        tracing::trace!(target: targets::SEGMENT, index = self.index, ?action, "ceding focus");
        KeyOutcome::Cede(CedeFocus::new(self.index, action))
    }

    /// A full segment with the cursor at the end moves on to the next one.
    fn auto_advance(&self) -> KeyOutcome {
        if self.text.len() == MAX_LENGTH
            && self.cursor_pos == MAX_LENGTH
            && !self.has_selection()
        {
            return self.cede(CedeAction::FORWARD_ALL);
        }
        KeyOutcome::Handled
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn parsed(&self) -> Option<u32> {
        parse_digits(&self.text)
    }

    /// Normalize the text after it changed.
    fn apply_text_rules(&mut self) {
        if self.text.is_empty() {
            return;
        }

        match self.parsed() {
            None => {
                tracing::trace!(target: targets::SEGMENT, index = self.index, text = %self.text, "discarding non-numeric text");
                self.clear();
            }
            Some(value) if value > u32::from(self.range_upper) => {
                tracing::debug!(target: targets::SEGMENT, index = self.index, value, upper = self.range_upper, "clamping to upper bound");
                self.replace_with_bound(self.range_upper);
            }
            Some(value)
                if self.text.len() == MAX_LENGTH && value < u32::from(self.range_lower) =>
            {
                tracing::debug!(target: targets::SEGMENT, index = self.index, value, lower = self.range_lower, "clamping to lower bound");
                self.replace_with_bound(self.range_lower);
            }
            Some(value) => {
                let canonical = value.to_string();
                let removed = self.text.len().saturating_sub(canonical.len());
                if removed > 0 {
                    self.cursor_pos = self.cursor_pos.saturating_sub(removed);
                    self.selection_anchor = None;
                }
                self.text = canonical;
                self.cursor_pos = self.cursor_pos.min(self.text.len());
            }
        }
    }

    fn replace_with_bound(&mut self, bound: u8) {
        self.text = bound.to_string();
        self.cursor_pos = 0;
        self.selection_anchor = None;
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Parse a string made only of ASCII digits.
fn parse_digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
