//! The dotted-quad address control.
//!
//! [`AddressControl`] owns four [`Segment`]s separated by three
//! [`Separator`]s and makes them behave like a single input field: typing a
//! full octet moves on to the next segment, Backspace at the start of a
//! segment eats into the previous one, arrows and Home/End travel across
//! segment boundaries, and pasting or dropping a dotted address fills every
//! segment at once.
//!
//! The control is headless. The host UI framework feeds it key events and
//! focus changes, polls [`AddressControl::take_repaint`] to know when to
//! redraw, and renders segments and separators however it likes.
//!
//! # Example
//!
//! ```
//! use ipfield::{AddressControl, Key, KeyPressEvent};
//!
//! let mut control = AddressControl::new();
//! control.text_changed.connect(|text| println!("address is now {}", text));
//!
//! control.focus();
//! for ch in "192168".chars() {
//!     control.handle_key(&KeyPressEvent::digit(ch).unwrap());
//! }
//! assert_eq!(control.text(), "192.168..");
//! assert_eq!(control.focused_field(), Some(2));
//!
//! control.set_text("10.0.0.1");
//! assert_eq!(control.bytes(), [10, 0, 0, 1]);
//! ```

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use ipfield_core::Signal;
use ipfield_core::logging::targets;

use crate::clipboard::{MemoryClipboard, TextClipboard};
use crate::events::{Key, KeyPressEvent};
use crate::focus::{CedeAction, CedeFocus, FocusCoordinator, FocusTarget, Placement};
use crate::segment::{KeyOutcome, Segment};
use crate::separator::{SEPARATOR, Separator};

/// Number of segments in an address.
pub const FIELD_COUNT: usize = 4;

/// Payload of [`AddressControl::field_changed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChanged {
    /// Index of the segment whose text changed.
    pub field_index: usize,
    /// The segment's new text.
    pub text: String,
}

/// A segmented IPv4 address entry control.
///
/// # Signals
///
/// - `field_changed(FieldChanged)`: Emitted after a segment's text changes
/// - `text_changed(String)`: Emitted with the whole text after each field change
/// - `focus_changed(bool)`: Emitted when the control gains or loses focus
pub struct AddressControl {
    /// The four octet fields.
    segments: [Segment; FIELD_COUNT],

    /// Glyphs between the fields.
    separators: [Separator; FIELD_COUNT - 1],

    /// Routes cede requests between fields.
    coordinator: FocusCoordinator,

    /// Index of the focused field, if the control has focus.
    focused: Option<usize>,

    /// Whether the control is read-only.
    read_only: bool,

    /// Whether Tab moves between fields.
    allow_internal_tab: bool,

    /// Set when the host should repaint.
    needs_repaint: bool,

    /// Copy/cut/paste backend.
    clipboard: Box<dyn TextClipboard>,

    /// Signal emitted when a field's text changes.
    pub field_changed: Signal<FieldChanged>,

    /// Signal emitted with the whole text when any field changes.
    pub text_changed: Signal<String>,

    /// Signal emitted when the control gains (`true`) or loses focus.
    pub focus_changed: Signal<bool>,
}

impl Default for AddressControl {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressControl {
    /// Create a blank control with an in-memory clipboard.
    pub fn new() -> Self {
        Self {
            segments: std::array::from_fn(Segment::new),
            separators: std::array::from_fn(|_| Separator::new()),
            coordinator: FocusCoordinator::new(FIELD_COUNT),
            focused: None,
            read_only: false,
            allow_internal_tab: false,
            needs_repaint: true,
            clipboard: Box::new(MemoryClipboard::new()),
            field_changed: Signal::new(),
            text_changed: Signal::new(),
            focus_changed: Signal::new(),
        }
    }

    /// Set read-only mode using builder pattern.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.set_read_only(read_only);
        self
    }

    /// Set internal tabbing using builder pattern.
    pub fn with_allow_internal_tab(mut self, allow: bool) -> Self {
        self.set_allow_internal_tab(allow);
        self
    }

    /// Set the clipboard backend using builder pattern.
    pub fn with_clipboard<C: TextClipboard + 'static>(mut self, clipboard: C) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    // =========================================================================
    // Segments
    // =========================================================================

    /// The segment at `index`.
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// All segments in order.
    pub fn segments(&self) -> &[Segment; FIELD_COUNT] {
        &self.segments
    }

    /// All separators in order.
    pub fn separators(&self) -> &[Separator; FIELD_COUNT - 1] {
        &self.separators
    }

    // =========================================================================
    // Value
    // =========================================================================

    /// The four segment values in order.
    ///
    /// Blank segments report their lower bound.
    pub fn bytes(&self) -> [u8; FIELD_COUNT] {
        std::array::from_fn(|index| self.segments[index].value())
    }

    /// Clear the control, then fill segments from `bytes`.
    ///
    /// Extra bytes are ignored; missing ones leave their segments blank.
    pub fn set_bytes(&mut self, bytes: &[u8]) {
        tracing::debug!(target: targets::ADDRESS, ?bytes, "setting address bytes");
        self.clear();
        for (index, &byte) in bytes.iter().take(FIELD_COUNT).enumerate() {
            self.edit_segment(index, |segment| segment.set_value(byte));
        }
    }

    /// The address as an [`Ipv4Addr`].
    pub fn ip_address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.bytes())
    }

    /// Set the address.
    ///
    /// `None` and IPv6 addresses clear the control.
    pub fn set_ip_address(&mut self, address: Option<IpAddr>) {
        match address {
            Some(IpAddr::V4(address)) => self.set_bytes(&address.octets()),
            _ => self.clear(),
        }
    }

    /// The text of every segment joined with separators.
    ///
    /// Blank segments contribute nothing, so a blank control reads `"..."`.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for (index, segment) in self.segments.iter().enumerate() {
            text.push_str(segment.text());
            if let Some(separator) = self.separators.get(index) {
                text.push_str(separator.text());
            }
        }
        text
    }

    /// Replace the whole text. Same as [`parse`](Self::parse).
    pub fn set_text(&mut self, text: &str) {
        self.parse(text);
    }

    /// Distribute `text` over the segments.
    ///
    /// The control is cleared, then each separator is looked up in order
    /// after the previous match and the text between matches becomes the
    /// next segment's text. When a separator is missing, everything left goes
    /// to the current segment. Each piece is validated as the segment's new
    /// text, so malformed pieces leave their segment blank.
    pub fn parse(&mut self, text: &str) {
        tracing::debug!(target: targets::ADDRESS, text, "parsing address text");
        self.clear();

        let mut rest = text;
        let mut index = 0;
        while index < self.separators.len() {
            let glyph = self.separators[index].text();
            let Some(pos) = rest.find(glyph) else {
                break;
            };
            let field = &rest[..pos];
            self.edit_segment(index, |segment| segment.set_text(field));
            rest = &rest[pos + glyph.len()..];
            index += 1;
        }
        self.edit_segment(index, |segment| segment.set_text(rest));
    }

    /// Clear every segment.
    pub fn clear(&mut self) {
        for index in 0..FIELD_COUNT {
            self.edit_segment(index, Segment::clear);
        }
    }

    /// Whether at least one segment is blank.
    pub fn any_blank(&self) -> bool {
        self.segments.iter().any(Segment::is_blank)
    }

    /// Whether every segment is blank.
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(Segment::is_blank)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Whether the control is read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Set read-only mode on the control, its segments and separators.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        for segment in &mut self.segments {
            segment.set_read_only(read_only);
        }
        for separator in &mut self.separators {
            separator.set_read_only(read_only);
        }
        self.needs_repaint = true;
    }

    /// Whether Tab moves between segments.
    pub fn allow_internal_tab(&self) -> bool {
        self.allow_internal_tab
    }

    /// Set whether Tab and Shift+Tab move between segments.
    ///
    /// When enabled, Tab only leaves the control from the last segment and
    /// Shift+Tab only from the first.
    pub fn set_allow_internal_tab(&mut self, allow: bool) {
        self.allow_internal_tab = allow;
        for segment in &mut self.segments {
            segment.set_tab_stop(allow);
        }
    }

    /// Set the inclusive range of the segment at `index`.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_field_range(&mut self, index: usize, lower: u8, upper: u8) {
        if index >= FIELD_COUNT {
            tracing::debug!(target: targets::ADDRESS, index, "ignoring range for unknown field");
            return;
        }
        self.edit_segment(index, |segment| segment.set_range(lower, upper));
    }

    /// The inclusive range of the segment at `index`.
    pub fn field_range(&self, index: usize) -> Option<(u8, u8)> {
        self.segments
            .get(index)
            .map(|segment| (segment.range_lower(), segment.range_upper()))
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Index of the focused segment, if the control has focus.
    pub fn focused_field(&self) -> Option<usize> {
        self.focused
    }

    /// Whether the control has focus.
    pub fn has_focus(&self) -> bool {
        self.focused.is_some()
    }

    /// The host gave focus to the control.
    ///
    /// The first segment receives focus with its text selected. Does nothing
    /// if the control already has focus.
    pub fn focus(&mut self) {
        if self.focused.is_none() {
            self.move_focus(FocusTarget {
                index: 0,
                placement: Placement::SelectAll,
            });
        }
    }

    /// Focus the segment at `index` and select its text.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_field_focus(&mut self, index: usize) {
        if index >= FIELD_COUNT {
            tracing::debug!(target: targets::ADDRESS, index, "ignoring focus for unknown field");
            return;
        }
        self.move_focus(FocusTarget {
            index,
            placement: Placement::SelectAll,
        });
    }

    /// The host placed the cursor at `cursor` in the segment at `index`,
    /// typically in response to a click.
    pub fn click_field(&mut self, index: usize, cursor: usize) {
        if index >= FIELD_COUNT {
            return;
        }
        self.move_focus(FocusTarget {
            index,
            placement: Placement::Start,
        });
        self.segments[index].set_cursor(cursor);
    }

    /// The host reports that focus left the control.
    ///
    /// The focused segment is validated before focus is dropped.
    pub fn blur(&mut self) {
        let Some(index) = self.focused else {
            return;
        };
        self.edit_segment(index, Segment::validate);
        self.focused = None;
        self.needs_repaint = true;
        self.focus_changed.emit(false);
    }

    fn move_focus(&mut self, target: FocusTarget) {
        let gained = match self.focused {
            Some(current) if current != target.index => {
                self.edit_segment(current, Segment::validate);
                false
            }
            Some(_) => false,
            None => true,
        };

        self.focused = Some(target.index);
        if gained {
            self.focus_changed.emit(true);
        }
        self.edit_segment(target.index, |segment| segment.take_focus(target.placement));
        self.needs_repaint = true;
    }

    fn apply_cede(&mut self, request: CedeFocus) -> bool {
        match self.coordinator.resolve(request) {
            Some(target) => {
                self.move_focus(target);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle a key press.
    ///
    /// The key goes to the focused segment; any resulting focus move is then
    /// applied. Returns `true` if the key was consumed, `false` if the host
    /// should process it (for example Enter, or Tab leaving the control).
    pub fn handle_key(&mut self, event: &KeyPressEvent) -> bool {
        let Some(index) = self.focused else {
            return false;
        };

        if event.is_ctrl_only() {
            match event.key {
                Key::C => {
                    self.copy();
                    return true;
                }
                Key::X => {
                    self.cut();
                    return true;
                }
                Key::V => {
                    self.paste();
                    return true;
                }
                _ => {}
            }
        }

        if event.key == Key::Tab && self.allow_internal_tab {
            let action = if event.modifiers.shift {
                CedeAction::REVERSE_ALL
            } else {
                CedeAction::FORWARD_ALL
            };
            return self.apply_cede(CedeFocus::new(index, action));
        }

        let outcome = self.edit_segment(index, |segment| segment.handle_key(event));
        if let KeyOutcome::Cede(request) = outcome {
            self.apply_cede(request);
        }
        if outcome != KeyOutcome::Ignored {
            self.needs_repaint = true;
        }
        outcome.is_consumed()
    }

    /// Copy the focused segment's selection to the clipboard.
    pub fn copy(&mut self) {
        let Some(index) = self.focused else {
            return;
        };
        let selected = self.segments[index].selected_text();
        if selected.is_empty() {
            return;
        }
        if let Err(err) = self.clipboard.set_text(selected) {
            tracing::warn!(target: targets::ADDRESS, error = %err, "copy failed");
        }
    }

    /// Move the focused segment's selection to the clipboard.
    pub fn cut(&mut self) {
        let Some(index) = self.focused else {
            return;
        };
        if self.segments[index].is_read_only() {
            return;
        }
        let selected = self.segments[index].selected_text().to_string();
        if selected.is_empty() {
            return;
        }
        if let Err(err) = self.clipboard.set_text(&selected) {
            tracing::warn!(target: targets::ADDRESS, error = %err, "cut failed");
            return;
        }
        self.edit_segment(index, Segment::cut);
    }

    /// Paste clipboard text.
    ///
    /// Text containing a separator is taken as a whole address and parsed.
    /// Anything else is inserted into the focused segment.
    pub fn paste(&mut self) {
        let Some(index) = self.focused else {
            return;
        };
        if self.segments[index].is_read_only() {
            return;
        }
        let text = match self.clipboard.get_text() {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(target: targets::ADDRESS, error = %err, "paste failed");
                return;
            }
        };

        if text.contains(SEPARATOR) {
            self.parse(&text);
            return;
        }

        let outcome = self.edit_segment(index, |segment| segment.paste(&text));
        if let Some(request) = outcome.cede() {
            self.apply_cede(request);
        }
    }

    /// Accept a dropped text payload as the new address.
    pub fn drop_text(&mut self, payload: &str) {
        self.parse(payload);
    }

    // =========================================================================
    // Repaint
    // =========================================================================

    /// Whether the control changed since the last [`take_repaint`](Self::take_repaint).
    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Return and reset the repaint flag.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    /// Run `edit` on a segment and publish the change if its text changed.
    fn edit_segment<R>(&mut self, index: usize, edit: impl FnOnce(&mut Segment) -> R) -> R {
        let before = self.segments[index].text().to_string();
        let result = edit(&mut self.segments[index]);
        if self.segments[index].text() != before {
            self.needs_repaint = true;
            let text = self.segments[index].text().to_string();
            tracing::trace!(target: targets::ADDRESS, field_index = index, text = %text, "field changed");
            self.field_changed.emit(FieldChanged {
                field_index: index,
                text,
            });
            self.text_changed.emit(self.text());
        }
        result
    }
}

impl fmt::Display for AddressControl {
    /// Formats segment values, so blank segments show their lower bound.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            write!(f, "{}", segment)?;
            if let Some(separator) = self.separators.get(index) {
                write!(f, "{}", separator)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for AddressControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressControl")
            .field("text", &self.text())
            .field("focused", &self.focused)
            .field("read_only", &self.read_only)
            .field("allow_internal_tab", &self.allow_internal_tab)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::KeyboardModifiers;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn type_text(control: &mut AddressControl, digits: &str) {
        for ch in digits.chars() {
            control.handle_key(&KeyPressEvent::digit(ch).unwrap());
        }
    }

    fn press(control: &mut AddressControl, key: Key) -> bool {
        control.handle_key(&KeyPressEvent::key(key))
    }

    #[test]
    fn test_new_control_is_blank() {
        let control = AddressControl::new();
        assert!(control.is_blank());
        assert!(control.any_blank());
        assert_eq!(control.text(), "...");
        assert_eq!(control.to_string(), "0.0.0.0");
        assert_eq!(control.bytes(), [0, 0, 0, 0]);
        assert_eq!(control.focused_field(), None);
    }

    #[test]
    fn test_set_bytes_formats() {
        let mut control = AddressControl::new();
        control.set_bytes(&[192, 168, 1, 1]);
        assert_eq!(control.text(), "192.168.1.1");
        assert_eq!(control.bytes(), [192, 168, 1, 1]);
        assert!(!control.any_blank());
    }

    #[test]
    fn test_set_bytes_partial_and_extra() {
        let mut control = AddressControl::new();
        control.set_bytes(&[10, 20]);
        assert_eq!(control.text(), "10.20..");
        assert!(control.any_blank());
        assert!(!control.is_blank());

        control.set_bytes(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(control.text(), "1.2.3.4");
    }

    #[test]
    fn test_parse_is_permissive() {
        let mut control = AddressControl::new();
        control.parse("10..5.3");
        let texts: Vec<&str> = control.segments().iter().map(Segment::text).collect();
        assert_eq!(texts, vec!["10", "", "5", "3"]);

        control.parse("1.2");
        assert_eq!(control.text(), "1.2..");

        control.parse("1.2.3.4.5");
        assert_eq!(control.text(), "1.2.3.");

        control.parse("300.x.7.08");
        assert_eq!(control.text(), "255..7.8");
    }

    #[test]
    fn test_ip_address_accessors() {
        let mut control = AddressControl::new();
        control.set_ip_address(Some(IpAddr::V4(Ipv4Addr::new(172, 16, 0, 1))));
        assert_eq!(control.ip_address(), Ipv4Addr::new(172, 16, 0, 1));

        control.set_ip_address(Some("::1".parse().unwrap()));
        assert!(control.is_blank());

        control.set_bytes(&[1, 1, 1, 1]);
        control.set_ip_address(None);
        assert!(control.is_blank());
    }

    #[test]
    fn test_focus_selects_first_field() {
        let mut control = AddressControl::new();
        control.set_bytes(&[10, 0, 0, 1]);
        control.focus();
        assert_eq!(control.focused_field(), Some(0));
        assert_eq!(control.segments()[0].selection_length(), 2);
    }

    #[test]
    fn test_typing_walks_through_fields() {
        let mut control = AddressControl::new();
        control.focus();
        type_text(&mut control, "192168");
        assert_eq!(control.focused_field(), Some(2));
        type_text(&mut control, "1");
        assert!(press(&mut control, Key::Period));
        type_text(&mut control, "1");
        assert_eq!(control.text(), "192.168.1.1");
        assert_eq!(control.focused_field(), Some(3));
    }

    #[test]
    fn test_backspace_trims_previous_field() {
        let mut control = AddressControl::new();
        control.set_bytes(&[192]);
        control.set_field_focus(1);

        assert!(press(&mut control, Key::Backspace));
        assert_eq!(control.focused_field(), Some(0));
        assert_eq!(control.segments()[0].text(), "19");
        assert_eq!(control.segments()[0].cursor_position(), 2);
    }

    #[test]
    fn test_home_end_and_boundaries() {
        let mut control = AddressControl::new();
        control.set_bytes(&[123, 2, 3, 4]);
        control.set_field_focus(0);
        control.set_field_focus(3);

        assert!(press(&mut control, Key::Home));
        assert_eq!(control.focused_field(), Some(0));
        assert_eq!(control.segments()[0].cursor_position(), 0);
        assert!(!control.segments()[0].has_selection());

        assert!(press(&mut control, Key::End));
        assert_eq!(control.focused_field(), Some(3));
        assert_eq!(control.segments()[3].cursor_position(), 1);
        assert!(!control.segments()[3].has_selection());

        // Forward from the last field goes nowhere.
        assert!(press(&mut control, Key::ArrowRight));
        assert_eq!(control.focused_field(), Some(3));
    }

    #[test]
    fn test_arrows_cross_fields() {
        let mut control = AddressControl::new();
        control.set_bytes(&[10, 20, 30, 40]);
        control.click_field(1, 2);

        press(&mut control, Key::ArrowRight);
        assert_eq!(control.focused_field(), Some(2));
        assert_eq!(control.segments()[2].cursor_position(), 0);

        press(&mut control, Key::ArrowLeft);
        assert_eq!(control.focused_field(), Some(1));
        assert_eq!(control.segments()[1].cursor_position(), 2);
    }

    #[test]
    fn test_enter_passes_through() {
        let mut control = AddressControl::new();
        control.focus();
        assert!(!press(&mut control, Key::Enter));
        assert!(press(&mut control, Key::A));
    }

    #[test]
    fn test_keys_without_focus_are_ignored() {
        let mut control = AddressControl::new();
        assert!(!press(&mut control, Key::Digit1));
        assert!(control.is_blank());
    }

    #[test]
    fn test_internal_tab() {
        let mut control = AddressControl::new().with_allow_internal_tab(true);
        assert!(control.segments().iter().all(Segment::tab_stop));
        control.focus();

        assert!(press(&mut control, Key::Tab));
        assert_eq!(control.focused_field(), Some(1));

        let shift_tab = KeyPressEvent::with_modifiers(Key::Tab, KeyboardModifiers::SHIFT);
        assert!(control.handle_key(&shift_tab));
        assert_eq!(control.focused_field(), Some(0));
        assert!(!control.handle_key(&shift_tab));

        control.set_field_focus(3);
        assert!(!press(&mut control, Key::Tab));
    }

    #[test]
    fn test_tab_leaves_without_internal_tab() {
        let mut control = AddressControl::new();
        control.focus();
        assert!(!press(&mut control, Key::Tab));
        assert_eq!(control.focused_field(), Some(0));
    }

    #[test]
    fn test_read_only_cascades() {
        let mut control = AddressControl::new();
        control.set_bytes(&[1, 2, 3, 4]);
        control.take_repaint();

        control.set_read_only(true);
        assert!(control.take_repaint());
        assert!(control.segments().iter().all(Segment::is_read_only));
        assert!(control.separators().iter().all(Separator::is_read_only));

        control.set_field_focus(0);
        press(&mut control, Key::Digit9);
        assert_eq!(control.text(), "1.2.3.4");

        // The first arrow collapses the selection, the second leaves.
        press(&mut control, Key::ArrowRight);
        assert_eq!(control.focused_field(), Some(0));
        press(&mut control, Key::ArrowRight);
        assert_eq!(control.focused_field(), Some(1));
    }

    #[test]
    fn test_field_range() {
        let mut control = AddressControl::new();
        control.set_bytes(&[250, 1, 1, 1]);
        control.set_field_range(0, 1, 223);
        assert_eq!(control.field_range(0), Some((1, 223)));
        assert_eq!(control.bytes()[0], 223);

        control.set_field_range(9, 1, 2);
        assert_eq!(control.field_range(9), None);
    }

    #[test]
    fn test_leaving_field_snaps_to_lower() {
        let mut control = AddressControl::new();
        control.set_field_range(0, 10, 255);
        control.focus();
        type_text(&mut control, "5");
        assert_eq!(control.segments()[0].text(), "5");

        control.set_field_focus(1);
        assert_eq!(control.segments()[0].text(), "10");

        control.set_field_focus(0);
        control.set_field_range(0, 100, 255);
        press(&mut control, Key::Delete);
        type_text(&mut control, "7");
        control.blur();
        assert_eq!(control.segments()[0].text(), "100");
        assert!(!control.has_focus());
    }

    #[test]
    fn test_signals_fire_per_field_change() {
        let mut control = AddressControl::new();
        let fields = Arc::new(Mutex::new(Vec::new()));
        let texts = Arc::new(Mutex::new(Vec::new()));

        let fields_clone = fields.clone();
        control.field_changed.connect(move |change| {
            fields_clone.lock().push(change.clone());
        });
        let texts_clone = texts.clone();
        control.text_changed.connect(move |text| {
            texts_clone.lock().push(text.clone());
        });

        control.set_bytes(&[1, 2]);
        assert_eq!(
            *fields.lock(),
            vec![
                FieldChanged {
                    field_index: 0,
                    text: "1".to_string()
                },
                FieldChanged {
                    field_index: 1,
                    text: "2".to_string()
                },
            ]
        );
        assert_eq!(*texts.lock(), vec!["1...".to_string(), "1.2..".to_string()]);

        // Clearing only reports fields that actually changed.
        fields.lock().clear();
        control.clear();
        let cleared: Vec<usize> = fields.lock().iter().map(|c| c.field_index).collect();
        assert_eq!(cleared, vec![0, 1]);
    }

    #[test]
    fn test_focus_signal() {
        let mut control = AddressControl::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        control.focus_changed.connect(move |&focused| {
            events_clone.lock().push(focused);
        });

        control.focus();
        control.set_field_focus(2);
        control.blur();
        control.blur();
        assert_eq!(*events.lock(), vec![true, false]);
    }

    #[test]
    fn test_copy_cut_paste() {
        let mut control = AddressControl::new().with_clipboard(MemoryClipboard::new());
        control.set_bytes(&[123, 45]);
        control.focus();

        let ctrl = |key| KeyPressEvent::with_modifiers(key, KeyboardModifiers::CTRL);
        assert!(control.handle_key(&ctrl(Key::C)));
        assert!(control.handle_key(&ctrl(Key::X)));
        assert!(control.segments()[0].is_blank());

        assert!(control.handle_key(&ctrl(Key::V)));
        assert_eq!(control.segments()[0].text(), "123");
        // A full paste advances like typing.
        assert_eq!(control.focused_field(), Some(1));
    }

    #[test]
    fn test_paste_with_separator_parses_whole_address() {
        let mut control =
            AddressControl::new().with_clipboard(MemoryClipboard::with_text("10.1.2.3"));
        control.set_field_focus(2);
        control.paste();
        assert_eq!(control.bytes(), [10, 1, 2, 3]);
    }

    #[test]
    fn test_paste_into_field_truncates() {
        let mut control = AddressControl::new().with_clipboard(MemoryClipboard::with_text("9876"));
        control.set_field_focus(3);
        control.paste();
        assert_eq!(control.segments()[3].text(), "255");
    }

    #[test]
    fn test_drop_text_parses() {
        let mut control = AddressControl::new();
        control.drop_text("8.8.4.4");
        assert_eq!(control.ip_address(), Ipv4Addr::new(8, 8, 4, 4));
    }

    #[test]
    fn test_repaint_flag() {
        let mut control = AddressControl::new();
        assert!(control.take_repaint());
        assert!(!control.needs_repaint());

        control.set_bytes(&[1]);
        assert!(control.needs_repaint());
        assert!(control.take_repaint());
        assert!(!control.take_repaint());
    }

    #[test]
    fn test_display_uses_values() {
        let mut control = AddressControl::new();
        control.set_field_range(1, 5, 255);
        control.parse("10..x.4");
        assert_eq!(control.text(), "10...4");
        assert_eq!(control.to_string(), "10.5.0.4");
    }
}
