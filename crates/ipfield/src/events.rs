//! Keyboard event types delivered to the address control.
//!
//! The host UI framework translates its native key events into
//! [`KeyPressEvent`]s. Keys follow the web `KeyboardEvent.code` layout, so a
//! key identifies a physical position rather than the character it produces.

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// Keyboard key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
#[rustfmt::skip]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers (main keyboard)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Insert,
    Enter, Tab,

    // Whitespace
    Space,

    // Modifiers (also tracked via KeyboardModifiers, but useful as key events)
    ShiftLeft, ShiftRight,
    ControlLeft, ControlRight,
    AltLeft, AltRight,
    MetaLeft, MetaRight,

    // Punctuation and symbols
    Minus, Equal,
    Semicolon, Quote,
    Comma, Period, Slash,

    // Control
    Escape,

    // Numpad
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadDecimal, NumpadEnter,

    // Unknown/unmapped key
    Unknown(u16),
}

impl Key {
    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::ShiftLeft
                | Key::ShiftRight
                | Key::ControlLeft
                | Key::ControlRight
                | Key::AltLeft
                | Key::AltRight
                | Key::MetaLeft
                | Key::MetaRight
        )
    }

    /// The decimal digit this key types, for main-row and numpad digits.
    pub fn digit(&self) -> Option<char> {
        let ch = match self {
            Key::Digit0 | Key::Numpad0 => '0',
            Key::Digit1 | Key::Numpad1 => '1',
            Key::Digit2 | Key::Numpad2 => '2',
            Key::Digit3 | Key::Numpad3 => '3',
            Key::Digit4 | Key::Numpad4 => '4',
            Key::Digit5 | Key::Numpad5 => '5',
            Key::Digit6 | Key::Numpad6 => '6',
            Key::Digit7 | Key::Numpad7 => '7',
            Key::Digit8 | Key::Numpad8 => '8',
            Key::Digit9 | Key::Numpad9 => '9',
            _ => return None,
        };
        Some(ch)
    }

    /// Map an ASCII digit to its main-row key.
    pub fn from_digit(ch: char) -> Option<Self> {
        let key = match ch {
            '0' => Key::Digit0,
            '1' => Key::Digit1,
            '2' => Key::Digit2,
            '3' => Key::Digit3,
            '4' => Key::Digit4,
            '5' => Key::Digit5,
            '6' => Key::Digit6,
            '7' => Key::Digit7,
            '8' => Key::Digit8,
            '9' => Key::Digit9,
            _ => return None,
        };
        Some(key)
    }
}

/// Key press event, sent when a key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPressEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl KeyPressEvent {
    /// A press of `key` with no modifiers.
    pub fn key(key: Key) -> Self {
        Self::with_modifiers(key, KeyboardModifiers::NONE)
    }

    /// A press of `key` with the given modifiers.
    pub fn with_modifiers(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// A press of the main-row key that types `ch`.
    ///
    /// Returns `None` if `ch` is not an ASCII digit.
    pub fn digit(ch: char) -> Option<Self> {
        Key::from_digit(ch).map(Self::key)
    }

    /// Check whether exactly Control is held, with no other modifier.
    pub fn is_ctrl_only(&self) -> bool {
        self.modifiers == KeyboardModifiers::CTRL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numpad_and_main_row_digits_agree() {
        assert_eq!(Key::Digit7.digit(), Some('7'));
        assert_eq!(Key::Numpad7.digit(), Some('7'));
        assert_eq!(Key::Numpad0.digit(), Some('0'));
        assert_eq!(Key::NumpadDecimal.digit(), None);
        assert_eq!(Key::A.digit(), None);
    }

    #[test]
    fn test_digit_event_helper() {
        let event = KeyPressEvent::digit('4').unwrap();
        assert_eq!(event.key, Key::Digit4);
        assert!(event.modifiers.none());
        assert!(KeyPressEvent::digit('x').is_none());
    }

    #[test]
    fn test_ctrl_only() {
        let copy = KeyPressEvent::with_modifiers(Key::C, KeyboardModifiers::CTRL);
        assert!(copy.is_ctrl_only());

        let shifted = KeyPressEvent::with_modifiers(Key::C, KeyboardModifiers::CTRL_SHIFT);
        assert!(!shifted.is_ctrl_only());
    }

    #[test]
    fn test_modifiers_any() {
        assert!(KeyboardModifiers::NONE.none());
        assert!(KeyboardModifiers::SHIFT.any());
        assert!(KeyboardModifiers::ALT.any());
    }
}
