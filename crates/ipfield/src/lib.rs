//! A segmented dotted-quad address entry control.
//!
//! ipfield provides a headless IPv4 address input made of four bounded
//! integer segments. It handles keyboard navigation across segments, value
//! clamping, clipboard and drag-and-drop input, and change notification.
//! Rendering and native event plumbing are left to the host UI framework.
//!
//! # Overview
//!
//! - [`AddressControl`]: the control itself
//! - [`Segment`]: one octet field with its own keystroke policy
//! - [`FocusCoordinator`]: routes focus between segments
//! - [`KeyPressEvent`]: the framework-independent key event model
//! - [`TextClipboard`]: clipboard backends ([`MemoryClipboard`], [`SystemClipboard`])
//!
//! # Example
//!
//! ```
//! use ipfield::AddressControl;
//!
//! let mut control = AddressControl::new();
//! control.field_changed.connect(|change| {
//!     println!("field {} = {:?}", change.field_index, change.text);
//! });
//!
//! control.set_bytes(&[192, 168, 0, 1]);
//! assert_eq!(control.text(), "192.168.0.1");
//! ```

pub mod address;
pub mod clipboard;
pub mod events;
pub mod focus;
pub mod segment;
pub mod separator;

pub use address::{AddressControl, FIELD_COUNT, FieldChanged};
pub use clipboard::{ClipboardError, MemoryClipboard, SystemClipboard, TextClipboard};
pub use events::{Key, KeyPressEvent, KeyboardModifiers};
pub use focus::{
    CedeAction, CedeFocus, Direction, FocusCoordinator, FocusTarget, Placement, Selection,
};
pub use segment::{KeyOutcome, MAX_LENGTH, Segment};
pub use separator::{SEPARATOR, Separator};

pub use ipfield_core::{ConnectionId, Signal};
