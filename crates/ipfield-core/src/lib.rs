//! Core systems for ipfield.
//!
//! This crate provides the foundational pieces shared by the ipfield widget
//! and network crates:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Logging**: Tracing targets and span helpers
//!
//! # Signal/Slot Example
//!
//! ```
//! use ipfield_core::Signal;
//!
//! // Create a signal that notifies when a field changes
//! let field_changed = Signal::<(usize, String)>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = field_changed.connect(|(index, text)| {
//!     println!("Field {} is now {:?}", index, text);
//! });
//!
//! // Emit the signal
//! field_changed.emit((0, "192".to_string()));
//!
//! // Disconnect when done
//! field_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
