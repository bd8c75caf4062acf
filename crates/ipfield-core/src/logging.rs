//! Logging facilities for ipfield.
//!
//! ipfield uses the `tracing` crate for instrumentation. Every subsystem logs
//! under its own target so output can be filtered per component. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("ipfield::focus=debug"))
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Span names used throughout ipfield for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Trace route run span.
    pub const TRACE_ROUTE: &str = "ipfield::trace_route";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "ipfield_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "ipfield_core::signal";
    /// Single segment editing target.
    pub const SEGMENT: &str = "ipfield::segment";
    /// Focus routing between segments.
    pub const FOCUS: &str = "ipfield::focus";
    /// Whole-address control target.
    pub const ADDRESS: &str = "ipfield::address";
    /// Hop probing target.
    pub const TRACE_ROUTE: &str = "ipfield_net::trace_route";
    /// Reverse DNS target.
    pub const DNS: &str = "ipfield_net::dns";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "ipfield::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_prefixed_by_crate() {
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::SEGMENT.starts_with("ipfield::"));
        assert!(targets::TRACE_ROUTE.starts_with("ipfield_net::"));
    }

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
        // Just ensure it compiles and doesn't panic
        let _span = PerfSpan::new(span_names::TRACE_ROUTE);
    }
}
