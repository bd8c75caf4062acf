//! Trace route configuration.

use std::time::Duration;

/// Default hop budget.
pub const DEFAULT_MAX_HOPS: u32 = 30;

/// Largest hop budget; an IPv4 TTL is a single byte.
pub const MAX_HOP_LIMIT: u32 = u8::MAX as u32;

/// Default wait for each probe's reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Configuration for a trace route run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRouteConfig {
    /// Highest hop limit probed before giving up.
    pub max_hops: u32,

    /// How long each probe waits for a reply.
    pub timeout: Duration,

    /// Whether responding hops get a reverse DNS lookup.
    pub resolve_hostnames: bool,
}

impl Default for TraceRouteConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            timeout: DEFAULT_TIMEOUT,
            resolve_hostnames: true,
        }
    }
}

impl TraceRouteConfig {
    /// Create a configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hop budget.
    pub fn max_hops(mut self, max_hops: u32) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Set the per-probe timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the per-probe timeout in milliseconds.
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    /// Set whether hops are resolved to hostnames.
    pub fn resolve_hostnames(mut self, resolve: bool) -> Self {
        self.resolve_hostnames = resolve;
        self
    }
}
