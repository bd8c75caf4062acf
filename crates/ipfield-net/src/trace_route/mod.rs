//! Hop-limited echo probing toward a destination.
//!
//! A [`TraceRoute`] sends one echo probe per hop limit through an
//! [`EchoProber`], optionally names each responding hop through a
//! [`HostnameResolver`](crate::dns::HostnameResolver), and records a
//! [`HopEntry`] per hop.

mod config;
mod entry;
mod prober;
mod route;

pub use config::{DEFAULT_MAX_HOPS, DEFAULT_TIMEOUT, MAX_HOP_LIMIT, TraceRouteConfig};
pub use entry::{HopEntry, ProbeStatus};
pub use prober::{EchoProber, IcmpProber, ProbeReply};
pub use route::TraceRoute;
