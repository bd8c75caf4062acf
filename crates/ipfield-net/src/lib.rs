//! Network utilities for ipfield.
//!
//! This crate provides a trace route utility: hop-limited ICMP echo probes
//! toward a destination, with optional reverse DNS naming of each hop.
//!
//! # Modules
//!
//! - [`trace_route`]: the probe loop, its configuration and hop records
//! - [`dns`]: hostname lookup backed by hickory-resolver
//!
//! # Example
//!
//! ```ignore
//! use ipfield_net::dns::DnsResolver;
//! use ipfield_net::trace_route::{IcmpProber, TraceRoute, TraceRouteConfig};
//!
//! #[tokio::main]
//! async fn main() -> ipfield_net::Result<()> {
//!     let trace = TraceRoute::new("1.1.1.1", TraceRouteConfig::new().max_hops(16))?;
//!     trace.hop_recorded.connect(|hop| println!("{}", hop));
//!     trace.run(&IcmpProber::new(), &DnsResolver::system()?).await?;
//!     Ok(())
//! }
//! ```

pub mod dns;
mod error;
pub mod trace_route;

pub use error::{NetworkError, Result};

pub use dns::{DnsConfig, DnsResolver, HostnameResolver, NoLookup};
pub use trace_route::{
    EchoProber, HopEntry, IcmpProber, ProbeReply, ProbeStatus, TraceRoute, TraceRouteConfig,
};
