//! Hostname lookup for trace route hops.
//!
//! # Example
//!
//! ```ignore
//! use ipfield_net::dns::{DnsConfig, DnsResolver};
//!
//! let resolver = DnsResolver::new(DnsConfig::cloudflare())?;
//! for name in resolver.reverse("1.1.1.1".parse()?).await? {
//!     println!("{}", name);
//! }
//! ```

mod config;
mod resolver;

pub use config::DnsConfig;
pub use resolver::{DnsResolver, HostnameResolver, NoLookup};
