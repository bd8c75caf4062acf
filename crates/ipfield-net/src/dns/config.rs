//! DNS configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Configuration for the reverse lookups made while tracing.
#[derive(Debug, Clone)]
pub struct DnsConfig {
    /// Use system DNS configuration (reads /etc/resolv.conf on Unix).
    /// If false, uses custom nameservers.
    pub use_system_config: bool,

    /// Custom nameservers to use when `use_system_config` is false.
    pub nameservers: Vec<SocketAddr>,

    /// Maximum number of cached entries.
    pub cache_size: usize,

    /// Whether to read from /etc/hosts file.
    pub use_hosts_file: bool,

    /// Number of retries for failed lookups.
    pub attempts: usize,

    /// Timeout for each DNS query attempt.
    pub timeout: Duration,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            use_system_config: true,
            nameservers: Vec::new(),
            cache_size: 256,
            use_hosts_file: true,
            attempts: 2,
            // Hop-by-hop output stalls on every slow PTR query.
            timeout: Duration::from_secs(2),
        }
    }
}

impl DnsConfig {
    /// Create a new DNS configuration with system defaults.
    pub fn system() -> Self {
        Self::default()
    }

    /// Create a configuration with custom nameservers.
    pub fn with_nameservers(nameservers: Vec<SocketAddr>) -> Self {
        Self {
            use_system_config: false,
            nameservers,
            ..Default::default()
        }
    }

    /// Use Cloudflare's public DNS servers.
    pub fn cloudflare() -> Self {
        Self::with_nameservers(vec![
            port_53(Ipv4Addr::new(1, 1, 1, 1)),
            port_53(Ipv4Addr::new(1, 0, 0, 1)),
        ])
    }

    /// Set the cache size.
    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Set whether to use the hosts file.
    pub fn use_hosts_file(mut self, use_hosts: bool) -> Self {
        self.use_hosts_file = use_hosts;
        self
    }

    /// Set the number of retry attempts.
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the timeout per attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn port_53(address: Ipv4Addr) -> SocketAddr {
    SocketAddr::new(IpAddr::V4(address), 53)
}
