//! Hostname resolution for trace route hops.

use std::future::Future;
use std::net::IpAddr;

use hickory_resolver::config::{NameServerConfig, ResolveHosts, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::{Resolver, TokioResolver};
use ipfield_core::logging::targets;

use crate::dns::config::DnsConfig;
use crate::error::{NetworkError, Result};

/// Maps a responding hop address to a display hostname.
///
/// Implementations never fail: a lookup that produces nothing yields an
/// empty string and the hop is shown by address alone.
pub trait HostnameResolver {
    /// Look up the hostname for `address`.
    fn hostname(&self, address: IpAddr) -> impl Future<Output = String> + Send;
}

/// A resolver that never looks anything up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl HostnameResolver for NoLookup {
    async fn hostname(&self, _address: IpAddr) -> String {
        String::new()
    }
}

/// DNS resolver backed by hickory-resolver.
///
/// Reverse (PTR) lookups name the hops of a trace; forward lookups let a
/// caller turn a hostname into a destination address before tracing.
///
/// # Example
///
/// ```ignore
/// use ipfield_net::dns::DnsResolver;
///
/// let resolver = DnsResolver::system()?;
/// let names = resolver.reverse("1.1.1.1".parse()?).await?;
/// ```
pub struct DnsResolver {
    resolver: TokioResolver,
}

impl DnsResolver {
    /// Create a new DNS resolver with the given configuration.
    pub fn new(config: DnsConfig) -> Result<Self> {
        let (resolver_config, resolver_opts) = build_resolver_config(&config)?;

        let resolver =
            Resolver::builder_with_config(resolver_config, TokioConnectionProvider::default())
                .with_options(resolver_opts)
                .build();

        Ok(Self { resolver })
    }

    /// Create a DNS resolver using system DNS settings.
    pub fn system() -> Result<Self> {
        Self::new(DnsConfig::system())
    }

    /// Look up the PTR names for an address, without the trailing root dot.
    pub async fn reverse(&self, address: IpAddr) -> Result<Vec<String>> {
        let lookup = self
            .resolver
            .reverse_lookup(address)
            .await
            .map_err(|e| NetworkError::Dns(e.to_string()))?;

        Ok(lookup
            .iter()
            .map(|name| name.to_string().trim_end_matches('.').to_string())
            .collect())
    }

    /// Resolve a hostname to IP addresses.
    pub async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>> {
        let response = self
            .resolver
            .lookup_ip(hostname)
            .await
            .map_err(|e| NetworkError::Dns(e.to_string()))?;

        let addresses: Vec<IpAddr> = response.iter().collect();
        if addresses.is_empty() {
            return Err(NetworkError::Dns(format!(
                "No addresses found for hostname: {}",
                hostname
            )));
        }
        Ok(addresses)
    }
}

impl HostnameResolver for DnsResolver {
    async fn hostname(&self, address: IpAddr) -> String {
        match self.reverse(address).await {
            Ok(names) => names.into_iter().next().unwrap_or_default(),
            Err(err) => {
                tracing::debug!(
                    target: targets::DNS,
                    %address,
                    error = %err,
                    "reverse lookup failed"
                );
                String::new()
            }
        }
    }
}

impl std::fmt::Debug for DnsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsResolver").finish_non_exhaustive()
    }
}

/// Build hickory resolver configuration from our DnsConfig.
fn build_resolver_config(config: &DnsConfig) -> Result<(ResolverConfig, ResolverOpts)> {
    let resolver_config = if config.use_system_config {
        let (system_config, _) = hickory_resolver::system_conf::read_system_conf()
            .map_err(|e| NetworkError::Dns(e.to_string()))?;
        system_config
    } else if config.nameservers.is_empty() {
        return Err(NetworkError::Dns("No nameservers configured".to_string()));
    } else {
        let mut resolver_config = ResolverConfig::new();
        for addr in &config.nameservers {
            resolver_config.add_name_server(NameServerConfig::new(*addr, Protocol::Udp));
            resolver_config.add_name_server(NameServerConfig::new(*addr, Protocol::Tcp));
        }
        resolver_config
    };

    let mut opts = ResolverOpts::default();
    opts.cache_size = config.cache_size;
    opts.use_hosts_file = if config.use_hosts_file {
        ResolveHosts::Auto
    } else {
        ResolveHosts::Never
    };
    opts.attempts = config.attempts;
    opts.timeout = config.timeout;

    Ok((resolver_config, opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_config_requires_nameservers() {
        let err = DnsResolver::new(DnsConfig::with_nameservers(Vec::new())).unwrap_err();
        assert!(matches!(err, NetworkError::Dns(_)));
        assert_eq!(err.to_string(), "DNS error: No nameservers configured");
    }

    #[test]
    fn test_custom_config_registers_udp_and_tcp() {
        let (config, opts) = build_resolver_config(&DnsConfig::cloudflare().attempts(1)).unwrap();
        assert_eq!(config.name_servers().len(), 4);
        assert_eq!(opts.attempts, 1);
    }

    #[tokio::test]
    async fn test_no_lookup_is_empty() {
        let name = NoLookup.hostname("10.0.0.1".parse().unwrap()).await;
        assert!(name.is_empty());
    }
}
