//! The hop-by-hop trace loop.

use std::net::IpAddr;

use ipfield_core::Signal;
use ipfield_core::logging::{span_names, targets};
use tokio::time::Instant;
use tracing::Instrument;

use crate::dns::HostnameResolver;
use crate::error::{NetworkError, Result};
use crate::trace_route::config::{MAX_HOP_LIMIT, TraceRouteConfig};
use crate::trace_route::entry::{HopEntry, ProbeStatus};
use crate::trace_route::prober::EchoProber;

/// A validated trace route toward one destination.
///
/// Construction checks the arguments so a bad destination, hop budget or
/// timeout is reported before any probe leaves the host. [`run`](Self::run)
/// then sends one probe per hop limit, starting at 1, until the destination
/// answers or the hop budget is spent.
///
/// # Example
///
/// ```ignore
/// use ipfield_net::dns::DnsResolver;
/// use ipfield_net::trace_route::{IcmpProber, TraceRoute, TraceRouteConfig};
///
/// let trace = TraceRoute::new("1.1.1.1", TraceRouteConfig::default())?;
/// trace.hop_recorded.connect(|hop| println!("{}", hop));
/// let hops = trace.run(&IcmpProber::new(), &DnsResolver::system()?).await?;
/// ```
pub struct TraceRoute {
    destination: IpAddr,
    config: TraceRouteConfig,

    /// Emitted for every hop as soon as it is recorded.
    pub hop_recorded: Signal<HopEntry>,
}

impl TraceRoute {
    /// Validate the arguments of a trace.
    ///
    /// `destination` is trimmed and must be a literal IPv4 or IPv6 address.
    pub fn new(destination: &str, config: TraceRouteConfig) -> Result<Self> {
        let destination = destination.trim().parse::<IpAddr>().map_err(|_| {
            tracing::warn!(target: targets::TRACE_ROUTE, destination, "rejected destination");
            NetworkError::InvalidAddress(destination.to_string())
        })?;

        if config.max_hops < 1 {
            tracing::warn!(target: targets::TRACE_ROUTE, "rejected hop budget of 0");
            return Err(NetworkError::InvalidHopCount);
        }
        if config.max_hops > MAX_HOP_LIMIT {
            tracing::warn!(
                target: targets::TRACE_ROUTE,
                max_hops = config.max_hops,
                "rejected hop budget above the TTL range"
            );
            return Err(NetworkError::HopCountTooHigh(config.max_hops));
        }
        if config.timeout.as_millis() < 1 {
            tracing::warn!(
                target: targets::TRACE_ROUTE,
                timeout = ?config.timeout,
                "rejected sub-millisecond timeout"
            );
            return Err(NetworkError::InvalidTimeout);
        }

        Ok(Self {
            destination,
            config,
            hop_recorded: Signal::new(),
        })
    }

    /// The validated destination.
    pub fn destination(&self) -> IpAddr {
        self.destination
    }

    /// The configuration the trace runs with.
    pub fn config(&self) -> &TraceRouteConfig {
        &self.config
    }

    /// Probe hop by hop and return every recorded hop in order.
    ///
    /// The reply time of a hop covers the probe only, not the hostname
    /// lookup. A probe that cannot be sent aborts the run.
    pub async fn run<P, R>(&self, prober: &P, resolver: &R) -> Result<Vec<HopEntry>>
    where
        P: EchoProber,
        R: HostnameResolver,
    {
        let span = tracing::info_span!(
            target: targets::TRACE_ROUTE,
            span_names::TRACE_ROUTE,
            destination = %self.destination,
            max_hops = self.config.max_hops,
        );
        self.probe_hops(prober, resolver).instrument(span).await
    }

    async fn probe_hops<P, R>(&self, prober: &P, resolver: &R) -> Result<Vec<HopEntry>>
    where
        P: EchoProber,
        R: HostnameResolver,
    {
        let mut hops = Vec::new();
        let mut hop = 1;

        loop {
            let started = Instant::now();
            let reply = prober
                .probe(self.destination, hop, self.config.timeout)
                .await?;
            let reply_time = started.elapsed();

            let hostname = match reply.address {
                Some(address) if self.config.resolve_hostnames => {
                    resolver.hostname(address).await
                }
                _ => String::new(),
            };

            let entry = HopEntry {
                hop,
                address: reply.address,
                hostname,
                reply_time,
                status: reply.status,
            };
            tracing::debug!(
                target: targets::TRACE_ROUTE,
                hop,
                status = %entry.status,
                "{}",
                entry
            );
            self.hop_recorded.emit(entry.clone());
            hops.push(entry);

            hop += 1;
            if reply.status == ProbeStatus::Success || hop > self.config.max_hops {
                break;
            }
        }

        Ok(hops)
    }
}

impl std::fmt::Debug for TraceRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceRoute")
            .field("destination", &self.destination)
            .field("config", &self.config)
            .field("hop_recorded", &self.hop_recorded)
            .finish()
    }
}
