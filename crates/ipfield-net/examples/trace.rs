//! Trace the route to an address or hostname.
//!
//! ```text
//! sudo cargo run -p ipfield-net --example trace -- 1.1.1.1 [max_hops] [timeout_ms]
//! RUST_LOG=ipfield_net=debug cargo run -p ipfield-net --example trace -- example.com
//! ```
//!
//! Raw ICMP sockets need root or `CAP_NET_RAW`.

use ipfield_net::{DnsConfig, DnsResolver, IcmpProber, TraceRoute, TraceRouteConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let target = args.next().unwrap_or_else(|| "1.1.1.1".to_string());
    let mut config = TraceRouteConfig::default();
    if let Some(max_hops) = args.next() {
        config = config.max_hops(max_hops.parse()?);
    }
    if let Some(timeout) = args.next() {
        config = config.timeout_ms(timeout.parse()?);
    }

    let resolver = DnsResolver::system().or_else(|err| {
        tracing::warn!(error = %err, "no usable system DNS configuration, using Cloudflare");
        DnsResolver::new(DnsConfig::cloudflare())
    })?;

    // Accept hostnames by resolving them up front.
    let destination = if target.trim().parse::<std::net::IpAddr>().is_ok() {
        target
    } else {
        let addresses = resolver.resolve(target.trim()).await?;
        let first = addresses
            .into_iter()
            .find(|address| address.is_ipv4())
            .ok_or("no IPv4 address for host")?;
        println!("{} resolves to {}", target, first);
        first.to_string()
    };

    let trace = TraceRoute::new(&destination, config)?;
    println!(
        "Tracing route to {} over a maximum of {} hops",
        trace.destination(),
        trace.config().max_hops
    );
    trace.hop_recorded.connect(|hop| println!("{}", hop));

    let hops = trace.run(&IcmpProber::new(), &resolver).await?;
    println!("Trace complete after {} hops.", hops.len());
    Ok(())
}
