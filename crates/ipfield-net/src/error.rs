//! Error types for the network crate.

use std::net::IpAddr;

use thiserror::Error;

/// Errors that can occur while tracing a route.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The destination is not a valid IP address.
    #[error("{0} is not a valid IP address.")]
    InvalidAddress(String),

    /// The hop budget is zero.
    #[error("Max hops can't be lower than 1.")]
    InvalidHopCount,

    /// The hop budget exceeds what an IPv4 TTL can express.
    #[error("Max hops can't be higher than 255.")]
    HopCountTooHigh(u32),

    /// The per-hop timeout is shorter than a millisecond.
    #[error("Timeout value must be higher than 0.")]
    InvalidTimeout,

    /// The prober cannot reach this kind of address.
    #[error("unsupported destination {0}: only IPv4 echo probes are supported")]
    UnsupportedAddress(IpAddr),

    /// The raw ICMP socket could not be opened or configured.
    #[error("failed to set up ICMP socket: {0}")]
    Socket(#[source] std::io::Error),

    /// DNS resolver setup or lookup failed.
    #[error("DNS error: {0}")]
    Dns(String),

    /// Sending or receiving a probe failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking probe task panicked or was cancelled.
    #[error("probe task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
