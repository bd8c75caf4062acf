//! Per-hop results.

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// What came back for a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeStatus {
    /// The destination answered the echo request.
    Success,
    /// An intermediate router dropped the probe when its hop limit ran out.
    TtlExpired,
    /// A router reported the destination as unreachable.
    DestinationUnreachable,
    /// Nothing answered within the timeout.
    TimedOut,
}

impl ProbeStatus {
    /// Whether this status ends the trace.
    pub fn is_success(self) -> bool {
        self == ProbeStatus::Success
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProbeStatus::Success => "Success",
            ProbeStatus::TtlExpired => "TtlExpired",
            ProbeStatus::DestinationUnreachable => "DestinationUnreachable",
            ProbeStatus::TimedOut => "TimedOut",
        };
        f.write_str(text)
    }
}

/// One recorded hop of a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopEntry {
    /// Hop limit the probe was sent with, starting at 1.
    pub hop: u32,
    /// Address that answered, if any.
    pub address: Option<IpAddr>,
    /// Reverse DNS name of `address`, or empty.
    pub hostname: String,
    /// Round trip of the probe, excluding the hostname lookup.
    pub reply_time: Duration,
    /// Outcome of the probe.
    pub status: ProbeStatus,
}

impl HopEntry {
    /// The responding address as text, or `"N/A"` for a silent hop.
    pub fn address_text(&self) -> String {
        match self.address {
            Some(address) => address.to_string(),
            None => "N/A".to_string(),
        }
    }

    /// Round trip in whole milliseconds.
    pub fn reply_time_ms(&self) -> u128 {
        self.reply_time.as_millis()
    }
}

impl fmt::Display for HopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | ", self.hop)?;
        if self.hostname.is_empty() {
            write!(f, "{}", self.address_text())?;
        } else {
            write!(f, "{}[{}]", self.hostname, self.address_text())?;
        }
        if self.status == ProbeStatus::TimedOut {
            write!(f, " | Request Timed Out.")
        } else {
            write!(f, " | {} ms", self.reply_time_ms())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(address: Option<&str>, hostname: &str, status: ProbeStatus) -> HopEntry {
        HopEntry {
            hop: 3,
            address: address.map(|a| a.parse().unwrap()),
            hostname: hostname.to_string(),
            reply_time: Duration::from_micros(12_700),
            status,
        }
    }

    #[test]
    fn test_display_with_hostname() {
        let hop = entry(Some("10.0.0.1"), "gw.example.net", ProbeStatus::TtlExpired);
        assert_eq!(hop.to_string(), "3 | gw.example.net[10.0.0.1] | 12 ms");
    }

    #[test]
    fn test_display_address_only() {
        let hop = entry(Some("192.0.2.9"), "", ProbeStatus::Success);
        assert_eq!(hop.to_string(), "3 | 192.0.2.9 | 12 ms");
    }

    #[test]
    fn test_display_timed_out() {
        let hop = entry(None, "", ProbeStatus::TimedOut);
        assert_eq!(hop.address_text(), "N/A");
        assert_eq!(hop.to_string(), "3 | N/A | Request Timed Out.");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ProbeStatus::DestinationUnreachable.to_string(), "DestinationUnreachable");
        assert!(ProbeStatus::Success.is_success());
        assert!(!ProbeStatus::TimedOut.is_success());
    }
}
