//! Hop-limited echo probes.

use std::future::Future;
use std::io::{ErrorKind, Read};
use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{Duration, Instant};

use ipfield_core::PerfSpan;
use ipfield_core::logging::targets;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::error::{NetworkError, Result};
use crate::trace_route::entry::ProbeStatus;

const ECHO_REPLY: u8 = 0;
const DESTINATION_UNREACHABLE: u8 = 3;
const ECHO_REQUEST: u8 = 8;
const TIME_EXCEEDED: u8 = 11;

const ICMP_HEADER_LEN: usize = 8;
const MIN_IPV4_HEADER_LEN: usize = 20;
const RECV_BUFFER_LEN: usize = 1500;

/// Answer to a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReply {
    /// Address the reply came from, if any reply arrived.
    pub address: Option<IpAddr>,
    /// What kind of reply it was.
    pub status: ProbeStatus,
}

impl ProbeReply {
    /// A reply from `address`.
    pub fn new(address: IpAddr, status: ProbeStatus) -> Self {
        Self {
            address: Some(address),
            status,
        }
    }

    /// No reply within the timeout.
    pub fn timed_out() -> Self {
        Self {
            address: None,
            status: ProbeStatus::TimedOut,
        }
    }
}

/// Sends one echo request with a given hop limit and waits for the answer.
pub trait EchoProber {
    /// Probe `destination`, letting the request live for at most
    /// `hop_limit` hops, and wait up to `timeout` for a reply.
    ///
    /// A missing reply is `Ok` with [`ProbeStatus::TimedOut`]; `Err` means
    /// the probe could not be sent at all.
    fn probe(
        &self,
        destination: IpAddr,
        hop_limit: u32,
        timeout: Duration,
    ) -> impl Future<Output = Result<ProbeReply>> + Send;
}

/// ICMPv4 echo prober over a raw socket.
///
/// Each probe opens a raw socket with the requested TTL on a blocking task.
/// Raw sockets need elevated privileges (`CAP_NET_RAW` on Linux,
/// administrator on Windows); without them every probe fails with
/// [`NetworkError::Socket`].
#[derive(Debug)]
pub struct IcmpProber {
    identifier: u16,
    next_sequence: AtomicU16,
    payload: Vec<u8>,
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self::new()
    }
}

impl IcmpProber {
    /// Create a prober sending a single zero byte as payload.
    pub fn new() -> Self {
        Self {
            // Only the low 16 bits fit the ICMP identifier field.
            identifier: std::process::id() as u16,
            next_sequence: AtomicU16::new(1),
            payload: vec![0],
        }
    }

    /// Set the echo payload.
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// The echo payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl EchoProber for IcmpProber {
    async fn probe(
        &self,
        destination: IpAddr,
        hop_limit: u32,
        timeout: Duration,
    ) -> Result<ProbeReply> {
        let IpAddr::V4(target) = destination else {
            return Err(NetworkError::UnsupportedAddress(destination));
        };
        let request = EchoRequest {
            identifier: self.identifier,
            sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
        };
        let packet = request.encode(&self.payload);

        tokio::task::spawn_blocking(move || {
            send_and_wait(target, hop_limit, timeout, request, &packet)
        })
        .await?
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EchoRequest {
    identifier: u16,
    sequence: u16,
}

impl EchoRequest {
    fn encode(self, payload: &[u8]) -> Vec<u8> {
        let mut packet = Vec::with_capacity(ICMP_HEADER_LEN + payload.len());
        packet.extend_from_slice(&[ECHO_REQUEST, 0, 0, 0]);
        packet.extend_from_slice(&self.identifier.to_be_bytes());
        packet.extend_from_slice(&self.sequence.to_be_bytes());
        packet.extend_from_slice(payload);

        let sum = checksum(&packet);
        packet[2..4].copy_from_slice(&sum.to_be_bytes());
        packet
    }

    /// Whether an ICMP header (echo reply or quoted request) carries our ids.
    fn matches(self, icmp: &[u8]) -> bool {
        icmp.len() >= ICMP_HEADER_LEN
            && icmp[4..6] == self.identifier.to_be_bytes()
            && icmp[6..8] == self.sequence.to_be_bytes()
    }
}

fn send_and_wait(
    target: Ipv4Addr,
    hop_limit: u32,
    timeout: Duration,
    request: EchoRequest,
    packet: &[u8],
) -> Result<ProbeReply> {
    let _span = PerfSpan::new("icmp_probe");

    let mut socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))
        .map_err(NetworkError::Socket)?;
    socket.set_ttl(hop_limit).map_err(NetworkError::Socket)?;

    let address = SockAddr::from(SocketAddrV4::new(target, 0));
    socket.send_to(packet, &address)?;

    let deadline = Instant::now() + timeout;
    let mut buffer = [0u8; RECV_BUFFER_LEN];
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(ProbeReply::timed_out());
        }
        socket.set_read_timeout(Some(remaining))?;

        let len = match socket.read(&mut buffer) {
            Ok(len) => len,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Ok(ProbeReply::timed_out());
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };

        match parse_reply(&buffer[..len], request) {
            Some(reply) => return Ok(reply),
            None => {
                tracing::trace!(
                    target: targets::TRACE_ROUTE,
                    len,
                    "ignoring unrelated ICMP datagram"
                );
            }
        }
    }
}

/// Decode a raw IPv4 datagram into a reply to `request`, if it is one.
fn parse_reply(datagram: &[u8], request: EchoRequest) -> Option<ProbeReply> {
    if datagram.len() < MIN_IPV4_HEADER_LEN {
        return None;
    }
    let source = Ipv4Addr::new(datagram[12], datagram[13], datagram[14], datagram[15]);
    let icmp = datagram.get(ipv4_header_len(datagram)?..)?;
    if icmp.len() < ICMP_HEADER_LEN {
        return None;
    }

    let status = match icmp[0] {
        ECHO_REPLY if request.matches(icmp) => ProbeStatus::Success,
        TIME_EXCEEDED | DESTINATION_UNREACHABLE => {
            // Errors quote the offending IP header plus the first eight
            // bytes of our echo request.
            let quoted = &icmp[ICMP_HEADER_LEN..];
            let inner = quoted.get(ipv4_header_len(quoted)?..)?;
            if inner.first() != Some(&ECHO_REQUEST) || !request.matches(inner) {
                return None;
            }
            if icmp[0] == TIME_EXCEEDED {
                ProbeStatus::TtlExpired
            } else {
                ProbeStatus::DestinationUnreachable
            }
        }
        _ => return None,
    };

    Some(ProbeReply::new(IpAddr::V4(source), status))
}

fn ipv4_header_len(datagram: &[u8]) -> Option<usize> {
    let len = usize::from(datagram.first()? & 0x0f) * 4;
    (len >= MIN_IPV4_HEADER_LEN).then_some(len)
}

/// Internet checksum (RFC 1071).
fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = data
        .chunks(2)
        .map(|chunk| match chunk {
            [hi, lo] => u32::from(u16::from_be_bytes([*hi, *lo])),
            [hi] => u32::from(u16::from_be_bytes([*hi, 0])),
            _ => 0,
        })
        .sum();
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: EchoRequest = EchoRequest {
        identifier: 0x1234,
        sequence: 7,
    };

    fn ipv4_header(source: [u8; 4]) -> Vec<u8> {
        let mut header = vec![0u8; 20];
        header[0] = 0x45;
        header[9] = 1;
        header[12..16].copy_from_slice(&source);
        header
    }

    fn icmp_error(kind: u8, source: [u8; 4], quoted: EchoRequest) -> Vec<u8> {
        let mut datagram = ipv4_header(source);
        datagram.extend_from_slice(&[kind, 0, 0, 0, 0, 0, 0, 0]);
        datagram.extend(ipv4_header([192, 168, 1, 10]));
        datagram.extend(quoted.encode(&[0])[..8].iter().copied());
        datagram
    }

    #[test]
    fn test_encoded_request_checksums_to_zero() {
        let packet = REQUEST.encode(&[0]);
        assert_eq!(packet.len(), 9);
        assert_eq!(packet[0], ECHO_REQUEST);
        assert_eq!(&packet[4..8], &[0x12, 0x34, 0x00, 0x07]);
        assert_eq!(checksum(&packet), 0);
    }

    #[test]
    fn test_checksum_known_value() {
        // Echo request, id 1, seq 1, no payload.
        let header = [8, 0, 0, 0, 0, 1, 0, 1];
        assert_eq!(checksum(&header), 0xf7fd);
    }

    #[test]
    fn test_parse_echo_reply() {
        let mut datagram = ipv4_header([93, 184, 216, 34]);
        let mut icmp = REQUEST.encode(&[0]);
        icmp[0] = ECHO_REPLY;
        datagram.extend(icmp);

        let reply = parse_reply(&datagram, REQUEST).unwrap();
        assert_eq!(reply.status, ProbeStatus::Success);
        assert_eq!(reply.address, Some("93.184.216.34".parse().unwrap()));
    }

    #[test]
    fn test_parse_time_exceeded() {
        let datagram = icmp_error(TIME_EXCEEDED, [10, 0, 0, 1], REQUEST);
        let reply = parse_reply(&datagram, REQUEST).unwrap();
        assert_eq!(reply.status, ProbeStatus::TtlExpired);
        assert_eq!(reply.address, Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_parse_destination_unreachable() {
        let datagram = icmp_error(DESTINATION_UNREACHABLE, [10, 0, 0, 2], REQUEST);
        let reply = parse_reply(&datagram, REQUEST).unwrap();
        assert_eq!(reply.status, ProbeStatus::DestinationUnreachable);
    }

    #[test]
    fn test_ignores_other_probes() {
        let other = EchoRequest {
            identifier: 0x1234,
            sequence: 8,
        };
        let datagram = icmp_error(TIME_EXCEEDED, [10, 0, 0, 1], other);
        assert!(parse_reply(&datagram, REQUEST).is_none());

        let mut datagram = ipv4_header([10, 0, 0, 1]);
        let mut icmp = other.encode(&[]);
        icmp[0] = ECHO_REPLY;
        datagram.extend(icmp);
        assert!(parse_reply(&datagram, REQUEST).is_none());
    }

    #[test]
    fn test_ignores_truncated_datagrams() {
        assert!(parse_reply(&[0x45, 0, 0], REQUEST).is_none());
        let mut datagram = ipv4_header([10, 0, 0, 1]);
        datagram.extend_from_slice(&[TIME_EXCEEDED, 0, 0, 0]);
        assert!(parse_reply(&datagram, REQUEST).is_none());
    }

    #[test]
    fn test_payload_builder() {
        let prober = IcmpProber::new().with_payload(b"ipfield".to_vec());
        assert_eq!(prober.payload(), b"ipfield");
        assert_eq!(IcmpProber::default().payload(), &[0]);
    }

    #[tokio::test]
    async fn test_ipv6_is_unsupported() {
        let prober = IcmpProber::new();
        let err = prober
            .probe("::1".parse().unwrap(), 1, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::UnsupportedAddress(_)));
    }
}
