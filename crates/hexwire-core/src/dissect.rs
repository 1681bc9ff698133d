//! Frame dissection: link -> network -> transport dispatch.
//!
//! [`dissect`] runs one captured frame through the header decoders and
//! returns the decoded layers plus the byte ranges the report renders. It is
//! pure computation over the in-memory buffer; counters and output belong to
//! the session layer.

use crate::protocols::cursor::Cursor;
use crate::protocols::error::DissectError;
use crate::protocols::ethernet::{self, EthernetHeader};
use crate::protocols::icmp::{self, IcmpHeader};
use crate::protocols::ipv4::{self, Ipv4Header};
use crate::protocols::tcp::{self, TcpHeader};
use crate::protocols::udp::{self, UdpHeader};

/// IP protocol numbers the dispatcher routes on.
pub mod ip_protocol {
    pub const ICMP: u8 = 1;
    pub const IGMP: u8 = 2;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}

/// Transport-layer outcome of a dissection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Icmp(IcmpHeader),
    Tcp(TcpHeader),
    Udp(UdpHeader),
    /// Counted, never decoded further.
    Igmp,
    /// Unknown protocol id; dissection stops after the network layer.
    Other(u8),
}

/// Counter bucket a dissected frame falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolClass {
    Tcp,
    Udp,
    Icmp,
    Igmp,
    Other,
}

impl Transport {
    pub fn class(&self) -> ProtocolClass {
        match self {
            Transport::Icmp(_) => ProtocolClass::Icmp,
            Transport::Tcp(_) => ProtocolClass::Tcp,
            Transport::Udp(_) => ProtocolClass::Udp,
            Transport::Igmp => ProtocolClass::Igmp,
            Transport::Other(_) => ProtocolClass::Other,
        }
    }
}

/// One frame fully taken apart.
///
/// Header records own their field values; the three byte ranges borrow from
/// the frame and exist for the report's hex-dump sections.
#[derive(Debug)]
pub struct Dissection<'a> {
    pub ethernet: EthernetHeader,
    pub ipv4: Ipv4Header,
    pub transport: Transport,
    /// Raw bytes of the IPv4 header, options included.
    pub network_bytes: &'a [u8],
    /// Raw bytes of the decoded transport header; empty when undecoded.
    pub transport_bytes: &'a [u8],
    /// Whatever remains after the recognized headers.
    pub payload: &'a [u8],
}

/// Decode one captured frame.
///
/// Any [`DissectError`] aborts this frame only; the caller reports it and
/// moves on to the next capture.
pub fn dissect(frame: &[u8]) -> Result<Dissection<'_>, DissectError> {
    let cursor = Cursor::new(frame);
    let ethernet = ethernet::parse_ethernet(&cursor)?;

    let network_region = cursor.slice_from(ethernet::layout::HEADER_LEN)?;
    let network_cursor = Cursor::new(network_region);
    let ipv4 = ipv4::parse_ipv4(&network_cursor)?;
    let network_bytes = network_cursor.read_slice(0..ipv4.header_len())?;

    let transport_region = network_cursor.slice_from(ipv4.header_len())?;
    let transport_cursor = Cursor::new(transport_region);
    let (transport, transport_len) = match ipv4.protocol {
        ip_protocol::ICMP => {
            let header = icmp::parse_icmp(&transport_cursor)?;
            (Transport::Icmp(header), icmp::layout::HEADER_LEN)
        }
        ip_protocol::IGMP => (Transport::Igmp, 0),
        ip_protocol::TCP => {
            let header = tcp::parse_tcp(&transport_cursor)?;
            let len = header.header_len();
            (Transport::Tcp(header), len)
        }
        ip_protocol::UDP => {
            let header = udp::parse_udp(&transport_cursor)?;
            (Transport::Udp(header), udp::layout::HEADER_LEN)
        }
        other => (Transport::Other(other), 0),
    };
    let transport_bytes = transport_cursor.read_slice(0..transport_len)?;
    let payload = transport_cursor.slice_from(transport_len)?;

    Ok(Dissection {
        ethernet,
        ipv4,
        transport,
        network_bytes,
        transport_bytes,
        payload,
    })
}
