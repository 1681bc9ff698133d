//! Report composition for dissected frames.
//!
//! Pure formatting: every value comes out of a [`Dissection`]; no decoding
//! happens here. Each frame's report is written as one unit so a shared sink
//! never interleaves output from different frames.

use std::io::{self, Write};

use crate::dissect::{Dissection, Transport};
use crate::protocols::error::DissectError;
use crate::protocols::ethernet::EthernetHeader;
use crate::protocols::icmp::IcmpHeader;
use crate::protocols::ipv4::Ipv4Header;
use crate::protocols::tcp::TcpHeader;
use crate::protocols::udp::UdpHeader;
use crate::render::hexdump::hex_dump;

/// Write one frame's full report to `out`.
///
/// Section order: banner, Ethernet, IP, transport (when decoded), then the
/// labeled hex dumps of the IP header bytes, the transport header bytes, and
/// the residual payload.
pub fn write_report<W: Write>(out: &mut W, d: &Dissection<'_>) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", banner(&d.transport))?;
    write_ethernet_section(out, &d.ethernet)?;
    write_ipv4_section(out, &d.ipv4)?;
    match &d.transport {
        Transport::Icmp(icmp) => write_icmp_section(out, icmp)?,
        Transport::Tcp(tcp) => write_tcp_section(out, tcp)?,
        Transport::Udp(udp) => write_udp_section(out, udp)?,
        Transport::Igmp | Transport::Other(_) => {}
    }

    writeln!(out)?;
    writeln!(out, "                        DATA Dump                         ")?;
    write_dump_section(out, "IP Header", d.network_bytes)?;
    if let Some(label) = transport_dump_label(&d.transport) {
        write_dump_section(out, label, d.transport_bytes)?;
    }
    write_dump_section(out, "Data Payload", d.payload)?;
    Ok(())
}

/// One-line diagnostic for a frame that failed to decode. No partial header
/// dump is attempted.
pub fn write_malformed<W: Write>(
    out: &mut W,
    captured_len: usize,
    err: &DissectError,
) -> io::Result<()> {
    writeln!(
        out,
        "\n[!] Malformed frame ({captured_len} bytes captured): {err}"
    )
}

fn banner(transport: &Transport) -> &'static str {
    match transport {
        Transport::Icmp(_) => "***********************ICMP Packet************************",
        Transport::Tcp(_) => "***********************TCP Packet*************************",
        Transport::Udp(_) => "***********************UDP Packet*************************",
        Transport::Igmp | Transport::Other(_) => {
            "***********************IP Packet**************************"
        }
    }
}

fn transport_dump_label(transport: &Transport) -> Option<&'static str> {
    match transport {
        Transport::Icmp(_) => Some("ICMP Header"),
        Transport::Tcp(_) => Some("TCP Header"),
        Transport::Udp(_) => Some("UDP Header"),
        Transport::Igmp | Transport::Other(_) => None,
    }
}

fn write_ethernet_section<W: Write>(out: &mut W, eth: &EthernetHeader) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Ethernet Header")?;
    writeln!(
        out,
        "   |-Destination Address  : {} ",
        format_mac(&eth.destination)
    )?;
    writeln!(out, "   |-Source Address       : {} ", format_mac(&eth.source))?;
    writeln!(out, "   |-Protocol             : {} ", eth.ethertype)
}

fn write_ipv4_section<W: Write>(out: &mut W, ip: &Ipv4Header) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "IP Header")?;
    writeln!(out, "   |-IP Version           : {}", ip.version)?;
    writeln!(out, "   |-IP Header Length     : {} Bytes", ip.header_len())?;
    writeln!(out, "   |-Type Of Service      : {}", ip.tos)?;
    writeln!(out, "   |-IP Total Length      : {} Bytes", ip.total_len)?;
    writeln!(out, "   |-Identification       : {}", ip.identification)?;
    writeln!(out, "   |-TTL                  : {}", ip.ttl)?;
    writeln!(out, "   |-Protocol             : {}", ip.protocol)?;
    writeln!(out, "   |-Checksum             : {}", ip.checksum)?;
    writeln!(out, "   |-Source IP            : {}", ip.source)?;
    writeln!(out, "   |-Destination IP       : {}", ip.destination)
}

fn write_icmp_section<W: Write>(out: &mut W, icmp: &IcmpHeader) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "ICMP Header")?;
    match icmp.type_note() {
        Some(note) => writeln!(out, "   |-Type                 : {}   ({})", icmp.icmp_type, note)?,
        None => writeln!(out, "   |-Type                 : {}", icmp.icmp_type)?,
    }
    writeln!(out, "   |-Code                 : {}", icmp.code)?;
    writeln!(out, "   |-Checksum             : {}", icmp.checksum)
}

fn write_tcp_section<W: Write>(out: &mut W, tcp: &TcpHeader) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "TCP Header")?;
    writeln!(out, "   |-Source Port          : {}", tcp.source_port)?;
    writeln!(out, "   |-Destination Port     : {}", tcp.dest_port)?;
    writeln!(out, "   |-Sequence Number      : {}", tcp.sequence)?;
    writeln!(out, "   |-Acknowledge Number   : {}", tcp.acknowledgment)?;
    writeln!(out, "   |-Header Length        : {} Bytes", tcp.header_len())?;
    writeln!(out, "   |-Urgent Flag          : {}", u8::from(tcp.flags.urg))?;
    writeln!(out, "   |-Acknowledgement Flag : {}", u8::from(tcp.flags.ack))?;
    writeln!(out, "   |-Push Flag            : {}", u8::from(tcp.flags.psh))?;
    writeln!(out, "   |-Reset Flag           : {}", u8::from(tcp.flags.rst))?;
    writeln!(out, "   |-Synchronise Flag     : {}", u8::from(tcp.flags.syn))?;
    writeln!(out, "   |-Finish Flag          : {}", u8::from(tcp.flags.fin))?;
    writeln!(out, "   |-Window               : {}", tcp.window)?;
    writeln!(out, "   |-Checksum             : {}", tcp.checksum)?;
    writeln!(out, "   |-Urgent Pointer       : {}", tcp.urgent_pointer)
}

fn write_udp_section<W: Write>(out: &mut W, udp: &UdpHeader) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "UDP Header")?;
    writeln!(out, "   |-Source Port          : {}", udp.source_port)?;
    writeln!(out, "   |-Destination Port     : {}", udp.dest_port)?;
    writeln!(out, "   |-UDP Length           : {}", udp.length)?;
    writeln!(out, "   |-UDP Checksum         : {}", udp.checksum)
}

fn write_dump_section<W: Write>(out: &mut W, label: &str, bytes: &[u8]) -> io::Result<()> {
    writeln!(out, "{label}")?;
    for line in hex_dump(bytes) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn format_mac(mac: &[u8; 6]) -> String {
    format!(
        "{:02X}-{:02X}-{:02X}-{:02X}-{:02X}-{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}

#[cfg(test)]
mod tests {
    use super::{write_malformed, write_report};
    use crate::dissect::dissect;
    use crate::protocols::error::DissectError;
    use etherparse::PacketBuilder;

    fn report_for(frame: &[u8]) -> String {
        let d = dissect(frame).expect("frame decodes");
        let mut out = Vec::new();
        write_report(&mut out, &d).expect("write to vec");
        String::from_utf8(out).expect("utf8 report")
    }

    #[test]
    fn tcp_report_has_all_sections_in_order() {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([192, 168, 0, 1], [192, 168, 0, 2], 64)
            .tcp(443, 50000, 1, 1024);
        let mut frame = Vec::new();
        builder.write(&mut frame, b"payload").unwrap();

        let report = report_for(&frame);
        let order = [
            "TCP Packet",
            "Ethernet Header",
            "IP Header",
            "TCP Header",
            "DATA Dump",
            "Data Payload",
        ];
        let mut last = 0;
        for needle in order {
            let at = report[last..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing section {needle}"));
            last += at;
        }
        assert!(report.contains("   |-Source Port          : 443"));
        assert!(report.contains("   |-Source IP            : 192.168.0.1"));
        assert!(report.contains("   |-Synchronise Flag     : 0"));
    }

    #[test]
    fn udp_report_labels_udp_fields() {
        let builder = PacketBuilder::ethernet2([1, 1, 1, 1, 1, 1], [2, 2, 2, 2, 2, 2])
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .udp(53, 40000);
        let mut frame = Vec::new();
        builder.write(&mut frame, &[0xde, 0xad]).unwrap();

        let report = report_for(&frame);
        assert!(report.contains("UDP Packet"));
        assert!(report.contains("   |-UDP Length           : 10"));
        assert!(report.contains("UDP Header"));
        assert!(!report.contains("TCP Header"));
    }

    #[test]
    fn icmp_type_line_carries_annotation() {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([8, 8, 8, 8], [10, 0, 0, 1], 64)
            .icmpv4_echo_reply(1, 1);
        let mut frame = Vec::new();
        builder.write(&mut frame, &[]).unwrap();

        let report = report_for(&frame);
        assert!(report.contains("ICMP Packet"));
        assert!(report.contains("   |-Type                 : 0   (ICMP Echo Reply)"));
    }

    #[test]
    fn empty_payload_section_has_header_but_no_lines() {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([192, 168, 0, 1], [192, 168, 0, 2], 64)
            .tcp(80, 8080, 0, 0);
        let mut frame = Vec::new();
        builder.write(&mut frame, &[]).unwrap();

        let report = report_for(&frame);
        let after = report
            .split("Data Payload\n")
            .nth(1)
            .expect("payload section present");
        assert!(after.is_empty());
    }

    #[test]
    fn mac_addresses_render_dash_separated() {
        let builder = PacketBuilder::ethernet2(
            [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
            [0x00, 0x11, 0x22, 0x33, 0x44, 0x55],
        )
        .ipv4([1, 1, 1, 1], [2, 2, 2, 2], 64)
        .udp(1, 2);
        let mut frame = Vec::new();
        builder.write(&mut frame, &[]).unwrap();

        let report = report_for(&frame);
        assert!(report.contains("   |-Source Address       : DE-AD-BE-EF-00-01 "));
        assert!(report.contains("   |-Destination Address  : 00-11-22-33-44-55 "));
    }

    #[test]
    fn malformed_diagnostic_is_single_line() {
        let mut out = Vec::new();
        let err = DissectError::Truncated {
            needed: 20,
            actual: 16,
        };
        write_malformed(&mut out, 16, &err).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\n[!] Malformed frame (16 bytes captured): frame too short: need 20 bytes, got 16\n"
        );
    }
}
