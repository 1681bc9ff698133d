//! End-to-end pipeline test: capture file -> source -> session -> log.

use std::io::Write;

use etherparse::PacketBuilder;
use hexwire_core::{PcapFileSource, run_session};

fn tcp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
        .ipv4([192, 168, 1, 10], [93, 184, 216, 34], 64)
        .tcp(49152, 443, 1000, 64240);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

fn udp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
        .ipv4([192, 168, 1, 10], [192, 168, 1, 1], 64)
        .udp(5000, 53);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

fn write_legacy_pcap(frames: &[Vec<u8>]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&65535u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    for (i, frame) in frames.iter().enumerate() {
        bytes.extend_from_slice(&(1_700_000_000 + i as u32).to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(frame);
    }
    file.write_all(&bytes).expect("write pcap");
    file
}

#[test]
fn dissects_capture_file_and_reconciles_counters() {
    let frames = vec![
        tcp_frame(b"GET / HTTP/1.1\r\n"),
        udp_frame(&[0x12, 0x34]),
        tcp_frame(&[]),
    ];
    let file = write_legacy_pcap(&frames);

    let source = PcapFileSource::open(file.path()).expect("open capture");
    let mut log = Vec::new();
    let mut refreshes = 0u64;
    let summary = run_session(source, &mut log, |counters| {
        refreshes += 1;
        assert_eq!(counters.total, counters.classified() + counters.malformed);
    })
    .expect("session");

    assert_eq!(summary.counters.tcp, 2);
    assert_eq!(summary.counters.udp, 1);
    assert_eq!(summary.counters.total, 3);
    assert_eq!(refreshes, 3);

    let log = String::from_utf8(log).expect("utf8 log");
    assert!(log.contains("***********************TCP Packet*************************"));
    assert!(log.contains("***********************UDP Packet*************************"));
    assert!(log.contains("   |-Destination IP       : 93.184.216.34"));
    // The HTTP payload shows up in the ASCII column.
    assert!(log.contains("GET / HTTP/1.1"));

    let json = serde_json::to_value(&summary).expect("summary json");
    assert_eq!(json["counters"]["tcp"].as_u64(), Some(2));
    assert!(json["time_start"].is_string());
}

#[test]
fn truncated_frame_in_capture_is_diagnosed_not_fatal() {
    let whole = tcp_frame(&[]);
    let frames = vec![whole[..16].to_vec(), udp_frame(&[])];
    let file = write_legacy_pcap(&frames);

    let source = PcapFileSource::open(file.path()).expect("open capture");
    let mut log = Vec::new();
    let summary = run_session(source, &mut log, |_| {}).expect("session");

    assert_eq!(summary.counters.total, 2);
    assert_eq!(summary.counters.malformed, 1);
    assert_eq!(summary.counters.udp, 1);
    assert_eq!(summary.counters.tcp, 0);

    let log = String::from_utf8(log).expect("utf8 log");
    assert!(log.contains("[!] Malformed frame (16 bytes captured)"));
    assert!(log.contains("UDP Packet"));
}
