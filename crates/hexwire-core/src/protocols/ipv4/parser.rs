use std::net::Ipv4Addr;

use super::layout;
use crate::protocols::cursor::Cursor;
use crate::protocols::error::DissectError;

/// Decoded IPv4 header.
///
/// The flags/fragment-offset word is consumed but not broken out; fragments
/// are reported like any other datagram. The checksum is carried as read,
/// never validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    pub ihl: u8,
    pub tos: u8,
    pub total_len: u16,
    pub identification: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
}

impl Ipv4Header {
    /// Header length in bytes (`ihl` counts 32-bit words).
    pub fn header_len(&self) -> usize {
        self.ihl as usize * layout::IHL_WORD
    }
}

/// Decode an IPv4 header from a cursor positioned at its first byte.
///
/// Fails when `ihl` claims less than the 20-byte minimum or when the claimed
/// header length (options included) runs past the captured bytes.
pub fn parse_ipv4(cursor: &Cursor<'_>) -> Result<Ipv4Header, DissectError> {
    cursor.require_len(layout::MIN_HEADER_LEN)?;

    let version_ihl = cursor.read_u8(layout::VERSION_IHL_OFFSET)?;
    let version = version_ihl >> layout::VERSION_SHIFT;
    let ihl = version_ihl & layout::IHL_MASK;
    if ihl < layout::MIN_IHL {
        return Err(DissectError::InvalidHeaderLength {
            header: "IPv4",
            len: ihl as usize * layout::IHL_WORD,
            min: layout::MIN_HEADER_LEN,
        });
    }
    cursor.require_len(ihl as usize * layout::IHL_WORD)?;

    // Flags and fragment offset stay opaque; the read keeps the field
    // bounds-checked like everything else.
    let _flags_fragment = cursor.read_u16_be(layout::FLAGS_FRAGMENT_RANGE)?;

    Ok(Ipv4Header {
        version,
        ihl,
        tos: cursor.read_u8(layout::TOS_OFFSET)?,
        total_len: cursor.read_u16_be(layout::TOTAL_LEN_RANGE)?,
        identification: cursor.read_u16_be(layout::IDENTIFICATION_RANGE)?,
        ttl: cursor.read_u8(layout::TTL_OFFSET)?,
        protocol: cursor.read_u8(layout::PROTOCOL_OFFSET)?,
        checksum: cursor.read_u16_be(layout::CHECKSUM_RANGE)?,
        source: Ipv4Addr::from(cursor.read_array::<4>(layout::SOURCE_RANGE)?),
        destination: Ipv4Addr::from(cursor.read_array::<4>(layout::DESTINATION_RANGE)?),
    })
}
