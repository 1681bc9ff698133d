use super::layout;
use crate::protocols::cursor::Cursor;
use crate::protocols::error::DissectError;

/// Decoded UDP header. `length` is the datagram's own claim (header plus
/// payload), reported as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpHeader {
    pub source_port: u16,
    pub dest_port: u16,
    pub length: u16,
    pub checksum: u16,
}

pub fn parse_udp(cursor: &Cursor<'_>) -> Result<UdpHeader, DissectError> {
    cursor.require_len(layout::HEADER_LEN)?;

    Ok(UdpHeader {
        source_port: cursor.read_u16_be(layout::SOURCE_PORT_RANGE)?,
        dest_port: cursor.read_u16_be(layout::DEST_PORT_RANGE)?,
        length: cursor.read_u16_be(layout::LENGTH_RANGE)?,
        checksum: cursor.read_u16_be(layout::CHECKSUM_RANGE)?,
    })
}
