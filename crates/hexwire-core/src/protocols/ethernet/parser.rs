use super::layout;
use crate::protocols::cursor::Cursor;
use crate::protocols::error::DissectError;

/// Decoded Ethernet II header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetHeader {
    pub destination: [u8; 6],
    pub source: [u8; 6],
    pub ethertype: u16,
}

pub fn parse_ethernet(cursor: &Cursor<'_>) -> Result<EthernetHeader, DissectError> {
    cursor.require_len(layout::HEADER_LEN)?;

    Ok(EthernetHeader {
        destination: cursor.read_array(layout::DEST_MAC_RANGE)?,
        source: cursor.read_array(layout::SOURCE_MAC_RANGE)?,
        ethertype: cursor.read_u16_be(layout::ETHERTYPE_RANGE)?,
    })
}
