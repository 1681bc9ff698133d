use super::layout;
use crate::protocols::cursor::Cursor;
use crate::protocols::error::DissectError;

/// The six control bits of the TCP flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpFlags {
    pub urg: bool,
    pub ack: bool,
    pub psh: bool,
    pub rst: bool,
    pub syn: bool,
    pub fin: bool,
}

impl TcpFlags {
    fn from_bits(bits: u8) -> Self {
        Self {
            urg: bits & layout::FLAG_URG != 0,
            ack: bits & layout::FLAG_ACK != 0,
            psh: bits & layout::FLAG_PSH != 0,
            rst: bits & layout::FLAG_RST != 0,
            syn: bits & layout::FLAG_SYN != 0,
            fin: bits & layout::FLAG_FIN != 0,
        }
    }
}

/// Decoded TCP header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpHeader {
    pub source_port: u16,
    pub dest_port: u16,
    pub sequence: u32,
    pub acknowledgment: u32,
    pub data_offset: u8,
    pub flags: TcpFlags,
    pub window: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
}

impl TcpHeader {
    /// Header length in bytes (`data_offset` counts 32-bit words).
    pub fn header_len(&self) -> usize {
        self.data_offset as usize * layout::DATA_OFFSET_WORD
    }
}

/// Decode a TCP header from a cursor positioned at its first byte.
///
/// Fails when `data_offset` claims less than the 20-byte minimum or when the
/// claimed header length (options included) runs past the captured bytes.
pub fn parse_tcp(cursor: &Cursor<'_>) -> Result<TcpHeader, DissectError> {
    cursor.require_len(layout::MIN_HEADER_LEN)?;

    let data_offset = cursor.read_u8(layout::DATA_OFFSET_OFFSET)? >> layout::DATA_OFFSET_SHIFT;
    if data_offset < layout::MIN_DATA_OFFSET {
        return Err(DissectError::InvalidHeaderLength {
            header: "TCP",
            len: data_offset as usize * layout::DATA_OFFSET_WORD,
            min: layout::MIN_HEADER_LEN,
        });
    }
    cursor.require_len(data_offset as usize * layout::DATA_OFFSET_WORD)?;

    Ok(TcpHeader {
        source_port: cursor.read_u16_be(layout::SOURCE_PORT_RANGE)?,
        dest_port: cursor.read_u16_be(layout::DEST_PORT_RANGE)?,
        sequence: cursor.read_u32_be(layout::SEQUENCE_RANGE)?,
        acknowledgment: cursor.read_u32_be(layout::ACKNOWLEDGMENT_RANGE)?,
        data_offset,
        flags: TcpFlags::from_bits(cursor.read_u8(layout::FLAGS_OFFSET)?),
        window: cursor.read_u16_be(layout::WINDOW_RANGE)?,
        checksum: cursor.read_u16_be(layout::CHECKSUM_RANGE)?,
        urgent_pointer: cursor.read_u16_be(layout::URGENT_POINTER_RANGE)?,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_tcp;
    use crate::protocols::cursor::Cursor;
    use crate::protocols::error::DissectError;
    use crate::protocols::tcp::layout;

    fn syn_header() -> [u8; 20] {
        [
            0x04, 0xd2, // source port: 1234
            0x00, 0x50, // destination port: 80
            0x00, 0x00, 0x00, 0x64, // sequence: 100
            0x00, 0x00, 0x00, 0x00, // acknowledgment: 0
            0x50, // data offset 5, reserved 0
            0x02, // flags: SYN
            0x72, 0x10, // window: 29200
            0xab, 0xcd, // checksum
            0x00, 0x00, // urgent pointer
        ]
    }

    #[test]
    fn parse_syn_header() {
        let bytes = syn_header();
        let header = parse_tcp(&Cursor::new(&bytes)).unwrap();

        assert_eq!(header.source_port, 1234);
        assert_eq!(header.dest_port, 80);
        assert_eq!(header.sequence, 100);
        assert_eq!(header.acknowledgment, 0);
        assert_eq!(header.data_offset, 5);
        assert_eq!(header.header_len(), 20);
        assert!(header.flags.syn);
        assert!(!header.flags.ack);
        assert!(!header.flags.fin);
        assert_eq!(header.window, 29200);
        assert_eq!(header.checksum, 0xabcd);
        assert_eq!(header.urgent_pointer, 0);
    }

    #[test]
    fn parse_all_flags_set() {
        let mut bytes = syn_header();
        bytes[layout::FLAGS_OFFSET] = 0x3f;

        let flags = parse_tcp(&Cursor::new(&bytes)).unwrap().flags;
        assert!(flags.urg && flags.ack && flags.psh && flags.rst && flags.syn && flags.fin);
    }

    #[test]
    fn parse_header_with_options() {
        // data offset 6: one option word, here MSS.
        let mut bytes = syn_header().to_vec();
        bytes[layout::DATA_OFFSET_OFFSET] = 0x60;
        bytes.extend_from_slice(&[0x02, 0x04, 0x05, 0xb4]);

        let header = parse_tcp(&Cursor::new(&bytes)).unwrap();
        assert_eq!(header.data_offset, 6);
        assert_eq!(header.header_len(), 24);
    }

    #[test]
    fn parse_rejects_data_offset_below_minimum() {
        let mut bytes = syn_header();
        bytes[layout::DATA_OFFSET_OFFSET] = 0x40; // claims a 16-byte header

        let err = parse_tcp(&Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(
            err,
            DissectError::InvalidHeaderLength {
                len: 16,
                min: 20,
                ..
            }
        ));
    }

    #[test]
    fn parse_rejects_options_past_capture() {
        let mut bytes = syn_header();
        bytes[layout::DATA_OFFSET_OFFSET] = 0x80; // claims 32 bytes, only 20 captured

        let err = parse_tcp(&Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, DissectError::Truncated { needed: 32, .. }));
    }

    #[test]
    fn parse_short_header() {
        let bytes = [0u8; 10];
        let err = parse_tcp(&Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, DissectError::Truncated { needed: 20, .. }));
    }
}
