use super::layout;
use crate::protocols::cursor::Cursor;
use crate::protocols::error::DissectError;

/// Decoded ICMP header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpHeader {
    pub icmp_type: u8,
    pub code: u8,
    pub checksum: u16,
}

impl IcmpHeader {
    /// Cosmetic annotation for well-known types; reporting only.
    pub fn type_note(&self) -> Option<&'static str> {
        match self.icmp_type {
            layout::TYPE_ECHO_REPLY => Some("ICMP Echo Reply"),
            layout::TYPE_TTL_EXPIRED => Some("TTL Expired"),
            _ => None,
        }
    }
}

pub fn parse_icmp(cursor: &Cursor<'_>) -> Result<IcmpHeader, DissectError> {
    cursor.require_len(layout::HEADER_LEN)?;

    Ok(IcmpHeader {
        icmp_type: cursor.read_u8(layout::TYPE_OFFSET)?,
        code: cursor.read_u8(layout::CODE_OFFSET)?,
        checksum: cursor.read_u16_be(layout::CHECKSUM_RANGE)?,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_icmp;
    use crate::protocols::cursor::Cursor;
    use crate::protocols::error::DissectError;

    #[test]
    fn parse_echo_reply() {
        let bytes = [0x00, 0x00, 0x5c, 0x2a, 0x00, 0x01, 0x00, 0x07];
        let header = parse_icmp(&Cursor::new(&bytes)).unwrap();

        assert_eq!(header.icmp_type, 0);
        assert_eq!(header.code, 0);
        assert_eq!(header.checksum, 0x5c2a);
        assert_eq!(header.type_note(), Some("ICMP Echo Reply"));
    }

    #[test]
    fn parse_ttl_expired() {
        let bytes = [0x0b, 0x00, 0xf4, 0xff, 0x00, 0x00, 0x00, 0x00];
        let header = parse_icmp(&Cursor::new(&bytes)).unwrap();
        assert_eq!(header.type_note(), Some("TTL Expired"));
    }

    #[test]
    fn unknown_type_has_no_note() {
        let bytes = [0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let header = parse_icmp(&Cursor::new(&bytes)).unwrap();
        assert_eq!(header.type_note(), None);
    }

    #[test]
    fn parse_short_header() {
        // Type/code/checksum fit, but the logical 8-byte header does not.
        let bytes = [0x00, 0x00, 0x00, 0x00];
        let err = parse_icmp(&Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(
            err,
            DissectError::Truncated {
                needed: 8,
                actual: 4
            }
        ));
    }
}
