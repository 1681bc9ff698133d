pub const TYPE_OFFSET: usize = 0;
pub const CODE_OFFSET: usize = 1;
pub const CHECKSUM_RANGE: std::ops::Range<usize> = 2..4;

/// Logical header length used for offset math. The rest-of-header word is
/// counted even for variants that interpret it differently; sub-type layouts
/// are not parsed.
pub const HEADER_LEN: usize = 8;

pub const TYPE_ECHO_REPLY: u8 = 0;
pub const TYPE_TTL_EXPIRED: u8 = 11;
