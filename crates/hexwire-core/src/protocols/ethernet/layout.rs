pub const DEST_MAC_RANGE: std::ops::Range<usize> = 0..6;
pub const SOURCE_MAC_RANGE: std::ops::Range<usize> = 6..12;
pub const ETHERTYPE_RANGE: std::ops::Range<usize> = 12..14;

pub const HEADER_LEN: usize = 14;
