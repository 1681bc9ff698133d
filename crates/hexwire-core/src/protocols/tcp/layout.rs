pub const SOURCE_PORT_RANGE: std::ops::Range<usize> = 0..2;
pub const DEST_PORT_RANGE: std::ops::Range<usize> = 2..4;
pub const SEQUENCE_RANGE: std::ops::Range<usize> = 4..8;
pub const ACKNOWLEDGMENT_RANGE: std::ops::Range<usize> = 8..12;
pub const DATA_OFFSET_OFFSET: usize = 12;
pub const FLAGS_OFFSET: usize = 13;
pub const WINDOW_RANGE: std::ops::Range<usize> = 14..16;
pub const CHECKSUM_RANGE: std::ops::Range<usize> = 16..18;
pub const URGENT_POINTER_RANGE: std::ops::Range<usize> = 18..20;

pub const DATA_OFFSET_SHIFT: u32 = 4;

/// `data_offset` counts 32-bit words.
pub const DATA_OFFSET_WORD: usize = 4;
pub const MIN_DATA_OFFSET: u8 = 5;
pub const MIN_HEADER_LEN: usize = MIN_DATA_OFFSET as usize * DATA_OFFSET_WORD;

pub const FLAG_FIN: u8 = 0x01;
pub const FLAG_SYN: u8 = 0x02;
pub const FLAG_RST: u8 = 0x04;
pub const FLAG_PSH: u8 = 0x08;
pub const FLAG_ACK: u8 = 0x10;
pub const FLAG_URG: u8 = 0x20;
