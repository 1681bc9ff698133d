//! Canonical hex+ASCII rendering of raw byte ranges.

/// Bytes rendered per dump line.
pub const BYTES_PER_LINE: usize = 16;

const PRINTABLE_MIN: u8 = 32;
// Inclusive bound kept from the original renderer for output compatibility.
const PRINTABLE_MAX: u8 = 128;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Iterator over formatted dump lines, 16 bytes each.
///
/// Yields `ceil(len / 16)` lines and nothing for an empty slice. A fresh
/// iterator is produced per call; no state survives between dumps.
pub struct HexDumpLines<'a> {
    chunks: std::slice::Chunks<'a, u8>,
}

/// Render `bytes` as dump lines: a 4-space indent, one uppercase two-digit
/// hex group per byte, padding so the hex block is always 48 columns, then
/// the ASCII column with `.` for everything outside the printable range.
pub fn hex_dump(bytes: &[u8]) -> HexDumpLines<'_> {
    HexDumpLines {
        chunks: bytes.chunks(BYTES_PER_LINE),
    }
}

impl Iterator for HexDumpLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.chunks.next().map(format_line)
    }
}

fn format_line(chunk: &[u8]) -> String {
    let mut line = String::with_capacity(4 + 3 * BYTES_PER_LINE + 9 + BYTES_PER_LINE);
    line.push_str("    ");
    for &byte in chunk {
        line.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        line.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
        line.push(' ');
    }
    for _ in chunk.len()..BYTES_PER_LINE {
        line.push_str("   ");
    }
    line.push_str("         ");
    for &byte in chunk {
        if (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&byte) {
            line.push(byte as char);
        } else {
            line.push('.');
        }
    }
    line
}
