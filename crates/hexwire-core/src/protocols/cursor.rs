use std::ops::Range;

use super::error::DissectError;

/// Bounds-checked view over a captured frame.
///
/// Every header field in this crate is read through this type; decoders never
/// index the buffer themselves. Multi-byte reads interpret the bytes as
/// network byte order and convert to host order.
pub struct Cursor<'a> {
    data: &'a [u8],
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DissectError> {
        if self.data.len() < needed {
            return Err(DissectError::Truncated {
                needed,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DissectError> {
        self.data
            .get(offset)
            .copied()
            .ok_or(DissectError::Truncated {
                needed: offset + 1,
                actual: self.data.len(),
            })
    }

    pub fn read_u16_be(&self, range: Range<usize>) -> Result<u16, DissectError> {
        Ok(u16::from_be_bytes(self.read_array(range)?))
    }

    pub fn read_u32_be(&self, range: Range<usize>) -> Result<u32, DissectError> {
        Ok(u32::from_be_bytes(self.read_array(range)?))
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], DissectError> {
        self.data
            .get(range.clone())
            .ok_or(DissectError::Truncated {
                needed: range.end,
                actual: self.data.len(),
            })
    }

    /// Everything from `offset` to the end of the buffer.
    pub fn slice_from(&self, offset: usize) -> Result<&'a [u8], DissectError> {
        self.data.get(offset..).ok_or(DissectError::Truncated {
            needed: offset,
            actual: self.data.len(),
        })
    }

    /// Fixed-width field as an array; `range` must span exactly `N` bytes.
    pub fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], DissectError> {
        let bytes = self.read_slice(range)?;
        let mut out = [0u8; N];
        if bytes.len() != N {
            return Err(DissectError::Truncated {
                needed: N,
                actual: bytes.len(),
            });
        }
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
