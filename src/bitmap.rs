/*!
 * Bitmap
 *
 * A growable bit string addressed the Redis way: bit 0 is the most
 * significant bit of byte 0. Setting a bit past the end zero-extends the
 * buffer; reading past the end yields 0.
 */

use crate::error::{Result, StoreError};

/// Highest addressable bit offset (512 MiB of bits)
pub const MAX_BIT_OFFSET: u64 = (1 << 32) - 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    bytes: Vec<u8>,
}

#[inline]
fn locate(offset: u64) -> Result<(usize, u8)> {
    if offset > MAX_BIT_OFFSET {
        return Err(StoreError::BitOffsetOutOfRange);
    }
    let byte = (offset >> 3) as usize;
    let mask = 0x80u8 >> (offset & 7);
    Ok((byte, mask))
}

impl Bitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bit at `offset` to `bit` and return its previous value.
    ///
    /// # Errors
    /// * `InvalidBitValue` when `bit` is neither 0 nor 1
    /// * `BitOffsetOutOfRange` when `offset` exceeds [`MAX_BIT_OFFSET`]
    pub fn set(&mut self, offset: u64, bit: u8) -> Result<u8> {
        if bit > 1 {
            return Err(StoreError::InvalidBitValue);
        }
        let (byte, mask) = locate(offset)?;
        if byte >= self.bytes.len() {
            self.bytes.resize(byte + 1, 0);
        }
        let slot = &mut self.bytes[byte];
        let previous = (*slot & mask != 0) as u8;
        if bit == 1 {
            *slot |= mask;
        } else {
            *slot &= !mask;
        }
        Ok(previous)
    }

    /// Read the bit at `offset`
    pub fn get(&self, offset: u64) -> Result<u8> {
        let (byte, mask) = locate(offset)?;
        Ok(self.bytes.get(byte).map_or(0, |b| (b & mask != 0) as u8))
    }

    /// Number of set bits
    pub fn count_ones(&self) -> u64 {
        self.bytes.iter().map(|b| b.count_ones() as u64).sum()
    }

    /// Length of the backing buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_first_addressing() {
        let mut bm = Bitmap::new();
        bm.set(0, 1).unwrap();
        bm.set(7, 1).unwrap();
        assert_eq!(bm.as_bytes(), &[0b1000_0001]);
    }

    #[test]
    fn grows_to_cover_offset() {
        let mut bm = Bitmap::new();
        assert_eq!(bm.set(125, 1).unwrap(), 0);
        assert_eq!(bm.byte_len(), 16);
        assert_eq!(bm.get(125).unwrap(), 1);
        assert_eq!(bm.get(100).unwrap(), 0);
        assert_eq!(bm.get(10_000).unwrap(), 0);
        assert_eq!(bm.set(125, 0).unwrap(), 1);
        assert_eq!(bm.count_ones(), 0);
    }

    #[test]
    fn rejects_bad_arguments() {
        let mut bm = Bitmap::new();
        assert_eq!(bm.set(618, 2), Err(StoreError::InvalidBitValue));
        assert_eq!(bm.set(MAX_BIT_OFFSET + 1, 1), Err(StoreError::BitOffsetOutOfRange));
        assert_eq!(bm.byte_len(), 0);
    }
}
