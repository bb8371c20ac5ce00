/*!
 * Bitmaps
 *
 * SETBIT, GETBIT and BITCOUNT over `Value::Bitmap`.
 */

use super::Store;
use crate::bitmap::{Bitmap, MAX_BIT_OFFSET};
use crate::error::{Result, StoreError};
use crate::storage::Slot;
use crate::value::Value;

pub(crate) fn setbit(slot: &mut Slot, offset: u64, bit: u8) -> Result<u8> {
    // reject before creating the key
    if bit > 1 {
        return Err(StoreError::InvalidBitValue);
    }
    if offset > MAX_BIT_OFFSET {
        return Err(StoreError::BitOffsetOutOfRange);
    }
    slot.value_or_insert_with(|| Value::Bitmap(Bitmap::new()))
        .as_bitmap_mut()?
        .set(offset, bit)
}

pub(crate) fn getbit(slot: &mut Slot, offset: u64) -> Result<u8> {
    match slot.value() {
        Some(v) => v.as_bitmap()?.get(offset),
        None if offset > MAX_BIT_OFFSET => Err(StoreError::BitOffsetOutOfRange),
        None => Ok(0),
    }
}

pub(crate) fn bitcount(slot: &mut Slot) -> Result<u64> {
    match slot.value() {
        Some(v) => Ok(v.as_bitmap()?.count_ones()),
        None => Ok(0),
    }
}

impl Store {
    /// Set or clear the bit at `offset`
    ///
    /// # Arguments
    /// * `key` - Bitmap key; created zero-filled if absent
    /// * `offset` - Bit index, MSB-first within each byte
    /// * `bit` - `0` or `1`
    ///
    /// # Returns
    /// * The previous bit
    pub fn setbit(&self, key: &str, offset: u64, bit: u8) -> Result<u8> {
        self.with_key(key, |s| setbit(s, offset, bit))
    }

    /// Bit at `offset`; bits beyond the stored length read as 0
    pub fn getbit(&self, key: &str, offset: u64) -> Result<u8> {
        self.with_key(key, |s| getbit(s, offset))
    }

    pub fn bitcount(&self, key: &str) -> Result<u64> {
        self.with_key(key, bitcount)
    }
}
