/*!
 * String Values
 *
 * Binary-safe strings and the signed 64-bit counters stored in them.
 */

use std::time::Duration;

use bytes::Bytes;

use super::keys::deadline;
use super::Store;
use crate::error::{Result, StoreError};
use crate::storage::Slot;
use crate::value::Value;

/// Parse a stored string as a signed 64-bit integer
fn parse_counter(raw: &[u8]) -> Result<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(StoreError::NotANumber)
}

pub(crate) fn get_string(slot: &mut Slot) -> Result<Option<Bytes>> {
    match slot.value() {
        Some(v) => v.as_str().map(|b| Some(b.clone())),
        None => Ok(None),
    }
}

pub(crate) fn set_string(slot: &mut Slot, value: Bytes, ttl: Option<Duration>) {
    slot.put(Value::Str(value), ttl.and_then(deadline));
}

/// Add `delta` to the counter in `slot`. A missing key counts from zero;
/// an existing key keeps its deadline.
///
/// The slot is resolved once: a deadline passing mid-command must not
/// turn an expired counter into a persistent one.
pub(crate) fn incr_by(slot: &mut Slot, delta: i64) -> Result<i64> {
    match slot.value() {
        Some(v) => {
            let next = parse_counter(v.as_str()?)?
                .checked_add(delta)
                .ok_or(StoreError::Overflow)?;
            *v = Value::Str(Bytes::from(next.to_string()));
            Ok(next)
        }
        None => {
            slot.put(Value::Str(Bytes::from(delta.to_string())), None);
            Ok(delta)
        }
    }
}

pub(crate) fn decr_by(slot: &mut Slot, delta: i64) -> Result<i64> {
    let delta = delta.checked_neg().ok_or(StoreError::Overflow)?;
    incr_by(slot, delta)
}

impl Store {
    /// String value at `key`
    ///
    /// # Returns
    /// * `Ok(None)` when the key is absent
    /// * `Err(TypeMismatch)` when it holds another type
    pub fn get_string(&self, key: &str) -> Result<Option<Bytes>> {
        self.with_key(key, get_string)
    }

    /// Store a string value, replacing any existing value
    pub fn set_string(&self, key: &str, value: impl AsRef<[u8]>, ttl: Option<Duration>) {
        let value = Bytes::copy_from_slice(value.as_ref());
        self.with_key(key, |s| set_string(s, value, ttl))
    }

    /// Increment the integer at `key` by one
    pub fn incr(&self, key: &str) -> Result<i64> {
        self.incr_by(key, 1)
    }

    /// Increment the integer at `key` by `delta`
    ///
    /// # Arguments
    /// * `key` - Counter key; created as `0` if absent
    /// * `delta` - Signed amount to add
    ///
    /// # Returns
    /// * The value after the increment
    /// * `NotANumber` if the stored string is not a decimal `i64`
    /// * `Overflow` if the result does not fit in `i64`
    pub fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        self.with_key(key, |s| incr_by(s, delta))
    }

    pub fn decr(&self, key: &str) -> Result<i64> {
        self.decr_by(key, 1)
    }

    pub fn decr_by(&self, key: &str, delta: i64) -> Result<i64> {
        self.with_key(key, |s| decr_by(s, delta))
    }
}
