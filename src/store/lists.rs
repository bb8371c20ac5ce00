/*!
 * List Values
 *
 * Double-ended lists of binary-safe elements. A list is removed with its
 * last element.
 */

use std::collections::VecDeque;

use bytes::Bytes;

use super::Store;
use crate::error::Result;
use crate::storage::Slot;
use crate::value::Value;

/// Which end of the list an operation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum End {
    Head,
    Tail,
}

pub(crate) fn push(slot: &mut Slot, end: End, value: Bytes) -> Result<usize> {
    let list = slot
        .value_or_insert_with(|| Value::List(VecDeque::new()))
        .as_list_mut()?;
    match end {
        End::Head => list.push_front(value),
        End::Tail => list.push_back(value),
    }
    Ok(list.len())
}

pub(crate) fn pop(slot: &mut Slot, end: End) -> Result<Option<Bytes>> {
    let popped = match slot.value() {
        Some(v) => {
            let list = v.as_list_mut()?;
            match end {
                End::Head => list.pop_front(),
                End::Tail => list.pop_back(),
            }
        }
        None => None,
    };
    slot.drop_if_empty();
    Ok(popped)
}

pub(crate) fn llen(slot: &mut Slot) -> Result<usize> {
    match slot.value() {
        Some(v) => Ok(v.as_list()?.len()),
        None => Ok(0),
    }
}

/// Resolve Redis-style inclusive `start..=stop` (negative counts from the
/// tail) against a list of `len` elements
fn clamp_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

pub(crate) fn lrange(slot: &mut Slot, start: i64, stop: i64) -> Result<Vec<Bytes>> {
    let Some(v) = slot.value() else {
        return Ok(Vec::new());
    };
    let list = v.as_list()?;
    Ok(match clamp_range(start, stop, list.len()) {
        Some((from, to)) => list.range(from..=to).cloned().collect(),
        None => Vec::new(),
    })
}

impl Store {
    /// Push `value` onto the head of the list at `key`
    ///
    /// # Returns
    /// * List length after the push
    pub fn lpush(&self, key: &str, value: impl AsRef<[u8]>) -> Result<usize> {
        let value = Bytes::copy_from_slice(value.as_ref());
        self.with_key(key, |s| push(s, End::Head, value))
    }

    /// Push `value` onto the tail of the list at `key`
    pub fn rpush(&self, key: &str, value: impl AsRef<[u8]>) -> Result<usize> {
        let value = Bytes::copy_from_slice(value.as_ref());
        self.with_key(key, |s| push(s, End::Tail, value))
    }

    pub fn lpop(&self, key: &str) -> Result<Option<Bytes>> {
        self.with_key(key, |s| pop(s, End::Head))
    }

    /// Pop from the tail. With `lpush` this gives FIFO order.
    pub fn rpop(&self, key: &str) -> Result<Option<Bytes>> {
        self.with_key(key, |s| pop(s, End::Tail))
    }

    pub fn llen(&self, key: &str) -> Result<usize> {
        self.with_key(key, llen)
    }

    /// Elements `start..=stop`; negative indices count from the tail
    pub fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Bytes>> {
        self.with_key(key, |s| lrange(s, start, stop))
    }
}
