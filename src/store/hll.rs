/*!
 * HyperLogLog Commands
 *
 * PFADD, PFCOUNT and PFMERGE over `Value::Hll` sketches.
 */

use super::Store;
use crate::error::Result;
use crate::hll::HyperLogLog;
use crate::storage::{Locked, Slot};
use crate::value::Value;

pub(crate) fn pfadd(slot: &mut Slot, element: &[u8]) -> Result<bool> {
    match slot.value() {
        Some(v) => Ok(v.as_hll_mut()?.add(element)),
        None => {
            // creating the sketch counts as a change even if no register moved
            let mut hll = HyperLogLog::new();
            hll.add(element);
            slot.put(Value::Hll(hll), None);
            Ok(true)
        }
    }
}

pub(crate) fn pfcount(slot: &mut Slot) -> Result<u64> {
    match slot.value() {
        Some(v) => Ok(v.as_hll()?.count()),
        None => Ok(0),
    }
}

/// Register-wise max of `dest` and every source into `dest`
///
/// Sources are checked before `dest` is touched, and `dest` is resolved
/// once so an existing sketch keeps its deadline.
pub(crate) fn pfmerge<K: AsRef<str>>(locked: &mut Locked<'_>, dest: &str, sources: &[K]) -> Result<()> {
    let mut merged = HyperLogLog::new();
    for src in sources {
        if let Some(v) = locked.slot(src.as_ref()).value() {
            merged.merge(v.as_hll()?);
        }
    }

    let slot = locked.slot(dest);
    match slot.value() {
        Some(v) => v.as_hll_mut()?.merge(&merged),
        None => {
            slot.put(Value::Hll(merged), None);
        }
    }
    Ok(())
}

impl Store {
    /// Add `element` to the sketch at `key`
    ///
    /// # Returns
    /// * `true` if the estimate may have changed
    pub fn pfadd(&self, key: &str, element: impl AsRef<[u8]>) -> Result<bool> {
        self.with_key(key, |s| pfadd(s, element.as_ref()))
    }

    /// Approximate number of distinct elements added to `key`
    pub fn pfcount(&self, key: &str) -> Result<u64> {
        self.with_key(key, pfcount)
    }

    /// Merge the sketches at `sources` into `dest`
    ///
    /// `dest` and all sources are locked together. Missing sources are
    /// skipped; a missing `dest` is created.
    pub fn pfmerge<K: AsRef<str>>(&self, dest: &str, sources: &[K]) -> Result<()> {
        let keys = std::iter::once(dest).chain(sources.iter().map(|k| k.as_ref()));
        let mut locked = self.keyspace().lock(keys);
        pfmerge(&mut locked, dest, sources)
    }
}
