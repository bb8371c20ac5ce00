/*!
 * Set Values
 *
 * Unordered sets and set algebra. Algebra results are returned as
 * `BTreeSet` so callers get a stable, sorted view regardless of hash order.
 */

use std::collections::BTreeSet;

use super::Store;
use crate::error::Result;
use crate::storage::{Locked, Slot};
use crate::value::{Members, Value};

pub(crate) fn sadd(slot: &mut Slot, member: &str) -> Result<bool> {
    if let Some(v) = slot.value() {
        let set = v.as_set_mut()?;
        return Ok(set.insert(member.to_owned()));
    }
    let mut set = Members::default();
    set.insert(member.to_owned());
    slot.put(Value::Set(set), None);
    Ok(true)
}

pub(crate) fn srem(slot: &mut Slot, member: &str) -> Result<bool> {
    let removed = match slot.value() {
        Some(v) => v.as_set_mut()?.remove(member),
        None => false,
    };
    slot.drop_if_empty();
    Ok(removed)
}

pub(crate) fn sismember(slot: &mut Slot, member: &str) -> Result<bool> {
    match slot.value() {
        Some(v) => Ok(v.as_set()?.contains(member)),
        None => Ok(false),
    }
}

pub(crate) fn smembers(slot: &mut Slot) -> Result<BTreeSet<String>> {
    match slot.value() {
        Some(v) => Ok(v.as_set()?.iter().cloned().collect()),
        None => Ok(BTreeSet::new()),
    }
}

pub(crate) fn scard(slot: &mut Slot) -> Result<usize> {
    match slot.value() {
        Some(v) => Ok(v.as_set()?.len()),
        None => Ok(0),
    }
}

/// Members of each key in order. Absent keys read as empty sets.
fn operands<K: AsRef<str>>(locked: &mut Locked<'_>, keys: &[K]) -> Result<Vec<Members>> {
    keys.iter()
        .map(|k| match locked.slot(k.as_ref()).value() {
            Some(v) => v.as_set().cloned(),
            None => Ok(Members::default()),
        })
        .collect()
}

pub(crate) fn sinter<K: AsRef<str>>(locked: &mut Locked<'_>, keys: &[K]) -> Result<BTreeSet<String>> {
    let mut sets = operands(locked, keys)?;
    // intersect starting from the smallest operand
    sets.sort_by_key(|s| s.len());
    let Some((first, rest)) = sets.split_first() else {
        return Ok(BTreeSet::new());
    };
    Ok(first
        .iter()
        .filter(|m| rest.iter().all(|s| s.contains(*m)))
        .cloned()
        .collect())
}

pub(crate) fn sunion<K: AsRef<str>>(locked: &mut Locked<'_>, keys: &[K]) -> Result<BTreeSet<String>> {
    Ok(operands(locked, keys)?.into_iter().flatten().collect())
}

pub(crate) fn sdiff<K: AsRef<str>>(locked: &mut Locked<'_>, keys: &[K]) -> Result<BTreeSet<String>> {
    let sets = operands(locked, keys)?;
    let Some((first, rest)) = sets.split_first() else {
        return Ok(BTreeSet::new());
    };
    Ok(first
        .iter()
        .filter(|m| !rest.iter().any(|s| s.contains(*m)))
        .cloned()
        .collect())
}

impl Store {
    /// Add `member` to the set at `key`, creating it if absent
    ///
    /// # Returns
    /// * `true` if the member was not already present
    pub fn sadd(&self, key: &str, member: &str) -> Result<bool> {
        self.with_key(key, |s| sadd(s, member))
    }

    /// Remove `member`. The key is deleted once the set is empty.
    pub fn srem(&self, key: &str, member: &str) -> Result<bool> {
        self.with_key(key, |s| srem(s, member))
    }

    pub fn sismember(&self, key: &str, member: &str) -> Result<bool> {
        self.with_key(key, |s| sismember(s, member))
    }

    pub fn smembers(&self, key: &str) -> Result<BTreeSet<String>> {
        self.with_key(key, smembers)
    }

    pub fn scard(&self, key: &str) -> Result<usize> {
        self.with_key(key, scard)
    }

    /// Intersection of the sets at `keys`
    ///
    /// All keys are read under one lock set, so the result is a consistent
    /// snapshot. An empty key list yields an empty set.
    pub fn sinter<K: AsRef<str>>(&self, keys: &[K]) -> Result<BTreeSet<String>> {
        let mut locked = self.keyspace().lock(keys);
        sinter(&mut locked, keys)
    }

    pub fn sunion<K: AsRef<str>>(&self, keys: &[K]) -> Result<BTreeSet<String>> {
        let mut locked = self.keyspace().lock(keys);
        sunion(&mut locked, keys)
    }

    /// Members of the first set absent from every other set
    pub fn sdiff<K: AsRef<str>>(&self, keys: &[K]) -> Result<BTreeSet<String>> {
        let mut locked = self.keyspace().lock(keys);
        sdiff(&mut locked, keys)
    }
}
