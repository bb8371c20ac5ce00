/*!
 * Hash Values
 *
 * Field → value maps stored under one key. Fields are UTF-8 strings and
 * values are binary-safe. A field can also act as an integer counter
 * (HINCRBY), which lets many related counters share one key, e.g. one
 * hash per post with `<user>:like:total` fields found again with HSCAN.
 */

use bytes::Bytes;

use super::Store;
use crate::error::{Result, StoreError};
use crate::glob::GlobPattern;
use crate::storage::Slot;
use crate::value::{Fields, Value};

/// Parse a stored field as a signed 64-bit integer
fn parse_field(raw: &[u8]) -> Result<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(StoreError::NotANumber)
}

/// Fields in lexicographic order
fn sorted_pairs<'a>(fields: impl Iterator<Item = (&'a String, &'a Bytes)>) -> Vec<(String, Bytes)> {
    let mut pairs: Vec<(String, Bytes)> = fields.map(|(f, v)| (f.clone(), v.clone())).collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    pairs
}

pub(crate) fn hset(slot: &mut Slot, field: &str, value: Bytes) -> Result<bool> {
    if let Some(v) = slot.value() {
        return Ok(v.as_hash_mut()?.insert(field.to_owned(), value).is_none());
    }
    let mut fields = Fields::default();
    fields.insert(field.to_owned(), value);
    slot.put(Value::Hash(fields), None);
    Ok(true)
}

pub(crate) fn hget(slot: &mut Slot, field: &str) -> Result<Option<Bytes>> {
    match slot.value() {
        Some(v) => Ok(v.as_hash()?.get(field).cloned()),
        None => Ok(None),
    }
}

pub(crate) fn hdel(slot: &mut Slot, field: &str) -> Result<bool> {
    let removed = match slot.value() {
        Some(v) => v.as_hash_mut()?.remove(field).is_some(),
        None => false,
    };
    slot.drop_if_empty();
    Ok(removed)
}

pub(crate) fn hlen(slot: &mut Slot) -> Result<usize> {
    match slot.value() {
        Some(v) => Ok(v.as_hash()?.len()),
        None => Ok(0),
    }
}

pub(crate) fn hgetall(slot: &mut Slot) -> Result<Vec<(String, Bytes)>> {
    match slot.value() {
        Some(v) => Ok(sorted_pairs(v.as_hash()?.iter())),
        None => Ok(Vec::new()),
    }
}

/// Add `delta` to the integer in `field`, creating the hash and the field
/// (from zero) as needed. The key's deadline is untouched.
pub(crate) fn hincrby(slot: &mut Slot, field: &str, delta: i64) -> Result<i64> {
    match slot.value() {
        Some(v) => {
            let fields = v.as_hash_mut()?;
            let current = match fields.get(field) {
                Some(raw) => parse_field(raw)?,
                None => 0,
            };
            let next = current.checked_add(delta).ok_or(StoreError::Overflow)?;
            fields.insert(field.to_owned(), Bytes::from(next.to_string()));
            Ok(next)
        }
        None => {
            let mut fields = Fields::default();
            fields.insert(field.to_owned(), Bytes::from(delta.to_string()));
            slot.put(Value::Hash(fields), None);
            Ok(delta)
        }
    }
}

/// Fields whose name matches the glob `pattern`, in lexicographic order
pub(crate) fn hscan(slot: &mut Slot, pattern: &str) -> Result<Vec<(String, Bytes)>> {
    let pattern = GlobPattern::new(pattern);
    match slot.value() {
        Some(v) => Ok(sorted_pairs(
            v.as_hash()?.iter().filter(|(f, _)| pattern.matches(f)),
        )),
        None => Ok(Vec::new()),
    }
}

impl Store {
    /// Set `field` in the hash at `key`
    ///
    /// # Returns
    /// * `true` if the field is new, `false` if an existing value was replaced
    pub fn hset(&self, key: &str, field: &str, value: impl AsRef<[u8]>) -> Result<bool> {
        let value = Bytes::copy_from_slice(value.as_ref());
        self.with_key(key, |s| hset(s, field, value))
    }

    pub fn hget(&self, key: &str, field: &str) -> Result<Option<Bytes>> {
        self.with_key(key, |s| hget(s, field))
    }

    /// Remove `field`. The key is deleted with its last field.
    pub fn hdel(&self, key: &str, field: &str) -> Result<bool> {
        self.with_key(key, |s| hdel(s, field))
    }

    pub fn hlen(&self, key: &str) -> Result<usize> {
        self.with_key(key, hlen)
    }

    /// Every `(field, value)` pair, sorted by field
    pub fn hgetall(&self, key: &str) -> Result<Vec<(String, Bytes)>> {
        self.with_key(key, hgetall)
    }

    /// Increment the integer stored in `field` by `delta`
    ///
    /// # Arguments
    /// * `key` - Hash key; created if absent
    /// * `field` - Counter field; starts from `0` if absent
    /// * `delta` - Signed amount to add
    ///
    /// # Returns
    /// * The field's value after the increment
    /// * `NotANumber` if the field holds something other than a decimal `i64`
    /// * `Overflow` if the result does not fit in `i64`
    pub fn hincrby(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        self.with_key(key, |s| hincrby(s, field, delta))
    }

    /// Fields of `key` whose names match a glob pattern
    ///
    /// `*`, `?`, `[...]` classes and `\` escapes are supported. The whole
    /// hash is scanned under one lock, so there is no cursor.
    pub fn hscan(&self, key: &str, pattern: &str) -> Result<Vec<(String, Bytes)>> {
        self.with_key(key, |s| hscan(s, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::storage::TtlStatus;
    use std::time::Duration;

    fn store() -> Store {
        Store::new(StoreConfig::lazy_only())
    }

    fn pair(f: &str, v: &'static [u8]) -> (String, Bytes) {
        (f.to_string(), Bytes::from_static(v))
    }

    #[test]
    fn set_get_delete_fields() {
        let s = store();
        assert_eq!(s.hset("h", "a", "1"), Ok(true));
        assert_eq!(s.hset("h", "a", "2"), Ok(false));
        assert_eq!(s.hset("h", "b", "3"), Ok(true));
        assert_eq!(s.hget("h", "a"), Ok(Some(Bytes::from_static(b"2"))));
        assert_eq!(s.hget("h", "zz"), Ok(None));
        assert_eq!(s.hlen("h"), Ok(2));
        assert_eq!(s.hgetall("h").unwrap(), vec![pair("a", b"2"), pair("b", b"3")]);

        assert_eq!(s.hdel("h", "a"), Ok(true));
        assert_eq!(s.hdel("h", "a"), Ok(false));
        assert_eq!(s.hdel("h", "b"), Ok(true));
        assert!(!s.exists("h"));
        assert_eq!(s.hlen("h"), Ok(0));
    }

    #[test]
    fn field_counters() {
        let s = store();
        assert_eq!(s.hincrby("post:1", "u7:like:total", 1), Ok(1));
        assert_eq!(s.hincrby("post:1", "u7:like:total", 4), Ok(5));
        assert_eq!(s.hincrby("post:1", "u7:like:total", -6), Ok(-1));

        s.hset("post:1", "title", "hello").unwrap();
        assert_eq!(s.hincrby("post:1", "title", 1), Err(StoreError::NotANumber));
        s.hset("post:1", "big", i64::MAX.to_string()).unwrap();
        assert_eq!(s.hincrby("post:1", "big", 1), Err(StoreError::Overflow));
        assert_eq!(s.hget("post:1", "big"), Ok(Some(Bytes::from(i64::MAX.to_string()))));
    }

    #[test]
    fn field_counter_keeps_deadline() {
        let s = store();
        s.hincrby("h", "n", 1).unwrap();
        s.expire("h", Duration::from_secs(60));
        s.hincrby("h", "n", 1).unwrap();
        assert!(matches!(s.ttl("h"), TtlStatus::Remaining(_)));
    }

    #[test]
    fn scan_filters_by_pattern() {
        let s = store();
        s.hincrby("weibo", "p1:like:total", 3).unwrap();
        s.hincrby("weibo", "p2:like:total", 1).unwrap();
        s.hincrby("weibo", "p1:like:today", 1).unwrap();
        s.hset("weibo", "p1:author", "ann").unwrap();

        assert_eq!(
            s.hscan("weibo", "*:like:total").unwrap(),
            vec![pair("p1:like:total", b"3"), pair("p2:like:total", b"1")]
        );
        assert_eq!(s.hscan("weibo", "p?:author").unwrap(), vec![pair("p1:author", b"ann")]);
        assert_eq!(s.hscan("weibo", "*").unwrap().len(), 4);
        assert!(s.hscan("missing", "*").unwrap().is_empty());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let s = store();
        s.sadd("set", "m").unwrap();
        assert_eq!(s.hset("set", "f", "v"), Err(StoreError::TypeMismatch));
        assert_eq!(s.hincrby("set", "f", 1), Err(StoreError::TypeMismatch));
        assert_eq!(s.hscan("set", "*"), Err(StoreError::TypeMismatch));
        s.hset("h", "f", "v").unwrap();
        assert_eq!(s.get_string("h"), Err(StoreError::TypeMismatch));
    }
}
