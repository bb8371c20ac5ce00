/*!
 * Key Operations
 *
 * Type-agnostic access to any value plus expiry management.
 */

use std::time::{Duration, Instant};

use super::Store;
use crate::error::Result;
use crate::storage::{Slot, TtlStatus};
use crate::value::Value;

/// Absolute deadline `ttl` from now. Durations too large to represent
/// mean "never".
#[inline]
pub(crate) fn deadline(ttl: Duration) -> Option<Instant> {
    Instant::now().checked_add(ttl)
}

pub(crate) fn get(slot: &mut Slot) -> Option<Value> {
    slot.value().cloned()
}

pub(crate) fn set(slot: &mut Slot, value: Value, ttl: Option<Duration>) -> Option<Value> {
    slot.put(value, ttl.and_then(deadline))
}

pub(crate) fn delete(slot: &mut Slot) -> bool {
    slot.take().is_some()
}

pub(crate) fn exists(slot: &mut Slot) -> bool {
    slot.value().is_some()
}

pub(crate) fn expire(slot: &mut Slot, ttl: Duration) -> bool {
    // an unrepresentable deadline leaves the key persistent
    slot.set_deadline(deadline(ttl))
}

pub(crate) fn persist(slot: &mut Slot) -> bool {
    match slot.entry() {
        Some(e) if e.expires_at.is_some() => {
            e.expires_at = None;
            true
        }
        _ => false,
    }
}

impl Store {
    /// Copy of the value stored at `key`, of any type
    pub fn get(&self, key: &str) -> Option<Value> {
        self.with_key(key, get)
    }

    /// Store `value` at `key`, overwriting any existing value of any type
    ///
    /// # Arguments
    /// * `key` - Target key
    /// * `value` - New value
    /// * `ttl` - Optional time-to-live; `None` stores a persistent key
    ///
    /// # Returns
    /// * The previous live value, if there was one
    pub fn set(&self, key: &str, value: impl Into<Value>, ttl: Option<Duration>) -> Option<Value> {
        let value = value.into();
        self.with_key(key, |s| set(s, value, ttl))
    }

    /// Delete a key. Returns `true` if it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.with_key(key, delete)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.with_key(key, exists)
    }

    /// Give an existing key a time-to-live. Returns `false` if absent.
    pub fn expire(&self, key: &str, ttl: Duration) -> bool {
        self.with_key(key, |s| expire(s, ttl))
    }

    /// Clear a key's deadline. Returns `true` if it had one.
    pub fn persist(&self, key: &str) -> bool {
        self.with_key(key, persist)
    }

    pub fn ttl(&self, key: &str) -> TtlStatus {
        self.with_key(key, |s| s.ttl())
    }

    /// Type name of the value at `key` (`"string"`, `"set"`, ...)
    pub fn key_type(&self, key: &str) -> Option<&'static str> {
        self.with_key(key, |s| s.value().map(|v| v.type_name()))
    }

    /// Move a key (value and deadline) to a new name, replacing the target
    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.keyspace().rename(from, to)
    }

    /// Number of stored keys
    ///
    /// Counts keys that expired but were not yet reclaimed.
    pub fn len(&self) -> usize {
        self.keyspace().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyspace().is_empty()
    }

    /// Remove every key
    pub fn flush(&self) {
        self.keyspace().flush()
    }

    /// Run one expiry sweep now. Returns the number of keys removed.
    pub fn sweep_expired(&self) -> usize {
        self.keyspace().sweep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::error::StoreError;

    fn store() -> Store {
        Store::new(StoreConfig::lazy_only())
    }

    #[test]
    fn set_returns_previous_value() {
        let s = store();
        assert_eq!(s.set("k", "a", None), None);
        assert_eq!(s.set("k", "b", None), Some(Value::from("a")));
        assert_eq!(s.get("k"), Some(Value::from("b")));
    }

    #[test]
    fn set_overwrites_other_types() {
        let s = store();
        s.sadd("k", "m").unwrap();
        assert_eq!(s.key_type("k"), Some("set"));
        s.set("k", "plain", None);
        assert_eq!(s.key_type("k"), Some("string"));
    }

    #[test]
    fn expire_and_persist() {
        let s = store();
        assert!(!s.expire("missing", Duration::from_secs(1)));
        s.set("k", "v", None);
        assert_eq!(s.ttl("k"), TtlStatus::NoExpiry);
        assert!(s.expire("k", Duration::from_secs(50)));
        match s.ttl("k") {
            TtlStatus::Remaining(d) => assert!(d <= Duration::from_secs(50)),
            other => panic!("unexpected ttl {other:?}"),
        }
        assert!(s.persist("k"));
        assert!(!s.persist("k"));
        assert_eq!(s.ttl("missing"), TtlStatus::Missing);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let s = store();
        s.set("k", "v", Some(Duration::ZERO));
        assert!(!s.exists("k"));
        assert_eq!(s.get("k"), None);
    }

    #[test]
    fn rename_requires_source() {
        let s = store();
        assert_eq!(s.rename("nope", "x"), Err(StoreError::KeyAbsent));
        s.set("a", "1", None);
        s.rename("a", "b").unwrap();
        assert!(!s.exists("a"));
        assert_eq!(s.get("b"), Some(Value::from("1")));
    }

    #[test]
    fn flush_empties_store() {
        let s = store();
        s.set("a", "1", None);
        s.lpush("b", "x").unwrap();
        s.flush();
        assert!(s.is_empty());
        assert!(!s.exists("a"));
    }
}
