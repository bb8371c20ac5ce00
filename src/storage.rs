/*!
 * In-Memory Keyspace
 *
 * This module provides the storage layer for the engine: a concurrent map
 * from keys to per-key *slots*. A slot is a mutex-protected cell holding
 * an optional entry (value + optional deadline). Every command runs while
 * holding the mutex of each key it touches, which makes read-modify-write
 * sequences atomic per key.
 *
 * Locking rules:
 * - Multi-key operations lock their keys in lexicographic order, so two
 *   batches can never wait on each other in a cycle.
 * - No thread blocks on a slot mutex while holding a map shard lock. Slot
 *   handles are cloned out of the map first and locked afterwards.
 * - A vacant slot is removed from the map only when the map holds the
 *   sole reference to it, checked under the shard write lock. Nobody else
 *   can be about to lock it, so a key never has two live slots.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use smol_str::SmolStr;

use crate::error::{Result, StoreError};
use crate::value::Value;

/// A stored value and its optional deadline
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Value,
    pub expires_at: Option<Instant>,
}

impl Entry {
    #[inline]
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// Remaining lifetime of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlStatus {
    /// The key does not exist (or already expired)
    Missing,
    /// The key exists without a deadline
    NoExpiry,
    /// Time left before the key expires
    Remaining(Duration),
}

/// Per-key lock cell
///
/// All accessors apply lazy expiry first: once the deadline has passed the
/// entry is dropped and the key reads as absent. Each accessor reads the
/// clock again, so a command must resolve the slot once and write through
/// that result rather than re-checking between read and write.
#[derive(Debug, Default)]
pub struct Slot {
    entry: Option<Entry>,
}

impl Slot {
    /// Drop the entry if its deadline passed. Returns `true` if it did.
    pub(crate) fn purge_expired(&mut self, now: Instant) -> bool {
        if self.entry.as_ref().is_some_and(|e| e.is_expired(now)) {
            self.entry = None;
            true
        } else {
            false
        }
    }

    /// Live entry, if any
    pub fn entry(&mut self) -> Option<&mut Entry> {
        self.purge_expired(Instant::now());
        self.entry.as_mut()
    }

    /// Live value, if any
    #[inline]
    pub fn value(&mut self) -> Option<&mut Value> {
        self.entry().map(|e| &mut e.value)
    }

    /// Live value, creating it with `init` (no deadline) when absent
    pub fn value_or_insert_with(&mut self, init: impl FnOnce() -> Value) -> &mut Value {
        self.purge_expired(Instant::now());
        &mut self
            .entry
            .get_or_insert_with(|| Entry {
                value: init(),
                expires_at: None,
            })
            .value
    }

    /// Store `value`, replacing whatever was there. Returns the previous
    /// live value.
    pub fn put(&mut self, value: Value, expires_at: Option<Instant>) -> Option<Value> {
        self.purge_expired(Instant::now());
        self.entry
            .replace(Entry { value, expires_at })
            .map(|old| old.value)
    }

    /// Remove and return the live entry
    pub fn take(&mut self) -> Option<Entry> {
        self.purge_expired(Instant::now());
        self.entry.take()
    }

    /// Restore a previously taken entry as-is
    pub(crate) fn restore(&mut self, entry: Entry) {
        self.entry = Some(entry);
    }

    /// Remove the value if it is a collection with no members left
    pub fn drop_if_empty(&mut self) {
        if self
            .entry
            .as_ref()
            .is_some_and(|e| e.value.is_empty_collection())
        {
            self.entry = None;
        }
    }

    /// True when the slot holds nothing observable
    pub(crate) fn is_vacant(&self, now: Instant) -> bool {
        self.entry.as_ref().map_or(true, |e| e.is_expired(now))
    }

    pub fn ttl(&mut self) -> TtlStatus {
        let now = Instant::now();
        self.purge_expired(now);
        match &self.entry {
            None => TtlStatus::Missing,
            Some(Entry { expires_at: None, .. }) => TtlStatus::NoExpiry,
            Some(Entry {
                expires_at: Some(deadline),
                ..
            }) => TtlStatus::Remaining(deadline.saturating_duration_since(now)),
        }
    }

    /// Set or clear the deadline of a live key. Returns `false` when absent.
    pub fn set_deadline(&mut self, expires_at: Option<Instant>) -> bool {
        match self.entry() {
            Some(e) => {
                e.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

type SlotRef = Arc<Mutex<Slot>>;
type SlotGuard = ArcMutexGuard<RawMutex, Slot>;

/// Concurrent key → slot map
#[derive(Default)]
pub struct Keyspace {
    slots: DashMap<SmolStr, SlotRef, ahash::RandomState>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `key`, creating an empty slot when missing
    ///
    /// The shard lock is released before the handle is returned.
    fn slot(&self, key: &str) -> SlotRef {
        let existing = self.slots.get(key).map(|s| Arc::clone(s.value()));
        match existing {
            Some(slot) => slot,
            None => Arc::clone(self.slots.entry(SmolStr::new(key)).or_default().value()),
        }
    }

    /// Lock every key in `keys` (duplicates allowed) in lexicographic order
    pub fn lock<I, K>(&self, keys: I) -> Locked<'_>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut names: Vec<SmolStr> = keys.into_iter().map(|k| SmolStr::new(k.as_ref())).collect();
        names.sort_unstable();
        names.dedup();

        // clone every handle out of the map before blocking on any mutex
        let handles: Vec<(SmolStr, SlotRef)> = names
            .into_iter()
            .map(|name| {
                let slot = self.slot(&name);
                (name, slot)
            })
            .collect();

        let guards = handles
            .into_iter()
            .map(|(name, slot)| {
                let guard = slot.lock_arc();
                (name, guard)
            })
            .collect();

        Locked {
            keyspace: self,
            guards,
        }
    }

    /// Remove `key`'s slot if it is vacant and nobody else references it
    fn reclaim(&self, key: &str) {
        let now = Instant::now();
        self.slots.remove_if(key, |_, slot| {
            Arc::strong_count(slot) == 1
                && slot.try_lock().is_some_and(|s| s.is_vacant(now))
        });
    }

    /// Number of slots currently in the map
    ///
    /// Includes keys that expired but were not yet touched or swept.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop expired entries and reclaim vacant slots.
    ///
    /// Slots locked by a caller are skipped this round. Returns the number
    /// of expired keys removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let handles: Vec<(SmolStr, SlotRef)> = self
            .slots
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();

        let mut reaped = 0;
        for (key, slot) in handles {
            let vacant = match slot.try_lock() {
                Some(mut s) => {
                    if s.purge_expired(now) {
                        reaped += 1;
                    }
                    s.is_vacant(now)
                }
                None => false,
            };
            drop(slot);
            if vacant {
                self.reclaim(&key);
            }
        }
        reaped
    }

    /// Remove every key. Each slot is cleared under its own lock.
    pub fn flush(&self) {
        let keys: Vec<SmolStr> = self.slots.iter().map(|e| e.key().clone()).collect();
        for key in keys {
            let mut locked = self.lock([key.as_str()]);
            locked.slot(&key).take();
        }
    }

    /// Move `from`'s value and deadline to `to`, replacing `to`.
    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.lock([from, to]).rename(from, to)
    }
}

/// Set of slot guards held by one operation
///
/// Dropping it releases every lock and then reclaims slots left vacant.
pub struct Locked<'a> {
    keyspace: &'a Keyspace,
    /// sorted by key
    guards: Vec<(SmolStr, SlotGuard)>,
}

impl Locked<'_> {
    /// Slot of a key locked by this operation
    ///
    /// # Panics
    /// If `key` was not part of the key set passed to [`Keyspace::lock`].
    pub fn slot(&mut self, key: &str) -> &mut Slot {
        let idx = self
            .guards
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .unwrap_or_else(|_| panic!("key {key:?} is not locked by this operation"));
        &mut *self.guards[idx].1
    }

    /// Move `from`'s entry to `to`; both keys must be locked
    ///
    /// Renaming a key onto itself leaves it in place.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let entry = self.slot(from).take().ok_or(StoreError::KeyAbsent)?;
        self.slot(to).restore(entry);
        Ok(())
    }
}

impl Drop for Locked<'_> {
    fn drop(&mut self) {
        let now = Instant::now();
        let vacant: Vec<SmolStr> = self
            .guards
            .iter()
            .filter(|(_, g)| g.is_vacant(now))
            .map(|(k, _)| k.clone())
            .collect();
        // release mutexes and slot handles before touching the map
        self.guards.clear();
        for key in vacant {
            self.keyspace.reclaim(&key);
        }
    }
}
