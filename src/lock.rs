/*!
 * Lease Locks
 *
 * A lock is an ordinary string key whose value is the holder's token and
 * whose deadline is the lease. Acquiring is a set-if-absent with expiry;
 * releasing and extending check the token under the same slot lock, so a
 * holder whose lease already lapsed cannot disturb the next holder.
 *
 * Nothing here retries or waits. Callers loop on `acquire` if they want
 * blocking behaviour.
 */

use std::time::Duration;

use bytes::Bytes;

use crate::storage::Slot;
use crate::store::keys::deadline;
use crate::store::Store;
use crate::value::Value;

pub(crate) fn acquire(slot: &mut Slot, token: &[u8], lease: Duration) -> bool {
    if slot.value().is_some() {
        return false;
    }
    slot.put(Value::Str(Bytes::copy_from_slice(token)), deadline(lease));
    true
}

pub(crate) fn extend(slot: &mut Slot, token: &[u8], lease: Duration) -> bool {
    let held = matches!(slot.value(), Some(Value::Str(v)) if &v[..] == token);
    held && slot.set_deadline(deadline(lease))
}

impl Store {
    /// Try to take the lock at `key` for `lease`
    ///
    /// # Arguments
    /// * `key` - Lock name
    /// * `token` - Unique value identifying this holder
    /// * `lease` - How long the lock is held unless released or extended
    ///
    /// # Returns
    /// * `true` if the lock was free and is now held with `token`
    pub fn acquire(&self, key: &str, token: impl AsRef<[u8]>, lease: Duration) -> bool {
        self.with_key(key, |s| acquire(s, token.as_ref(), lease))
    }

    /// Release the lock only if `token` still holds it
    pub fn release(&self, key: &str, token: impl AsRef<[u8]>) -> bool {
        self.compare_and_delete(key, token)
    }

    /// Restart the lease at `lease` from now, only if `token` still holds it
    pub fn extend(&self, key: &str, token: impl AsRef<[u8]>, lease: Duration) -> bool {
        self.with_key(key, |s| extend(s, token.as_ref(), lease))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use std::thread::sleep;

    fn store() -> Store {
        Store::new(StoreConfig::lazy_only())
    }

    #[test]
    fn second_holder_waits_for_lease() {
        let s = store();
        assert!(s.acquire("lock", "a", Duration::from_millis(30)));
        assert!(!s.acquire("lock", "b", Duration::from_millis(30)));
        sleep(Duration::from_millis(50));
        assert!(s.acquire("lock", "b", Duration::from_secs(10)));
    }

    #[test]
    fn stale_holder_cannot_release() {
        let s = store();
        assert!(s.acquire("lock", "a", Duration::from_millis(20)));
        sleep(Duration::from_millis(40));
        assert!(s.acquire("lock", "b", Duration::from_secs(10)));
        assert!(!s.release("lock", "a"));
        assert!(!s.extend("lock", "a", Duration::from_secs(10)));
        assert!(s.release("lock", "b"));
        assert!(!s.exists("lock"));
    }

    #[test]
    fn extend_keeps_lock_alive() {
        let s = store();
        assert!(s.acquire("lock", "a", Duration::from_millis(40)));
        sleep(Duration::from_millis(20));
        assert!(s.extend("lock", "a", Duration::from_secs(10)));
        sleep(Duration::from_millis(40));
        assert!(!s.acquire("lock", "b", Duration::from_secs(1)));
    }
}
