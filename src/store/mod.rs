/*!
 * Embedded Store
 *
 * `Store` is the public entry point of the engine. It owns the keyspace
 * and, when configured, the background reaper. Commands are grouped by
 * data type in the submodules; each group exposes slot-level functions
 * (shared with the batch executor) and the `Store` methods wrapping them.
 *
 * Every method locks the key(s) it touches for its whole duration, so
 * read-modify-write commands are atomic with respect to other callers.
 * `Store` is `Send + Sync`; share it between threads with an `Arc`.
 */

pub(crate) mod bits;
pub(crate) mod geo;
pub(crate) mod hashes;
pub(crate) mod hll;
pub(crate) mod keys;
pub(crate) mod lists;
pub(crate) mod sets;
pub(crate) mod strings;
pub(crate) mod zsets;

use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::config::StoreConfig;
use crate::reaper::Reaper;
use crate::storage::{Keyspace, Slot};

/// Embeddable key-value store
pub struct Store {
    keyspace: Arc<Keyspace>,
    config: StoreConfig,
    /// Background sweeper; `None` when disabled
    _reaper: Option<Reaper>,
}

impl Store {
    /// Create an empty store
    ///
    /// Spawns the reaper thread when `config.sweep_interval_ms > 0`. If the
    /// thread cannot be spawned the store still works with lazy expiry
    /// alone, which is all correctness depends on.
    pub fn new(config: StoreConfig) -> Self {
        let keyspace = Arc::new(Keyspace::new());
        let reaper = if config.sweep_enabled() {
            let interval = Duration::from_millis(config.sweep_interval_ms);
            match Reaper::spawn(Arc::clone(&keyspace), interval) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!("reaper thread unavailable, falling back to lazy expiry: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Store {
            keyspace,
            config,
            _reaper: reaper,
        }
    }

    /// Configuration this store was built with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// Run `f` while holding `key`'s slot lock
    #[inline]
    pub(crate) fn with_key<R>(&self, key: &str, f: impl FnOnce(&mut Slot) -> R) -> R {
        let mut locked = self.keyspace.lock([key]);
        f(locked.slot(key))
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new(StoreConfig::default())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("keys", &self.keyspace.len())
            .field("config", &self.config)
            .finish()
    }
}
