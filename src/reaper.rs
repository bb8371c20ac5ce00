/*!
 * Background Expiry Reaper
 *
 * A dedicated thread that periodically sweeps the keyspace, dropping
 * expired entries and reclaiming their slots. Lazy expiry on access keeps
 * reads correct on its own; the reaper only bounds how long dead keys
 * occupy memory.
 *
 * The thread waits on a channel with a timeout equal to the sweep
 * interval. Dropping the handle closes the channel, which wakes the
 * thread immediately, and then joins it.
 */

use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use log::{debug, trace, warn};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::storage::Keyspace;

/// Handle owning the reaper thread
pub(crate) struct Reaper {
    /// Dropped to signal shutdown
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Reaper {
    /// Spawn the sweep thread for `keyspace`
    ///
    /// # Arguments
    /// * `keyspace` - Shared keyspace to sweep
    /// * `interval` - Time between sweeps
    pub(crate) fn spawn(keyspace: Arc<Keyspace>, interval: Duration) -> std::io::Result<Self> {
        let (tx, rx) = bounded::<()>(1);

        let handle = std::thread::Builder::new()
            .name("ignix-reaper".into())
            .spawn(move || {
                debug!("reaper started, interval {:?}", interval);
                loop {
                    match rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let reaped = keyspace.sweep();
                            if reaped > 0 {
                                trace!("reaper removed {} expired keys", reaped);
                            }
                        }
                        // explicit stop or every sender dropped
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("reaper stopped");
            })?;

        Ok(Reaper {
            stop: Some(tx),
            handle: Some(handle),
        })
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("reaper thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::time::Instant;

    #[test]
    fn sweeps_without_access() {
        let ks = Arc::new(Keyspace::new());
        ks.lock(["short"])
            .slot("short")
            .put(Value::from("v"), Some(Instant::now() + Duration::from_millis(10)));
        let reaper = Reaper::spawn(Arc::clone(&ks), Duration::from_millis(5)).unwrap();

        let start = Instant::now();
        while !ks.is_empty() && start.elapsed() < Duration::from_secs(2) {
            std::thread::sleep(Duration::from_millis(5));
        }
        drop(reaper);
        assert!(ks.is_empty());
    }

    #[test]
    fn drop_stops_thread_promptly() {
        let ks = Arc::new(Keyspace::new());
        let reaper = Reaper::spawn(ks, Duration::from_secs(3600)).unwrap();
        let start = Instant::now();
        drop(reaper);
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
