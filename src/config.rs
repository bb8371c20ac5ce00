/*!
 * Store Configuration
 *
 * The engine has a single tunable: how often the background reaper sweeps
 * expired keys. Lazy expiry on access is always on, so the sweep only
 * affects how quickly memory is reclaimed, never what callers observe.
 */

use log::warn;

/// Default reaper cadence in milliseconds (ten sweeps per second)
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 100;

/// Environment variable read by [`StoreConfig::from_env`]
pub const SWEEP_INTERVAL_ENV: &str = "IGNIX_SWEEP_INTERVAL_MS";

/// Construction options for [`crate::Store`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Period of the background expiry sweep; `0` disables the sweep thread
    pub sweep_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

impl StoreConfig {
    /// Configuration with the periodic sweep turned off (lazy expiry only)
    pub fn lazy_only() -> Self {
        Self {
            sweep_interval_ms: 0,
        }
    }

    /// Override the sweep interval
    pub fn with_sweep_interval_ms(mut self, ms: u64) -> Self {
        self.sweep_interval_ms = ms;
        self
    }

    /// Defaults, overridden by `IGNIX_SWEEP_INTERVAL_MS` when it is set
    ///
    /// An unparsable value is reported and ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(raw) = std::env::var(SWEEP_INTERVAL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => cfg.sweep_interval_ms = ms,
                Err(_) => warn!(
                    "ignoring {}={:?}: expected milliseconds as an unsigned integer",
                    SWEEP_INTERVAL_ENV, raw
                ),
            }
        }
        cfg
    }

    /// Whether a background sweep thread should run
    #[inline]
    pub fn sweep_enabled(&self) -> bool {
        self.sweep_interval_ms > 0
    }
}
