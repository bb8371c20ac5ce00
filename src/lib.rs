// Core modules for the ignix-lite embedded key-value engine
pub mod error; // StoreError + Result alias
pub mod config; // StoreConfig (sweep interval, env override)
pub mod value; // Value enum + typed projections
pub mod zset; // SortedSet (score, member) index
pub mod bitmap; // Bitmap (SETBIT/GETBIT)
pub mod hll; // HyperLogLog sketch
pub mod geo; // GeoSet + haversine distance
pub mod storage; // Keyspace, per-key slots and lock sets
mod glob; // glob patterns for HSCAN MATCH
mod reaper; // background expiry sweep thread
pub mod store; // Store facade + per-type command groups
pub mod txn; // execute(), Transaction builder, compare-and-delete
pub mod lock; // lease locks
pub mod command; // Cmd / Reply + text command parser

// Re-export the public surface for easier access
pub use bitmap::Bitmap;
pub use command::{parse_line, parse_tokens, Cmd, Reply};
pub use config::{StoreConfig, DEFAULT_SWEEP_INTERVAL_MS, SWEEP_INTERVAL_ENV};
pub use error::{Result, StoreError};
pub use geo::{GeoSet, GeoUnit};
pub use hll::HyperLogLog;
pub use storage::{Entry, TtlStatus};
pub use store::Store;
pub use txn::Transaction;
pub use value::Value;
pub use zset::SortedSet;
