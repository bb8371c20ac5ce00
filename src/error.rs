/*!
 * Engine Error Types
 *
 * Every fallible store operation returns `StoreError`. Absence is not an
 * error for most commands: they answer with `None`, `false`, `0` or an
 * empty collection instead.
 */

use thiserror::Error;

/// Errors returned by store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The key holds a value of a different type than the command expects
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    TypeMismatch,

    /// Counter operation on a string that is not a base-10 i64
    #[error("ERR value is not an integer or out of range")]
    NotANumber,

    /// SETBIT with a bit argument other than 0 or 1
    #[error("ERR bit is not an integer or out of range")]
    InvalidBitValue,

    /// The command requires an existing key
    #[error("ERR no such key")]
    KeyAbsent,

    /// Counter result does not fit in an i64
    #[error("ERR increment or decrement would overflow")]
    Overflow,

    /// Sorted-set score is NaN, or an increment produced NaN
    #[error("ERR resulting score is not a number (NaN)")]
    InvalidScore,

    /// Bit offset beyond the 2^32 bit limit
    #[error("ERR bit offset is not an integer or out of range")]
    BitOffsetOutOfRange,

    /// Longitude/latitude pair outside the indexable range
    #[error("ERR invalid longitude,latitude pair")]
    InvalidCoordinates,
}

/// Result alias used across the engine
pub type Result<T> = std::result::Result<T, StoreError>;
