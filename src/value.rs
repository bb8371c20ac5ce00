/*!
 * Stored Value Types
 *
 * A key holds exactly one `Value`. The variant is fixed when the key is
 * created; typed commands against another variant fail with
 * `StoreError::TypeMismatch`.
 */

use std::collections::VecDeque;

use bytes::Bytes;

use crate::bitmap::Bitmap;
use crate::error::{Result, StoreError};
use crate::geo::GeoSet;
use crate::hll::HyperLogLog;
use crate::zset::SortedSet;

/// Set member storage (AHash-keyed)
pub type Members = hashbrown::HashSet<String, ahash::RandomState>;

/// Hash field storage (AHash-keyed)
pub type Fields = hashbrown::HashMap<String, Bytes, ahash::RandomState>;

/// Value types that can be stored in the keyspace
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Binary-safe string (also used for counters and lock tokens)
    Str(Bytes),
    /// Unordered set of unique members
    Set(Members),
    /// Field → value map
    Hash(Fields),
    /// Score-ordered set
    SortedSet(SortedSet),
    /// Double-ended list
    List(VecDeque<Bytes>),
    /// Bit string addressed by SETBIT/GETBIT
    Bitmap(Bitmap),
    /// Cardinality sketch
    Hll(HyperLogLog),
    /// Geospatial index
    Geo(GeoSet),
}

impl Value {
    /// Type name, as reported by `Store::key_type`
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Set(_) => "set",
            Value::Hash(_) => "hash",
            Value::SortedSet(_) => "zset",
            Value::List(_) => "list",
            Value::Bitmap(_) => "bitmap",
            Value::Hll(_) => "hll",
            Value::Geo(_) => "geo",
        }
    }

    /// True for collections that hold no members
    ///
    /// Emptied collections are removed from the keyspace.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Value::Set(s) => s.is_empty(),
            Value::Hash(h) => h.is_empty(),
            Value::SortedSet(z) => z.is_empty(),
            Value::List(l) => l.is_empty(),
            Value::Geo(g) => g.is_empty(),
            Value::Str(_) | Value::Bitmap(_) | Value::Hll(_) => false,
        }
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Str(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Bytes::from(s))
    }
}

// Typed projections used by the command groups. Each returns
// `TypeMismatch` when the variant does not match.
macro_rules! projection {
    ($name:ident, $name_mut:ident, $variant:ident, $ty:ty) => {
        impl Value {
            #[inline]
            pub fn $name(&self) -> Result<&$ty> {
                match self {
                    Value::$variant(v) => Ok(v),
                    _ => Err(StoreError::TypeMismatch),
                }
            }

            #[inline]
            pub fn $name_mut(&mut self) -> Result<&mut $ty> {
                match self {
                    Value::$variant(v) => Ok(v),
                    _ => Err(StoreError::TypeMismatch),
                }
            }
        }
    };
}

projection!(as_str, as_str_mut, Str, Bytes);
projection!(as_set, as_set_mut, Set, Members);
projection!(as_hash, as_hash_mut, Hash, Fields);
projection!(as_zset, as_zset_mut, SortedSet, SortedSet);
projection!(as_list, as_list_mut, List, VecDeque<Bytes>);
projection!(as_bitmap, as_bitmap_mut, Bitmap, Bitmap);
projection!(as_hll, as_hll_mut, Hll, HyperLogLog);
projection!(as_geo, as_geo_mut, Geo, GeoSet);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projections_enforce_type() {
        let mut v = Value::from("hello");
        assert!(v.as_str().is_ok());
        assert_eq!(v.as_set_mut().unwrap_err(), StoreError::TypeMismatch);
        assert_eq!(v.type_name(), "string");
        assert!(!v.is_empty_collection());
        assert!(Value::List(VecDeque::new()).is_empty_collection());
        assert!(Value::Hash(Fields::default()).is_empty_collection());
        assert_eq!(Value::Hash(Fields::default()).type_name(), "hash");
    }
}
