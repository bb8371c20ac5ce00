/*!
 * Sorted Sets
 *
 * Members ordered by score, then by name.
 */

use super::Store;
use crate::error::Result;
use crate::storage::Slot;
use crate::value::Value;
use crate::zset::SortedSet;

fn zset_or_create(slot: &mut Slot) -> Result<&mut SortedSet> {
    slot.value_or_insert_with(|| Value::SortedSet(SortedSet::new()))
        .as_zset_mut()
}

pub(crate) fn zadd(slot: &mut Slot, score: f64, member: &str) -> Result<bool> {
    let added = zset_or_create(slot).and_then(|z| z.insert(member, score));
    // a rejected score must not leave a freshly created empty set behind
    slot.drop_if_empty();
    added
}

pub(crate) fn zincrby(slot: &mut Slot, delta: f64, member: &str) -> Result<f64> {
    let score = zset_or_create(slot).and_then(|z| z.incr(member, delta));
    slot.drop_if_empty();
    score
}

pub(crate) fn zrem(slot: &mut Slot, member: &str) -> Result<bool> {
    let removed = match slot.value() {
        Some(v) => v.as_zset_mut()?.remove(member),
        None => false,
    };
    slot.drop_if_empty();
    Ok(removed)
}

pub(crate) fn zrange_by_score(
    slot: &mut Slot,
    min: f64,
    max: f64,
    offset: usize,
    count: Option<usize>,
) -> Result<Vec<String>> {
    let Some(v) = slot.value() else {
        return Ok(Vec::new());
    };
    let members = v
        .as_zset()?
        .range_by_score(min, max)
        .skip(offset)
        .take(count.unwrap_or(usize::MAX))
        .map(|(m, _)| m.to_owned())
        .collect();
    Ok(members)
}

pub(crate) fn zscore(slot: &mut Slot, member: &str) -> Result<Option<f64>> {
    match slot.value() {
        Some(v) => Ok(v.as_zset()?.score(member)),
        None => Ok(None),
    }
}

pub(crate) fn zcard(slot: &mut Slot) -> Result<usize> {
    match slot.value() {
        Some(v) => Ok(v.as_zset()?.len()),
        None => Ok(0),
    }
}

impl Store {
    /// Add `member` with `score`, or move an existing member to `score`
    ///
    /// # Returns
    /// * `true` if the member was newly added
    /// * `InvalidScore` for a NaN score
    pub fn zadd(&self, key: &str, score: f64, member: &str) -> Result<bool> {
        self.with_key(key, |s| zadd(s, score, member))
    }

    /// Members with `min <= score <= max`, ascending by `(score, member)`
    pub fn zrange_by_score(&self, key: &str, min: f64, max: f64) -> Result<Vec<String>> {
        self.with_key(key, |s| zrange_by_score(s, min, max, 0, None))
    }

    /// Like [`Store::zrange_by_score`], skipping `offset` matches and
    /// returning at most `count`
    pub fn zrange_by_score_limit(
        &self,
        key: &str,
        min: f64,
        max: f64,
        offset: usize,
        count: usize,
    ) -> Result<Vec<String>> {
        self.with_key(key, |s| zrange_by_score(s, min, max, offset, Some(count)))
    }

    /// Add `delta` to `member`'s score (absent members start at 0)
    pub fn zincrby(&self, key: &str, delta: f64, member: &str) -> Result<f64> {
        self.with_key(key, |s| zincrby(s, delta, member))
    }

    pub fn zrem(&self, key: &str, member: &str) -> Result<bool> {
        self.with_key(key, |s| zrem(s, member))
    }

    pub fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        self.with_key(key, |s| zscore(s, member))
    }

    pub fn zcard(&self, key: &str) -> Result<usize> {
        self.with_key(key, zcard)
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
    fn delayed_queue_paging() {
        let s = store();
        s.zadd("jobs", 30.0, "c").unwrap();
        s.zadd("jobs", 10.0, "a").unwrap();
        s.zadd("jobs", 20.0, "b").unwrap();
        s.zadd("jobs", 99.0, "later").unwrap();

        assert_eq!(s.zrange_by_score("jobs", 0.0, 30.0).unwrap(), ["a", "b", "c"]);
        assert_eq!(s.zrange_by_score_limit("jobs", 0.0, 30.0, 1, 1).unwrap(), ["b"]);
        assert_eq!(s.zrange_by_score_limit("jobs", 0.0, 30.0, 0, 0).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn incr_and_remove() {
        let s = store();
        assert_eq!(s.zincrby("z", 2.5, "m"), Ok(2.5));
        assert_eq!(s.zincrby("z", 1.0, "m"), Ok(3.5));
        assert_eq!(s.zadd("z", 1.0, "m"), Ok(false));
        assert_eq!(s.zscore("z", "m"), Ok(Some(1.0)));
        assert_eq!(s.zrem("z", "m"), Ok(true));
        assert!(!s.exists("z"));
        assert_eq!(s.zcard("z"), Ok(0));
    }

    #[test]
    fn nan_score_leaves_no_key() {
        let s = store();
        assert_eq!(s.zadd("z", f64::NAN, "m"), Err(StoreError::InvalidScore));
        assert!(!s.exists("z"));
        assert_eq!(s.zincrby("z", f64::NAN, "m"), Err(StoreError::InvalidScore));
        assert!(!s.exists("z"));
    }
}
