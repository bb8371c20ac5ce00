/*!
 * Sorted Set
 *
 * Members are unique strings with an `f64` score, ordered by
 * `(score, member)`: ascending score, ties broken lexicographically.
 *
 * Two indexes are kept in lockstep: a `BTreeSet` ordered by
 * `(score, member)` for range scans, and a member → score map for O(1)
 * lookups during updates.
 */

use std::collections::BTreeSet;
use std::ops::Bound;

use hashbrown::HashMap;
use ordered_float::OrderedFloat;

use crate::error::{Result, StoreError};

type Score = OrderedFloat<f64>;

/// Score-ordered set of unique members
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSet {
    /// `(score, member)` ordering index
    by_score: BTreeSet<(Score, String)>,
    /// member → score
    scores: HashMap<String, Score, ahash::RandomState>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `member` or move it to `score`.
    ///
    /// Returns `true` when the member is new.
    pub fn insert(&mut self, member: &str, score: f64) -> Result<bool> {
        if score.is_nan() {
            return Err(StoreError::InvalidScore);
        }
        let score = OrderedFloat(score);
        match self.scores.get_mut(member) {
            Some(old) => {
                if *old != score {
                    self.by_score.remove(&(*old, member.to_owned()));
                    self.by_score.insert((score, member.to_owned()));
                    *old = score;
                }
                Ok(false)
            }
            None => {
                self.scores.insert(member.to_owned(), score);
                self.by_score.insert((score, member.to_owned()));
                Ok(true)
            }
        }
    }

    /// Add `delta` to the member's score (absent members start at 0).
    pub fn incr(&mut self, member: &str, delta: f64) -> Result<f64> {
        let current = self.score(member).unwrap_or(0.0);
        let next = current + delta;
        if next.is_nan() {
            return Err(StoreError::InvalidScore);
        }
        self.insert(member, next)?;
        Ok(next)
    }

    /// Remove a member. Returns `true` if it was present.
    pub fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove_entry(member) {
            Some((name, score)) => {
                self.by_score.remove(&(score, name));
                true
            }
            None => false,
        }
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).map(|s| s.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Members with `min <= score <= max`, in `(score, member)` order
    pub fn range_by_score(&self, min: f64, max: f64) -> impl Iterator<Item = (&str, f64)> + '_ {
        // (min, "") sorts before every member scored `min`
        let lower = (OrderedFloat(min), String::new());
        let max = OrderedFloat(max);
        let empty = min.is_nan() || max.0.is_nan() || OrderedFloat(min) > max;
        self.by_score
            .range((Bound::Included(lower), Bound::Unbounded))
            .take_while(move |(score, _)| !empty && *score <= max)
            .map(|(score, member)| (member.as_str(), score.0))
    }

    /// All members in `(score, member)` order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.by_score.iter().map(|(s, m)| (m.as_str(), s.0))
    }
}
