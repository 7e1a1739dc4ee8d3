//! Set of non-negative integers stored as disjoint right-open intervals.
//!
//! Intervals that overlap or touch are merged on insertion, so the map always
//! holds the minimal decomposition. Every operation is `O(log M)` in the number
//! of stored intervals, plus the number of intervals it absorbs or removes.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt::Debug;
use std::ops::Range;

use crate::error::{Error, Result};

/// Integer types usable as interval endpoints.
pub trait IntervalKey: Copy + Ord + Debug {
    /// Zero.
    const ZERO: Self;
    /// Largest representable value. Never a valid point.
    const MAX: Self;

    /// `self + 1`, or `None` at [`Self::MAX`].
    fn successor(self) -> Option<Self>;

    /// Whether the value is below zero. Always `false` for unsigned types.
    fn is_negative(self) -> bool;

    /// Distance from `self` up to `hi`.
    fn span(self, hi: Self) -> u128;
}

macro_rules! impl_interval_key {
    (signed: $($s:ty),*; unsigned: $($u:ty),* $(;)?) => {
        $(
            impl IntervalKey for $s {
                const ZERO: Self = 0;
                const MAX: Self = <$s>::MAX;

                #[inline]
                fn successor(self) -> Option<Self> {
                    self.checked_add(1)
                }

                #[inline]
                fn is_negative(self) -> bool {
                    self < 0
                }

                #[inline]
                fn span(self, hi: Self) -> u128 {
                    self.abs_diff(hi) as u128
                }
            }
        )*
        $(
            impl IntervalKey for $u {
                const ZERO: Self = 0;
                const MAX: Self = <$u>::MAX;

                #[inline]
                fn successor(self) -> Option<Self> {
                    self.checked_add(1)
                }

                #[inline]
                fn is_negative(self) -> bool {
                    false
                }

                #[inline]
                fn span(self, hi: Self) -> u128 {
                    (hi - self) as u128
                }
            }
        )*
    };
}

impl_interval_key!(
    signed: i8, i16, i32, i64, i128, isize;
    unsigned: u8, u16, u32, u64, u128, usize;
);

/// Disjoint, non-adjacent `[lo, hi)` intervals keyed by their lower bound.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IntervalSet<K> {
    // lo -> hi
    ranges: BTreeMap<K, K>,
}

impl<K: IntervalKey> IntervalSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            ranges: BTreeMap::new(),
        }
    }

    fn check_bounds(lo: K, hi: K) -> Result<()> {
        if lo.is_negative() || hi.is_negative() {
            return Err(Error::InvalidArgument {
                reason: "interval bounds must not be negative",
            });
        }
        if lo > hi {
            return Err(Error::InvalidArgument {
                reason: "interval lower bound exceeds upper bound",
            });
        }
        Ok(())
    }

    fn point(value: K) -> Result<(K, K)> {
        let next = value.successor().ok_or(Error::InvalidArgument {
            reason: "point interval at the key maximum",
        })?;
        Self::check_bounds(value, next)?;
        Ok((value, next))
    }

    /// Adds `[lo, hi)`. An empty range is a no-op.
    pub fn add(&mut self, lo: K, hi: K) -> Result<()> {
        Self::check_bounds(lo, hi)?;
        if lo < hi {
            self.insert_range(lo, hi);
        }
        Ok(())
    }

    /// Adds the single value `value`.
    pub fn add_point(&mut self, value: K) -> Result<()> {
        let (lo, hi) = Self::point(value)?;
        self.insert_range(lo, hi);
        Ok(())
    }

    /// Replaces the whole contents with `[lo, hi)`.
    pub fn assign(&mut self, lo: K, hi: K) -> Result<()> {
        Self::check_bounds(lo, hi)?;
        self.ranges.clear();
        if lo < hi {
            self.ranges.insert(lo, hi);
        }
        Ok(())
    }

    /// Replaces the whole contents with the single value `value`.
    pub fn assign_point(&mut self, value: K) -> Result<()> {
        let (lo, hi) = Self::point(value)?;
        self.ranges.clear();
        self.ranges.insert(lo, hi);
        Ok(())
    }

    /// Removes `[lo, hi)`, splitting any interval that straddles a bound.
    pub fn erase(&mut self, lo: K, hi: K) -> Result<()> {
        Self::check_bounds(lo, hi)?;
        if lo < hi {
            self.remove_range(lo, hi);
        }
        Ok(())
    }

    /// Removes the single value `value`.
    pub fn erase_point(&mut self, value: K) -> Result<()> {
        let (lo, hi) = Self::point(value)?;
        self.remove_range(lo, hi);
        Ok(())
    }

    fn insert_range(&mut self, mut lo: K, mut hi: K) {
        if let Some((&start, &end)) = self.ranges.range(..=lo).next_back() {
            if end >= lo {
                lo = start;
                hi = hi.max(end);
            }
        }
        while let Some((&start, &end)) = self.ranges.range(lo..=hi).next() {
            self.ranges.remove(&start);
            hi = hi.max(end);
        }
        self.ranges.insert(lo, hi);
    }

    fn remove_range(&mut self, lo: K, hi: K) {
        if let Some((&start, &end)) = self.ranges.range(..lo).next_back() {
            if end > lo {
                self.ranges.insert(start, lo);
                if end > hi {
                    self.ranges.insert(hi, end);
                    return;
                }
            }
        }
        while let Some((&start, &end)) = self.ranges.range(lo..hi).next() {
            self.ranges.remove(&start);
            if end > hi {
                self.ranges.insert(hi, end);
                break;
            }
        }
    }

    /// The stored interval containing `value`, if any.
    fn covering(&self, value: K) -> Option<(K, K)> {
        self.ranges
            .range(..=value)
            .next_back()
            .filter(|(_, &end)| end > value)
            .map(|(&start, &end)| (start, end))
    }

    /// Whether `value` lies in a stored interval.
    pub fn contains(&self, value: K) -> bool {
        self.covering(value).is_some()
    }

    /// Whether every value of `[lo, hi)` is stored. Empty ranges are covered.
    pub fn covers(&self, lo: K, hi: K) -> bool {
        if lo >= hi {
            return true;
        }
        self.covering(lo).is_some_and(|(_, end)| end >= hi)
    }

    /// Smallest non-negative value not in the set.
    pub fn mex(&self) -> K {
        match self.ranges.first_key_value() {
            Some((&start, &end)) if start == K::ZERO => end,
            _ => K::ZERO,
        }
    }

    /// Smallest value `>= start` not in the set. Negative starts clamp to zero.
    pub fn mex_from(&self, start: K) -> K {
        let start = start.max(K::ZERO);
        // Neighbours never touch, so the end of a covering interval is free.
        self.covering(start).map_or(start, |(_, end)| end)
    }

    /// Whether no value is stored.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of stored values.
    pub fn size(&self) -> u128 {
        self.ranges
            .iter()
            .map(|(&start, &end)| start.span(end))
            .sum()
    }

    /// Number of disjoint intervals.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Stored intervals in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.ranges.iter(),
        }
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

impl<K: IntervalKey> Debug for IntervalSet<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K: IntervalKey> IntoIterator for &'a IntervalSet<K> {
    type Item = Range<K>;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the intervals of an [`IntervalSet`].
pub struct Iter<'a, K> {
    inner: btree_map::Iter<'a, K, K>,
}

impl<K: Copy> Iterator for Iter<'_, K> {
    type Item = Range<K>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&start, &end)| start..end)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Copy> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(&start, &end)| start..end)
    }
}

impl<K: Copy> ExactSizeIterator for Iter<'_, K> {}
