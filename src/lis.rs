//! Longest increasing subsequence in `O(N log N)`.
//!
//! All functions keep one "tail" per subsequence length: the index of the
//! smallest element that ends an increasing run of that length. Tails are
//! sorted, so each element finds its slot with a binary search.
//!
//! ```rust
//! use bintrie::lis::{lis, lis_length, LisMode};
//!
//! let seq = [3, 1, 2, 1, 8, 5, 6];
//! assert_eq!(lis_length(&seq, LisMode::Strict), 4);
//! assert_eq!(lis(&seq, LisMode::Strict), vec![1, 2, 5, 6]);
//! ```

/// Whether equal neighbours may both appear in the subsequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LisMode {
    /// Each element must be strictly greater than the previous one.
    #[default]
    Strict,
    /// Each element must not be less than the previous one.
    NonStrict,
}

/// Places `seq[i]` among the tails and returns the 0-based length slot it took.
#[inline]
fn place<T, F>(
    tails: &mut Vec<usize>,
    seq: &[T],
    i: usize,
    mode: LisMode,
    less: &mut F,
) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let x = &seq[i];
    let pos = match mode {
        LisMode::Strict => tails.partition_point(|&t| less(&seq[t], x)),
        LisMode::NonStrict => tails.partition_point(|&t| !less(x, &seq[t])),
    };
    if pos == tails.len() {
        tails.push(i);
    } else {
        tails[pos] = i;
    }
    pos
}

/// Length of a longest increasing subsequence.
pub fn lis_length<T: Ord>(seq: &[T], mode: LisMode) -> usize {
    lis_length_by(seq, mode, |a, b| a < b)
}

/// [`lis_length`] with a custom strict weak "less" ordering.
pub fn lis_length_by<T, F>(seq: &[T], mode: LisMode, mut less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut tails = Vec::new();
    for i in 0..seq.len() {
        place(&mut tails, seq, i, mode, &mut less);
    }
    tails.len()
}

/// For each index, the length of the longest increasing subsequence ending there.
pub fn lis_ending_lengths<T: Ord>(seq: &[T], mode: LisMode) -> Vec<usize> {
    lis_ending_lengths_by(seq, mode, |a, b| a < b)
}

/// [`lis_ending_lengths`] with a custom strict weak "less" ordering.
pub fn lis_ending_lengths_by<T, F>(seq: &[T], mode: LisMode, mut less: F) -> Vec<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut tails = Vec::new();
    (0..seq.len())
        .map(|i| place(&mut tails, seq, i, mode, &mut less) + 1)
        .collect()
}

/// For each index, the length of the longest increasing subsequence starting there.
pub fn lis_starting_lengths<T: Ord>(seq: &[T], mode: LisMode) -> Vec<usize> {
    lis_starting_lengths_by(seq, mode, |a, b| a < b)
}

/// [`lis_starting_lengths`] with a custom strict weak "less" ordering.
pub fn lis_starting_lengths_by<T, F>(seq: &[T], mode: LisMode, mut less: F) -> Vec<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    // A run starting at i is a decreasing run ending at i when read backwards.
    let mut greater = |a: &T, b: &T| less(b, a);
    let mut tails = Vec::new();
    let mut lengths = vec![0; seq.len()];
    for i in (0..seq.len()).rev() {
        lengths[i] = place(&mut tails, seq, i, mode, &mut greater) + 1;
    }
    lengths
}

/// Indices of one longest increasing subsequence, ascending.
pub fn lis_indices<T: Ord>(seq: &[T], mode: LisMode) -> Vec<usize> {
    lis_indices_by(seq, mode, |a, b| a < b)
}

/// [`lis_indices`] with a custom strict weak "less" ordering.
pub fn lis_indices_by<T, F>(seq: &[T], mode: LisMode, mut less: F) -> Vec<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut tails = Vec::new();
    let mut parent = vec![None; seq.len()];
    for i in 0..seq.len() {
        let pos = place(&mut tails, seq, i, mode, &mut less);
        if pos > 0 {
            parent[i] = Some(tails[pos - 1]);
        }
    }

    let mut indices = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        indices.push(i);
        cursor = parent[i];
    }
    indices.reverse();
    indices
}

/// One longest increasing subsequence.
pub fn lis<T: Ord + Clone>(seq: &[T], mode: LisMode) -> Vec<T> {
    lis_by(seq, mode, |a, b| a < b)
}

/// [`lis`] with a custom strict weak "less" ordering.
pub fn lis_by<T: Clone, F>(seq: &[T], mode: LisMode, less: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> bool,
{
    lis_indices_by(seq, mode, less)
        .into_iter()
        .map(|i| seq[i].clone())
        .collect()
}
