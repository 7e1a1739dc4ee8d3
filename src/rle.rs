//! Run-length encoding of arbitrary sequences.

/// A value repeated `count` times in a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Run<T> {
    /// The repeated element.
    pub value: T,
    /// Length of the run. Never zero in encoder output.
    pub count: usize,
}

/// Collapses consecutive equal elements into runs.
pub fn run_length_encode<I>(iter: I) -> Vec<Run<I::Item>>
where
    I: IntoIterator,
    I::Item: PartialEq,
{
    let iter = iter.into_iter();
    let mut runs: Vec<Run<I::Item>> = Vec::with_capacity(iter.size_hint().0.min(1024));
    for value in iter {
        match runs.last_mut() {
            Some(run) if run.value == value => run.count += 1,
            _ => runs.push(Run { value, count: 1 }),
        }
    }
    runs
}

/// Expands runs back into the original sequence.
pub fn run_length_decode<T: Clone>(runs: &[Run<T>]) -> Vec<T> {
    let total = runs.iter().map(|run| run.count).sum();
    let mut out = Vec::with_capacity(total);
    for run in runs {
        out.extend(std::iter::repeat(run.value.clone()).take(run.count));
    }
    out
}
