//! Compute-then-publish for write-once symbol parts.

use std::sync::OnceLock;

/// Return the published value of `cell`, computing and publishing it first if
/// needed.
///
/// Unlike `OnceLock::get_or_init`, the computation runs outside the cell, so
/// computations that re-enter other cells (or race with another thread on the
/// same one) cannot deadlock. Racing computations are pure functions of
/// immutable inputs: the first `set` wins and the loser's value is dropped.
pub(crate) fn publish<T>(cell: &OnceLock<T>, compute: impl FnOnce() -> T) -> &T {
    if let Some(value) = cell.get() {
        return value;
    }
    let value = compute();
    cell.get_or_init(|| value)
}
