//! Explicit opt-in gate for optional or expensive computations

use std::time::{Duration, Instant};

/// Run `compute` only when `requested` is set.
///
/// Expensive analyses (the relevance matrix in particular) are never
/// evaluated eagerly; callers pass the user's opt-in decision explicitly.
pub fn compute_if_requested<T, F>(requested: bool, compute: F) -> Option<T>
where
    F: FnOnce() -> T,
{
    if requested {
        Some(compute())
    } else {
        None
    }
}

/// [`compute_if_requested`] that also reports how long `compute` took
pub fn compute_if_requested_timed<T, F>(requested: bool, compute: F) -> Option<(T, Duration)>
where
    F: FnOnce() -> T,
{
    compute_if_requested(requested, || {
        let start = Instant::now();
        let value = compute();
        (value, start.elapsed())
    })
}
