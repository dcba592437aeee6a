//! Domain partitioner: contiguous row bands over the active box.

use std::ops::Range;

/// The row range worker `index` of `workers` sweeps for an active box
/// covering `span` rows.
///
/// The span is split into `workers` contiguous, non-overlapping ranges of
/// `span.len() / workers` rows each (integer division); the last worker's
/// range is extended to absorb the remainder, so the union of all ranges
/// covers the span exactly once. An empty span yields an empty range for
/// every worker.
pub fn worker_rows(span: Range<i32>, workers: usize, index: usize) -> Range<i32> {
    debug_assert!(workers >= 1);
    debug_assert!(index < workers);
    let len = (span.end - span.start).max(0);
    let delta = len / workers as i32;
    let start = span.start + delta * index as i32;
    let end = if index + 1 == workers {
        // Last worker absorbs the remainder.
        span.end.max(start)
    } else {
        start + delta
    };
    start..end
}
