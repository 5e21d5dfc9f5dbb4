//! Row partitioning across workers.
//!
//! Ranges are half-open and handed out in worker order from the top row
//! down. Every worker gets `size / workers` rows; the last
//! `size % workers` workers get one extra.

use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `grid_size` rows across `worker_count` workers.
///
/// Callers guarantee `1 <= worker_count <= grid_size`.
pub fn compute_ranges(worker_count: usize, grid_size: usize) -> Vec<RowRange> {
    debug_assert!(worker_count >= 1 && worker_count <= grid_size);

    let base = grid_size / worker_count;
    let remainder = grid_size % worker_count;
    let first_long = worker_count - remainder;

    let mut ranges = Vec::with_capacity(worker_count);
    let mut start = 0;
    for worker in 0..worker_count {
        let len = if worker >= first_long { base + 1 } else { base };
        ranges.push(RowRange::new(start, start + len));
        start += len;
    }
    ranges
}

/// Panics unless `ranges` tile `[0, grid_size)` in order, with no empty
/// range and lengths differing by at most one row.
pub fn check_coverage(ranges: &[RowRange], grid_size: usize) {
    assert!(!ranges.is_empty(), "no ranges to cover {grid_size} rows");
    let mut expected_start = 0;
    let mut shortest = usize::MAX;
    let mut longest = 0;
    for (worker, range) in ranges.iter().enumerate() {
        assert_eq!(
            range.start, expected_start,
            "worker {worker} range {range:?} leaves a gap or overlaps"
        );
        assert!(!range.is_empty(), "worker {worker} has an empty range");
        shortest = shortest.min(range.len());
        longest = longest.max(range.len());
        expected_start = range.end;
    }
    assert_eq!(
        expected_start, grid_size,
        "ranges cover {expected_start} of {grid_size} rows"
    );
    assert!(
        longest - shortest <= 1,
        "uneven ranges: shortest {shortest}, longest {longest}"
    );
}
