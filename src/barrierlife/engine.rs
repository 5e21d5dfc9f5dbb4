//! Per-worker generation loop and the state workers share.
//!
//! Each generation is a compute phase, a rendezvous, a swap performed by the
//! elected worker alone, and a second rendezvous. Workers read the whole
//! current buffer and write only their own rows of the next one, so the
//! compute phase needs no locking. The role index and the countdown only
//! change between two rendezvous, so the barrier's mutex orders them and
//! relaxed atomics suffice.

use std::marker::PhantomData;
use std::slice;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

use tracing::{debug, trace};

use super::barrier::RendezvousBarrier;
use super::grid::{Cell, Grid, neighbor_count_in};
use super::partition::RowRange;

struct SendPtr<T> {
    inner: *mut T,
}
unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}
impl<T> Copy for SendPtr<T> {}
impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> SendPtr<T> {
    #[inline(always)]
    fn new(ptr: *mut T) -> Self {
        Self { inner: ptr }
    }
    #[inline(always)]
    fn get(&self) -> *mut T {
        self.inner
    }
}

/// B3/S23 on a precomputed neighbour count.
#[inline(always)]
pub fn next_state(cell: Cell, neighbors: u8) -> Cell {
    match neighbors {
        2 => cell,
        3 => Cell::Alive,
        _ => Cell::Dead,
    }
}

/// Compute `range` of the next generation from `current` into `next`.
///
/// `next` holds only the rows of `range`, so its row 0 is `range.start`.
#[inline]
pub(crate) fn step_rows(current: &[Cell], next: &mut [Cell], size: usize, range: RowRange) {
    debug_assert_eq!(next.len(), range.len() * size);
    for (local, row) in range.rows().enumerate() {
        let src = &current[row * size..(row + 1) * size];
        let dst = &mut next[local * size..(local + 1) * size];
        for (col, out) in dst.iter_mut().enumerate() {
            *out = next_state(src[col], neighbor_count_in(current, size, row, col));
        }
    }
}

/// Shared, non-owning view of the grid pair plus the generation countdown.
///
/// Borrows both grids mutably for `'a`, so the controller cannot touch them
/// while workers run.
pub(crate) struct SimulationContext<'a> {
    size: usize,
    buffers: [SendPtr<Cell>; 2],
    current: AtomicUsize,
    remaining: AtomicU64,
    barrier: RendezvousBarrier,
    _grids: PhantomData<&'a mut [Grid; 2]>,
}

impl<'a> SimulationContext<'a> {
    /// `grids[0]` starts as the current generation.
    pub(crate) fn new(grids: &'a mut [Grid; 2], steps: u64, workers: usize) -> Self {
        let size = grids[0].size();
        debug_assert_eq!(size, grids[1].size());
        let [a, b] = grids;
        Self {
            size,
            buffers: [
                SendPtr::new(a.cells_mut().as_mut_ptr()),
                SendPtr::new(b.cells_mut().as_mut_ptr()),
            ],
            current: AtomicUsize::new(0),
            remaining: AtomicU64::new(steps),
            barrier: RendezvousBarrier::new(workers),
            _grids: PhantomData,
        }
    }

    /// Index of the grid holding the latest generation.
    pub(crate) fn current_index(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }

    fn compute(&self, range: RowRange) {
        let size = self.size;
        let cur = self.current_index();
        // SAFETY: both buffers hold `size * size` cells and outlive `'a`.
        // During the compute phase nobody writes the current buffer, and
        // workers write pairwise-disjoint row ranges of the next one. Both
        // slices are dropped before this worker reaches the barrier.
        let current =
            unsafe { slice::from_raw_parts(self.buffers[cur].get() as *const Cell, size * size) };
        let next = unsafe {
            slice::from_raw_parts_mut(
                self.buffers[cur ^ 1].get().add(range.start * size),
                range.len() * size,
            )
        };
        step_rows(current, next, size, range);
    }

    /// Elected-only: promote the freshly computed buffer and count the
    /// generation.
    fn swap(&self) {
        self.current.fetch_xor(1, Ordering::Relaxed);
        let left = self.remaining.fetch_sub(1, Ordering::Relaxed) - 1;
        trace!(remaining = left, "generation complete");
    }

    pub(crate) fn run_worker(&self, worker: usize, range: RowRange) {
        debug!(worker, start = range.start, end = range.end, "worker running");
        let _break_on_panic = self.barrier.break_on_panic();
        let mut generations = 0u64;
        while self.remaining() > 0 {
            self.compute(range);
            if self.barrier.arrive().is_elected() {
                self.swap();
            }
            self.barrier.arrive();
            generations += 1;
        }
        debug!(worker, generations, "worker finished");
    }
}

/// One-shot latch workers wait on before their first generation.
///
/// Opened once every worker has spawned; cancelled when a spawn fails so the
/// workers that did start leave without computing anything.
#[derive(Debug, Default)]
pub(crate) struct StartGate {
    decision: Mutex<Option<bool>>,
    decided: Condvar,
}

impl StartGate {
    pub(crate) fn open(&self) {
        self.decide(true);
    }

    pub(crate) fn cancel(&self) {
        self.decide(false);
    }

    /// Returns whether the run goes ahead.
    pub(crate) fn wait(&self) -> bool {
        let decision = self.decision.lock().unwrap_or_else(PoisonError::into_inner);
        let decision = self
            .decided
            .wait_while(decision, |d| d.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        decision.unwrap_or(false)
    }

    fn decide(&self, go: bool) {
        let mut decision = self.decision.lock().unwrap_or_else(PoisonError::into_inner);
        decision.get_or_insert(go);
        drop(decision);
        self.decided.notify_all();
    }
}
