//! Reusable rendezvous barrier that elects one thread per cycle.
//!
//! The last thread to arrive in a cycle is elected. It bumps the cycle
//! counter and wakes everyone else; waiters leave once they see the counter
//! move past the cycle they arrived in, so spurious wakeups and immediate
//! reuse by fast threads are both harmless.
//!
//! A party that panics breaks the barrier on its way out. Every thread
//! blocked in, or later calling, `arrive` then panics too, so a failed worker
//! takes the whole pool down instead of leaving its peers waiting forever.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrival {
    Ordinary,
    Elected,
}

impl Arrival {
    #[inline(always)]
    pub fn is_elected(self) -> bool {
        self == Arrival::Elected
    }
}

#[derive(Debug, Default)]
struct State {
    arrived: usize,
    cycle: u64,
    broken: bool,
}

#[derive(Debug)]
pub struct RendezvousBarrier {
    parties: usize,
    state: Mutex<State>,
    released: Condvar,
}

impl RendezvousBarrier {
    pub fn new(parties: usize) -> Self {
        assert!(parties >= 1, "a barrier needs at least one party");
        Self {
            parties,
            state: Mutex::new(State::default()),
            released: Condvar::new(),
        }
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Completed cycles so far.
    pub fn cycles(&self) -> u64 {
        self.lock().cycle
    }

    /// Block until `parties` threads have arrived since the last release.
    ///
    /// Panics if the barrier is or becomes broken.
    pub fn arrive(&self) -> Arrival {
        let mut state = self.lock();
        if state.broken {
            drop(state);
            panic!("rendezvous barrier broken by a panicking party");
        }
        state.arrived += 1;
        assert!(
            state.arrived <= self.parties,
            "barrier over-arrival: {} of {} parties",
            state.arrived,
            self.parties
        );

        if state.arrived == self.parties {
            state.arrived = 0;
            state.cycle = state.cycle.wrapping_add(1);
            drop(state);
            self.released.notify_all();
            return Arrival::Elected;
        }

        let cycle = state.cycle;
        let released = self
            .released
            .wait_while(state, |s| s.cycle == cycle && !s.broken)
            .unwrap_or_else(PoisonError::into_inner);
        if released.cycle == cycle {
            drop(released);
            panic!("rendezvous barrier broken by a panicking party");
        }
        Arrival::Ordinary
    }

    /// Wake every waiter and make all further arrivals panic.
    pub fn break_barrier(&self) {
        self.lock().broken = true;
        self.released.notify_all();
    }

    /// Guard that breaks the barrier if dropped while its thread unwinds.
    pub fn break_on_panic(&self) -> BreakOnPanic<'_> {
        BreakOnPanic { barrier: self }
    }

    // Counters stay consistent across a panicking holder, so poisoning is
    // ignored.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct BreakOnPanic<'a> {
    barrier: &'a RendezvousBarrier,
}

impl Drop for BreakOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.barrier.break_barrier();
        }
    }
}
