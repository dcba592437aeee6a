//! Reusable rendezvous barrier.
//!
//! A fixed-party synchronization point: every party blocks in
//! [`wait`](Rendezvous::wait) until all parties have arrived, then all are
//! released together and the barrier resets for the next phase. Unlike
//! [`std::sync::Barrier`], [`wait_with`](Rendezvous::wait_with) lets the
//! releasing party run an action at the release point, while every other
//! party is still parked — the engine uses this to fold per-worker
//! footprints into the global active box once per generation with no
//! additional synchronization.

use std::sync::{Condvar, Mutex, PoisonError};

/// A reusable fixed-party rendezvous point.
///
/// The phase counter distinguishes consecutive rendezvous, so a party
/// re-arriving for phase *k + 1* can never be confused with a straggler
/// from phase *k*, and spurious condvar wakeups are absorbed.
#[derive(Debug)]
pub struct Rendezvous {
    parties: usize,
    state: Mutex<PhaseState>,
    released: Condvar,
}

#[derive(Debug)]
struct PhaseState {
    arrived: usize,
    phase: u64,
}

impl Rendezvous {
    /// Create a barrier for `parties` participants. A party count below 1
    /// is clamped to 1; a single-party barrier never blocks.
    pub fn new(parties: usize) -> Self {
        Self {
            parties: parties.max(1),
            state: Mutex::new(PhaseState {
                arrived: 0,
                phase: 0,
            }),
            released: Condvar::new(),
        }
    }

    /// The number of participants per phase.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Block until all parties have arrived, then return together.
    ///
    /// Returns `true` for exactly one party per phase (the last arriver).
    pub fn wait(&self) -> bool {
        self.wait_with(|| ())
    }

    /// Block until all parties have arrived; the last arriver runs
    /// `release_action` before any party is released.
    ///
    /// The action runs while every other party is still parked, so it may
    /// freely read state that parked parties own. Returns `true` for the
    /// party that ran the action.
    pub fn wait_with<F: FnOnce()>(&self, release_action: F) -> bool {
        // A poisoned lock means a peer panicked; the phase bookkeeping
        // itself is still consistent, so carry on rather than deadlock.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.arrived += 1;
        if state.arrived == self.parties {
            release_action();
            state.arrived = 0;
            state.phase = state.phase.wrapping_add(1);
            self.released.notify_all();
            true
        } else {
            let phase = state.phase;
            while state.phase == phase {
                state = self
                    .released
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            false
        }
    }
}
