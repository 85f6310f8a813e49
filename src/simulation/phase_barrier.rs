//! A reusable barrier whose last arriving party may run a release action.
//!
//! The release action runs while every other party is blocked, and its effects
//! happen-before any party returns from the same `wait`. A barrier can be halted,
//! either by a release action or by a panicking party, after which every current
//! and future `wait` returns [`PhaseOutcome::Halted`] instead of blocking.
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Every party arrived and the run continues.
    Proceed,
    /// The barrier was halted; the caller should stop.
    Halted,
}

impl PhaseOutcome {
    pub fn is_halted(self) -> bool {
        self == PhaseOutcome::Halted
    }
}

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    halted: bool,
}

#[derive(Debug)]
pub struct PhaseBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl PhaseBarrier {
    /// Creates a barrier for `parties` participants; zero is treated as one.
    pub fn new(parties: usize) -> Self {
        Self {
            parties: parties.max(1),
            state: Mutex::new(BarrierState { arrived: 0, generation: 0, halted: false }),
            released: Condvar::new(),
        }
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    // A poisoned lock means a party panicked inside a release action; the halt flag
    // it leaves behind is still meaningful, so keep using the state.
    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits for every party without a release action.
    pub fn wait(&self) -> PhaseOutcome {
        self.wait_with(|| true)
    }

    /// Waits for every party; the last to arrive runs `release` before anyone is let go.
    ///
    /// If `release` returns `false` the barrier is halted and every party sees
    /// [`PhaseOutcome::Halted`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use rs_barnes_hut::simulation::{PhaseBarrier, PhaseOutcome};
    ///
    /// let barrier = PhaseBarrier::new(3);
    /// let releases = AtomicUsize::new(0);
    ///
    /// std::thread::scope(|s| {
    ///     for _ in 0..3 {
    ///         s.spawn(|| {
    ///             let outcome = barrier.wait_with(|| {
    ///                 releases.fetch_add(1, Ordering::SeqCst);
    ///                 true
    ///             });
    ///             assert_eq!(outcome, PhaseOutcome::Proceed);
    ///         });
    ///     }
    /// });
    ///
    /// // The release action ran exactly once for the whole phase.
    /// assert_eq!(releases.load(Ordering::SeqCst), 1);
    /// ```
    pub fn wait_with<F: FnOnce() -> bool>(&self, release: F) -> PhaseOutcome {
        let mut state = self.lock();
        if state.halted {
            return PhaseOutcome::Halted;
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            let proceed = release();
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            if !proceed {
                state.halted = true;
            }
            trace!("Barrier generation {} released (halted: {})", state.generation, state.halted);
            self.released.notify_all();
            return if state.halted { PhaseOutcome::Halted } else { PhaseOutcome::Proceed };
        }

        let generation = state.generation;
        while state.generation == generation && !state.halted {
            state = self.released.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        if state.halted {
            PhaseOutcome::Halted
        } else {
            PhaseOutcome::Proceed
        }
    }

    /// Halts the barrier and wakes every waiting party.
    pub fn halt(&self) {
        let mut state = self.lock();
        state.halted = true;
        self.released.notify_all();
    }

    pub fn is_halted(&self) -> bool {
        self.lock().halted
    }
}

/// Halts the barrier if dropped while the owning thread is panicking.
///
/// Workers hold one for their whole loop so a panic never leaves the other
/// workers blocked on a phase that cannot complete.
pub struct HaltOnPanic<'a>(pub &'a PhaseBarrier);

impl Drop for HaltOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.halt();
        }
    }
}
