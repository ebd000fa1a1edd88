//! Shared coordination state for one solve invocation.
//!
//! One [`SearchContext`] is created per `solve` call and borrowed by every
//! worker for its duration; there is no ambient process state, so
//! concurrent solves on separate solvers never interfere. The only mutable
//! shared pieces are here: the claimable work-unit queue, the acceptance
//! counter, the best-depth record, the stop flag, and the last-solution
//! record. Everything is atomic except the acceptance path, which runs
//! under one mutex.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// A claimable slice of the top-level branch space: one canonical first
/// move at the current depth bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit {
    /// Move index tried at ply 0 of this unit.
    pub first_move: usize,
}

/// Outcome of committing an accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Recorded; the search continues.
    Recorded,
    /// Recorded, and this acceptance met the stopping condition.
    Stopping,
}

/// Shared state for one solve invocation.
pub struct SearchContext {
    solutions_needed: u64,
    improvement_only: bool,
    solutions_found: AtomicU64,
    stop: AtomicBool,
    /// Depth of the best accepted solution (`usize::MAX` = none yet). In
    /// improvement-only mode this starts at the caller's previous best.
    best_depth: AtomicUsize,
    nodes_visited: AtomicU64,
    /// Serializes candidate acceptance: the handler callback, the counter
    /// update, and the last-solution overwrite happen under this lock.
    accept_lock: Mutex<()>,
    last_solution: Mutex<Option<String>>,
    units_tx: Sender<WorkUnit>,
    units_rx: Receiver<WorkUnit>,
}

impl SearchContext {
    pub fn new(solutions_needed: u64, improvement_only: bool, initial_best: usize) -> Self {
        let (units_tx, units_rx) = unbounded();
        Self {
            solutions_needed,
            improvement_only,
            solutions_found: AtomicU64::new(0),
            stop: AtomicBool::new(false),
            best_depth: AtomicUsize::new(initial_best),
            nodes_visited: AtomicU64::new(0),
            accept_lock: Mutex::new(()),
            last_solution: Mutex::new(None),
            units_tx,
            units_rx,
        }
    }

    /// Load this pass's work units into the claimable queue.
    pub fn load_units<I: IntoIterator<Item = WorkUnit>>(&self, units: I) {
        for unit in units {
            // The channel is unbounded and we hold both ends; send only
            // fails if the receiver is gone, which would be a bug here.
            self.units_tx
                .send(unit)
                .expect("work-unit queue receiver dropped");
        }
    }

    /// Claim the next work unit, or `None` when the queue is empty.
    pub fn claim_unit(&self) -> Option<WorkUnit> {
        self.units_rx.try_recv().ok()
    }

    /// Drop any unclaimed units (after a stop cut a pass short).
    pub fn drain_units(&self) {
        while self.units_rx.try_recv().is_ok() {}
    }

    /// Cooperative-stop probe: enough solutions, or a stop signal.
    #[inline]
    pub fn search_done(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
            || self.solutions_found.load(Ordering::Relaxed) >= self.solutions_needed
    }

    /// Ask every thread to wind down at its next probe.
    pub fn signal_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn solutions_found(&self) -> u64 {
        self.solutions_found.load(Ordering::SeqCst)
    }

    /// Depth of the best accepted solution, if any.
    pub fn best_depth(&self) -> Option<usize> {
        match self.best_depth.load(Ordering::SeqCst) {
            usize::MAX => None,
            depth => Some(depth),
        }
    }

    /// Flush a worker's node-count delta; returns the new global total.
    pub fn add_nodes(&self, delta: u64) -> u64 {
        self.nodes_visited.fetch_add(delta, Ordering::Relaxed) + delta
    }

    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited.load(Ordering::Relaxed)
    }

    /// Enter the acceptance critical section. The caller re-checks
    /// `search_done` and the improvement policy under the guard, invokes
    /// the handler, and commits with [`commit_acceptance`].
    ///
    /// [`commit_acceptance`]: SearchContext::commit_acceptance
    pub fn acceptance_guard(&self) -> MutexGuard<'_, ()> {
        self.accept_lock
            .lock()
            .expect("acceptance lock poisoned")
    }

    /// Whether the improvement-only policy rejects a candidate of `depth`.
    pub fn rejected_by_improvement_policy(&self, depth: usize) -> bool {
        self.improvement_only && depth >= self.best_depth.load(Ordering::SeqCst)
    }

    /// Record an accepted candidate: bump the counter, lower the best
    /// depth, overwrite the last-solution record, and evaluate the
    /// stopping policy. Call only while holding the acceptance guard.
    pub fn commit_acceptance(&self, depth: usize, solution: String) -> Acceptance {
        let found = self.solutions_found.fetch_add(1, Ordering::SeqCst) + 1;
        self.update_best_depth(depth);
        *self
            .last_solution
            .lock()
            .expect("last-solution lock poisoned") = Some(solution);

        // Improvement-only stops on any strict improvement; otherwise the
        // requirement count decides.
        if self.improvement_only || found >= self.solutions_needed {
            self.signal_stop();
            Acceptance::Stopping
        } else {
            Acceptance::Recorded
        }
    }

    /// The most recently accepted solution's move sequence.
    pub fn last_solution(&self) -> Option<String> {
        self.last_solution
            .lock()
            .expect("last-solution lock poisoned")
            .clone()
    }

    fn update_best_depth(&self, depth: usize) {
        let mut current = self.best_depth.load(Ordering::SeqCst);
        loop {
            if depth >= current {
                return;
            }
            match self.best_depth.compare_exchange_weak(
                current,
                depth,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }
}
