//! Configuration for a solve invocation.

use crate::error::SolveError;

/// Default interval, in visited nodes, between shared-state probes.
pub const DEFAULT_CHECK_INCREMENT: u64 = 10_000;

/// Options record consumed by [`Solver`](crate::solver::Solver).
///
/// Built in the builder style; every field has a working default. The
/// record is plain data: nothing here is consulted after `solve` returns.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    /// Number of worker threads.
    pub num_threads: usize,
    /// Stop once this many candidates have been accepted.
    pub solutions_needed: u64,
    /// Never start a pass below this depth, even if the oracle's bound on
    /// the root is smaller. Needed for optimality guarantees when the
    /// caller knows shallower solutions have been ruled out elsewhere.
    pub min_depth: usize,
    /// Give up (report exhaustion) once a pass at this depth finds
    /// nothing. Also sizes the per-worker buffers, once.
    pub max_depth: usize,
    /// Discard solutions discovered below the sanctioned depth of the
    /// current pass instead of accepting them opportunistically.
    pub suppress_early_solutions: bool,
    /// Accept only solutions strictly shorter than the best accepted so
    /// far, and stop the whole search at the first such acceptance
    /// (branch-and-bound mode).
    pub improvement_only: bool,
    /// Move-class bitmask for a staged search: each depth runs a pass
    /// restricted to these classes before the full-move-set pass.
    pub phase1_classes: Option<u64>,
    /// Randomize work-unit order each pass. Exploration order changes;
    /// correctness and the returned depth do not.
    pub randomize: bool,
    /// Seed for randomized ordering (`None` = seed from the OS).
    pub seed: Option<u64>,
    /// Visited nodes between shared-state probes. Smaller values tighten
    /// termination latency; larger values cut synchronization overhead.
    pub check_increment: u64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            solutions_needed: 1,
            min_depth: 0,
            max_depth: 64,
            suppress_early_solutions: false,
            improvement_only: false,
            phase1_classes: None,
            randomize: false,
            seed: None,
            check_increment: DEFAULT_CHECK_INCREMENT,
        }
    }
}

impl SolveConfig {
    /// Set the number of worker threads (clamped to at least 1).
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads.max(1);
        self
    }

    /// Set how many accepted solutions stop the search.
    pub fn with_solutions_needed(mut self, needed: u64) -> Self {
        self.solutions_needed = needed.max(1);
        self
    }

    /// Set the minimum depth bound.
    pub fn with_min_depth(mut self, min_depth: usize) -> Self {
        self.min_depth = min_depth;
        self
    }

    /// Set the maximum depth bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Suppress opportunistic solutions found below the sanctioned depth.
    pub fn with_suppress_early_solutions(mut self, suppress: bool) -> Self {
        self.suppress_early_solutions = suppress;
        self
    }

    /// Enable branch-and-bound (improvement-only) acceptance.
    pub fn with_improvement_only(mut self, enabled: bool) -> Self {
        self.improvement_only = enabled;
        self
    }

    /// Enable a staged search restricted to `classes` before each full pass.
    pub fn with_phase1_classes(mut self, classes: u64) -> Self {
        self.phase1_classes = Some(classes);
        self
    }

    /// Randomize work-unit ordering.
    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// Set the seed for randomized ordering.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the node interval between shared-state probes.
    pub fn with_check_increment(mut self, increment: u64) -> Self {
        self.check_increment = increment.max(1);
        self
    }

    /// Reject contradictory option combinations.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.num_threads == 0 {
            return Err(SolveError::InvalidConfig(
                "num_threads must be at least 1".into(),
            ));
        }
        if self.solutions_needed == 0 {
            return Err(SolveError::InvalidConfig(
                "solutions_needed must be at least 1".into(),
            ));
        }
        if self.min_depth > self.max_depth {
            return Err(SolveError::InvalidConfig(format!(
                "min_depth ({}) exceeds max_depth ({})",
                self.min_depth, self.max_depth
            )));
        }
        if self.check_increment == 0 {
            return Err(SolveError::InvalidConfig(
                "check_increment must be at least 1".into(),
            ));
        }
        if self.phase1_classes == Some(0) {
            return Err(SolveError::InvalidConfig(
                "phase1_classes must name at least one move class".into(),
            ));
        }
        Ok(())
    }
}
