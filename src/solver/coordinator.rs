//! The search coordinator: iterative deepening and cross-thread
//! aggregation for one solve invocation.
//!
//! The coordinator owns the reusable worker pool. Each depth pass it loads
//! the claimable queue with one work unit per canonical first move (static
//! one-unit-per-thread partitioning would be wrong because subtree sizes
//! are wildly irregular), dispatches every worker under
//! `std::thread::scope`, joins, and inspects the shared acceptance state.
//! The depth bound rises by one per empty pass until a solution is
//! accepted or the configured maximum is exhausted.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::canon::CanonicalFilter;
use crate::error::SolveError;
use crate::oracle::LowerBound;
use crate::puzzle::Puzzle;
use crate::solver::config::SolveConfig;
use crate::solver::context::{SearchContext, WorkUnit};
use crate::solver::handler::{AcceptAll, SolveHandler};
use crate::solver::worker::{PassEnv, SolveWorker};
use crate::symmetry::SymmetryReducer;

/// Result of a solve invocation. Exhaustion is a normal outcome, not an
/// error: it means no solution exists within the explored depth range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A solution was accepted at this depth (the shortest accepted).
    Solved { depth: usize },
    /// Every depth up to `depth_searched` was explored without an
    /// accepted solution.
    Exhausted { depth_searched: usize },
}

/// Parallel iterative-deepening solver for one puzzle type.
///
/// A `Solver` is reusable: worker buffers are allocated once, sized to the
/// configured maximum depth, and re-initialized per pass. The most recent
/// accepted solution survives across `solve` calls and is readable via
/// [`last_solution`](Solver::last_solution).
pub struct Solver<P: Puzzle> {
    config: SolveConfig,
    /// One worker per thread slot, each independently heap-allocated so
    /// adjacent workers' hot state never shares a cache line.
    workers: Vec<Box<SolveWorker<P>>>,
    last_solution: Option<String>,
    /// Best accepted depth across this solver's lifetime; seeds the
    /// improvement-only policy of later solves.
    best_depth: Option<usize>,
}

impl<P: Puzzle> Solver<P> {
    pub fn new(config: SolveConfig) -> Result<Self, SolveError> {
        config.validate()?;
        Ok(Self {
            config,
            workers: Vec::new(),
            last_solution: None,
            best_depth: None,
        })
    }

    pub fn config(&self) -> &SolveConfig {
        &self.config
    }

    /// The most recently accepted solution's move sequence. `None` until
    /// the first acceptance; overwritten by each subsequent acceptance.
    pub fn last_solution(&self) -> Option<&str> {
        self.last_solution.as_deref()
    }

    /// Depth of the best solution accepted by this solver so far.
    pub fn best_depth(&self) -> Option<usize> {
        self.best_depth
    }

    /// Solve with the default accept-everything handler.
    pub fn solve<O: LowerBound<P>>(
        &mut self,
        puzzle: &P,
        oracle: &O,
        root: P::Position,
        reducer: Option<&dyn SymmetryReducer<P>>,
    ) -> Result<SolveOutcome, SolveError> {
        self.solve_with(puzzle, oracle, root, reducer, &AcceptAll)
    }

    /// Solve, routing every candidate and progress report through
    /// `handler`.
    pub fn solve_with<O: LowerBound<P>>(
        &mut self,
        puzzle: &P,
        oracle: &O,
        root: P::Position,
        reducer: Option<&dyn SymmetryReducer<P>>,
        handler: &dyn SolveHandler<P>,
    ) -> Result<SolveOutcome, SolveError> {
        self.config.validate()?;

        let root = match reducer {
            Some(reducer) => reducer.canonicalize(puzzle, &root),
            None => root,
        };
        let root_bound = oracle.query(puzzle, &root);

        let initial_best = match (self.config.improvement_only, self.best_depth) {
            (true, Some(depth)) => depth,
            _ => usize::MAX,
        };
        let ctx = SearchContext::new(
            self.config.solutions_needed,
            self.config.improvement_only,
            initial_best,
        );

        // Depth 0: the root itself may already be a solution.
        if puzzle.is_solved(&root) {
            if root_bound > 0 {
                return Err(SolveError::InadmissibleOracle { bound: root_bound });
            }
            if self.config.min_depth == 0 {
                let _guard = ctx.acceptance_guard();
                if !ctx.rejected_by_improvement_policy(0)
                    && handler.accept_candidate(puzzle, &root, &[], 0, 0)
                {
                    ctx.commit_acceptance(0, String::new());
                }
            }
            if ctx.search_done() {
                return Ok(self.finish(&ctx, 0));
            }
        }

        self.ensure_workers(puzzle);
        let filter = CanonicalFilter::new(puzzle);
        let mut rng = self.config.randomize.then(|| match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        });

        // Canonical first moves: everything the symmetry reducer does not
        // rule dominated at the root.
        let first_moves: Vec<usize> = (0..puzzle.moves().len())
            .filter(|&mv| match reducer {
                Some(reducer) => !reducer.redundant(puzzle, &[], mv),
                None => true,
            })
            .collect();

        let start_depth = root_bound.max(self.config.min_depth).max(1);
        for depth in start_depth..=self.config.max_depth {
            for barred in pass_restrictions(&self.config, puzzle.class_count()) {
                let mut units: Vec<WorkUnit> = first_moves
                    .iter()
                    .filter(|&&mv| barred & (1 << puzzle.moves()[mv].class) == 0)
                    .map(|&mv| WorkUnit { first_move: mv })
                    .collect();
                if let Some(rng) = rng.as_mut() {
                    units.shuffle(rng);
                }
                info!(
                    "depth {depth}: dispatching {} work units across {} threads{}",
                    units.len(),
                    self.workers.len(),
                    if barred != 0 { " (phase 1)" } else { "" },
                );
                ctx.load_units(units);

                let env = PassEnv {
                    puzzle,
                    oracle,
                    filter: &filter,
                    reducer,
                    handler,
                    ctx: &ctx,
                    root: &root,
                    depth,
                    barred_classes: barred,
                    suppress_early: self.config.suppress_early_solutions,
                    check_increment: self.config.check_increment,
                };
                std::thread::scope(|scope| {
                    for worker in self.workers.iter_mut() {
                        let env = &env;
                        scope.spawn(move || worker.run_pass(env));
                    }
                });
                ctx.drain_units();
                debug!(
                    "depth {depth}: {} nodes visited, {} solutions so far",
                    ctx.nodes_visited(),
                    ctx.solutions_found()
                );

                if ctx.search_done() {
                    return Ok(self.finish(&ctx, depth));
                }
            }
        }

        Ok(self.finish(&ctx, self.config.max_depth))
    }

    /// Allocate (or re-allocate after a thread-count change) the worker
    /// pool, buffers sized once to the configured maximum depth.
    fn ensure_workers(&mut self, puzzle: &P) {
        if self.workers.len() != self.config.num_threads {
            let seed = puzzle.solved_position();
            self.workers = (0..self.config.num_threads)
                .map(|id| Box::new(SolveWorker::new(id, self.config.max_depth, &seed)))
                .collect();
        }
    }

    /// Fold the finished context into the solver's records and produce
    /// the outcome. Acceptances below the requirement count still count
    /// as solved; a handler-requested stop with nothing accepted reports
    /// exhaustion at the depth reached.
    fn finish(&mut self, ctx: &SearchContext, depth_searched: usize) -> SolveOutcome {
        self.remember(ctx);
        match ctx.best_depth() {
            Some(depth) if ctx.solutions_found() > 0 => SolveOutcome::Solved { depth },
            _ => SolveOutcome::Exhausted { depth_searched },
        }
    }

    fn remember(&mut self, ctx: &SearchContext) {
        if let Some(solution) = ctx.last_solution() {
            self.last_solution = Some(solution);
        }
        if let Some(depth) = ctx.best_depth() {
            if ctx.solutions_found() > 0 {
                self.best_depth = Some(match self.best_depth {
                    Some(previous) => previous.min(depth),
                    None => depth,
                });
            }
        }
    }
}

/// Class masks barred per pass at one depth: the phase-1 restriction
/// first when staged search is configured, then the unrestricted pass.
fn pass_restrictions(config: &SolveConfig, class_count: usize) -> Vec<u64> {
    let full = if class_count >= 64 {
        u64::MAX
    } else {
        (1u64 << class_count) - 1
    };
    match config.phase1_classes {
        Some(allowed) if allowed & full != full => vec![full & !allowed, 0],
        _ => vec![0],
    }
}
