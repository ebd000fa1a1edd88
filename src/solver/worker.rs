//! The search worker: bounded depth-first traversal of claimed work units.
//!
//! Each worker owns its position buffers, frame stack, and move history,
//! sized once to the maximum depth and reused across passes, so the hot
//! loop never allocates. The traversal is iterative (explicit frames, no
//! recursion) and purely CPU-bound between work-unit claims; the only
//! synchronization it performs is a throttled shared-state probe every
//! `check_increment` node visits and the acceptance path when a candidate
//! is found.

use log::debug;

use crate::canon::CanonicalFilter;
use crate::oracle::LowerBound;
use crate::puzzle::Puzzle;
use crate::solver::context::{Acceptance, SearchContext};
use crate::solver::frame::{Frame, SearchCursor};
use crate::solver::handler::SolveHandler;
use crate::symmetry::SymmetryReducer;

/// Everything a worker needs for one depth pass, borrowed for its duration.
pub(crate) struct PassEnv<'a, P: Puzzle> {
    pub puzzle: &'a P,
    pub oracle: &'a dyn LowerBound<P>,
    pub filter: &'a CanonicalFilter,
    pub reducer: Option<&'a dyn SymmetryReducer<P>>,
    pub handler: &'a dyn SolveHandler<P>,
    pub ctx: &'a SearchContext,
    pub root: &'a P::Position,
    /// Sanctioned depth bound of this pass.
    pub depth: usize,
    /// Classes barred for this pass (phase restriction), OR-ed into every
    /// frame's exclusion mask. Zero when the full move set is in play.
    pub barred_classes: u64,
    pub suppress_early: bool,
    pub check_increment: u64,
}

/// How a work unit's traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitStatus {
    /// Every branch of the unit was explored or pruned.
    Exhausted,
    /// The traversal stopped early (stop signal, or this worker's own
    /// acceptance met the stopping condition); a resume cursor was taken.
    Interrupted,
}

pub(crate) struct SolveWorker<P: Puzzle> {
    id: usize,
    /// `positions[i]` = root with the first `i` history moves applied.
    positions: Vec<P::Position>,
    history: Vec<usize>,
    frames: Vec<Frame>,
    /// Ply currently being enumerated; `history.len() == sp` between
    /// descents.
    sp: usize,
    /// Node visits this pass (one oracle lookup per visit).
    lookups: u64,
    /// Visit count at which the next shared-state probe fires.
    check_target: u64,
    /// Visits already flushed to the shared node counter.
    flushed: u64,
    interrupt_cursor: Option<SearchCursor>,
}

impl<P: Puzzle> SolveWorker<P> {
    /// Allocate a worker's buffers once, sized to `max_depth`.
    pub(crate) fn new(id: usize, max_depth: usize, seed: &P::Position) -> Self {
        Self {
            id,
            positions: vec![seed.clone(); max_depth + 1],
            history: Vec::with_capacity(max_depth),
            frames: vec![Frame::new(0, 0, 0); max_depth + 1],
            sp: 0,
            lookups: 0,
            check_target: 0,
            flushed: 0,
            interrupt_cursor: None,
        }
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    /// Node visits performed in the current pass.
    pub(crate) fn lookups(&self) -> u64 {
        self.lookups
    }

    /// Cursor recorded when the last unit was interrupted.
    pub(crate) fn take_interrupt_cursor(&mut self) -> Option<SearchCursor> {
        self.interrupt_cursor.take()
    }

    /// Reset per-pass state and install the pass's root position.
    pub(crate) fn begin_pass(&mut self, env: &PassEnv<'_, P>) {
        self.positions[0] = env.root.clone();
        self.history.clear();
        self.sp = 0;
        self.lookups = 0;
        self.check_target = env.check_increment;
        self.flushed = 0;
        self.interrupt_cursor = None;
    }

    /// Claim and process work units until the queue is empty or a stop
    /// condition is observed.
    pub(crate) fn run_pass(&mut self, env: &PassEnv<'_, P>) {
        self.begin_pass(env);
        while !env.ctx.search_done() {
            let Some(unit) = env.ctx.claim_unit() else {
                break;
            };
            self.history.clear();
            self.sp = 0;
            self.frames[0] = Frame::new(
                unit.first_move,
                unit.first_move + 1,
                env.barred_classes,
            );
            if self.search_loop(env) == UnitStatus::Interrupted {
                break;
            }
        }
        self.flush_nodes(env);
    }

    /// Resume a traversal from a previously captured cursor: rebuild the
    /// position buffers by replaying the cursor's history against the
    /// root, re-install the recorded frames, and continue enumerating.
    /// Counters restart at zero.
    pub(crate) fn resume(&mut self, env: &PassEnv<'_, P>, cursor: &SearchCursor) -> UnitStatus {
        debug_assert_eq!(cursor.depth, env.depth, "cursor from a different pass");
        debug_assert_eq!(cursor.frames.len(), cursor.history.len() + 1);
        self.begin_pass(env);
        for (ply, &mv) in cursor.history.iter().enumerate() {
            let (head, tail) = self.positions.split_at_mut(ply + 1);
            env.puzzle.apply(mv, &head[ply], &mut tail[0]);
            self.history.push(mv);
        }
        self.frames[..cursor.frames.len()].copy_from_slice(&cursor.frames);
        self.sp = cursor.history.len();
        let status = self.search_loop(env);
        self.flush_nodes(env);
        status
    }

    /// Core DFS over the frames already seeded at plies `0..=sp`.
    fn search_loop(&mut self, env: &PassEnv<'_, P>) -> UnitStatus {
        let moves = env.puzzle.moves();

        'descend: loop {
            // Enumerate candidates at ply `sp`.
            loop {
                if self.frames[self.sp].exhausted() {
                    break;
                }
                let mv = self.frames[self.sp].move_index;
                self.frames[self.sp].move_index += 1;
                let class = moves[mv].class;
                if !CanonicalFilter::allows(self.frames[self.sp].forbidden, class) {
                    continue;
                }
                if let Some(reducer) = env.reducer {
                    if reducer.redundant(env.puzzle, &self.history, mv) {
                        continue;
                    }
                }

                let (head, tail) = self.positions.split_at_mut(self.sp + 1);
                env.puzzle.apply(mv, &head[self.sp], &mut tail[0]);
                self.lookups += 1;
                if self.lookups >= self.check_target && self.probe(env) {
                    // The in-flight move has not been expanded yet; roll it
                    // back so a resume re-tries it instead of dropping its
                    // subtree.
                    self.frames[self.sp].move_index = mv;
                    self.interrupt_cursor = Some(self.cursor(env));
                    return UnitStatus::Interrupted;
                }

                let child = &self.positions[self.sp + 1];
                let bound = env.oracle.query(env.puzzle, child);
                let togo = env.depth - self.sp - 1;
                if bound > togo {
                    // Admissible prune: no togo-length completion exists.
                    continue;
                }
                if togo == 0 {
                    if env.puzzle.is_solved(child) && self.candidate(env, mv) {
                        return UnitStatus::Interrupted;
                    }
                    continue;
                }
                if bound == 0
                    && !env.suppress_early
                    && env.puzzle.is_solved(child)
                    && self.candidate(env, mv)
                {
                    return UnitStatus::Interrupted;
                }

                self.history.push(mv);
                self.sp += 1;
                self.frames[self.sp] = Frame::new(
                    0,
                    moves.len(),
                    env.filter.forbidden_after(class) | env.barred_classes,
                );
                continue 'descend;
            }

            // Ply exhausted: backtrack.
            if self.sp == 0 {
                return UnitStatus::Exhausted;
            }
            self.sp -= 1;
            self.history.pop();
        }
    }

    /// Report the solved position at ply `sp + 1` (reached via
    /// `leaf_move`). Returns `true` when the traversal must stop.
    fn candidate(&mut self, env: &PassEnv<'_, P>, leaf_move: usize) -> bool {
        self.history.push(leaf_move);
        let stop = self.try_accept(env);
        self.history.pop();
        if stop {
            self.interrupt_cursor = Some(self.cursor(env));
        }
        stop
    }

    fn try_accept(&self, env: &PassEnv<'_, P>) -> bool {
        let depth_found = self.history.len();
        let position = &self.positions[depth_found];

        let _guard = env.ctx.acceptance_guard();
        if env.ctx.search_done() {
            return true;
        }
        if env.ctx.rejected_by_improvement_policy(depth_found) {
            return false;
        }
        if !env.handler.accept_candidate(
            env.puzzle,
            position,
            &self.history,
            depth_found,
            self.id,
        ) {
            return false;
        }
        debug_assert_eq!(
            env.oracle.query(env.puzzle, position),
            0,
            "oracle reported a positive bound for a solved position"
        );

        let solution = env.puzzle.format_history(&self.history);
        debug!(
            "worker {} accepted depth-{} solution: {}",
            self.id, depth_found, solution
        );
        matches!(
            env.ctx.commit_acceptance(depth_found, solution),
            Acceptance::Stopping
        )
    }

    /// Shared-state probe, amortized over `check_increment` node visits.
    /// Returns `true` when the traversal must stop.
    fn probe(&mut self, env: &PassEnv<'_, P>) -> bool {
        self.check_target += env.check_increment;
        let total = self.flush_nodes(env);
        if !env.handler.report_progress(total) {
            env.ctx.signal_stop();
            return true;
        }
        env.ctx.search_done()
    }

    /// Flush unreported node visits to the shared counter; returns the
    /// global total.
    fn flush_nodes(&mut self, env: &PassEnv<'_, P>) -> u64 {
        let delta = self.lookups - self.flushed;
        self.flushed = self.lookups;
        if delta == 0 {
            env.ctx.nodes_visited()
        } else {
            env.ctx.add_nodes(delta)
        }
    }

    /// The worker's exact traversal position, as resumable data.
    pub(crate) fn cursor(&self, env: &PassEnv<'_, P>) -> SearchCursor {
        SearchCursor {
            depth: env.depth,
            history: self.history.clone(),
            frames: self.frames[..=self.sp].to_vec(),
        }
    }
}
