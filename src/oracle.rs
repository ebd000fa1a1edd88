//! The Lower-Bound Oracle contract.
//!
//! The oracle is built before the search starts and is read-only for the
//! search's lifetime; queries come from every worker thread concurrently,
//! so implementations must be `Sync` without interior locking.

use crate::puzzle::Puzzle;

/// An admissible distance heuristic: `query` never exceeds the true
/// minimal number of moves from `pos` to the solved state.
///
/// Admissibility is not optional. The solver discards any branch whose
/// bound exceeds the remaining budget, so an overestimate silently
/// discards valid solutions.
pub trait LowerBound<P: Puzzle>: Sync {
    /// Lower bound on the remaining solving distance of `pos`.
    fn query(&self, puzzle: &P, pos: &P::Position) -> usize;
}

/// The trivial bound: zero everywhere. Admissible for any puzzle; prunes
/// nothing. Useful as a baseline and for puzzles too large to table.
pub struct ZeroBound;

impl<P: Puzzle> LowerBound<P> for ZeroBound {
    #[inline]
    fn query(&self, _puzzle: &P, _pos: &P::Position) -> usize {
        0
    }
}
