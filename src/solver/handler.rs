//! Caller-side callbacks for candidate acceptance and progress.

use crate::puzzle::Puzzle;

/// Injectable callback interface, invoked from worker threads.
///
/// `accept_candidate` runs under the acceptance lock, so implementations
/// see at most one candidate at a time and may keep interior-mutable state
/// behind that guarantee; keep it quick, because every other worker's
/// acceptance waits on it.
pub trait SolveHandler<P: Puzzle>: Sync {
    /// Decide whether a candidate becomes an accepted solution. Returning
    /// `false` rejects it: the search continues as if the candidate had
    /// not been found.
    fn accept_candidate(
        &self,
        puzzle: &P,
        position: &P::Position,
        history: &[usize],
        depth: usize,
        worker_id: usize,
    ) -> bool {
        let _ = (puzzle, position, history, depth, worker_id);
        true
    }

    /// Periodic progress report with the global node count. Returning
    /// `false` requests a cooperative stop of the whole search.
    fn report_progress(&self, nodes_visited: u64) -> bool {
        let _ = nodes_visited;
        true
    }
}

/// Default handler: accepts every candidate, never requests a stop.
pub struct AcceptAll;

impl<P: Puzzle> SolveHandler<P> for AcceptAll {}
