//! Common test utilities shared across integration tests: toy puzzles, a
//! BFS-built exact distance table (admissible by construction), and a
//! recording handler test double.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use permsearch::puzzle::permutation::PermPosition;
use permsearch::{LowerBound, PermutationPuzzle, Puzzle, SolveHandler};

/// Route `log` output to the test harness (`RUST_LOG=debug` to see it).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 3 slots; one self-inverse move M swapping slots 0 and 1.
pub fn swap_puzzle() -> PermutationPuzzle {
    PermutationPuzzle::new(3, &[("M", &[1, 0, 2])])
}

/// 4 slots; A swaps (0,1), B swaps (2,3). The classes commute, and the
/// puzzle is mirror-symmetric under exchanging the two slot pairs.
pub fn pair_puzzle() -> PermutationPuzzle {
    PermutationPuzzle::new(4, &[("A", &[1, 0, 2, 3]), ("B", &[0, 1, 3, 2])])
}

/// 5 slots; r cycles all five, s swaps (0,1). Generates all 120
/// permutations, so every position is solvable and the BFS table covers
/// the full space.
pub fn s5_puzzle() -> PermutationPuzzle {
    PermutationPuzzle::new(5, &[("r", &[1, 2, 3, 4, 0]), ("s", &[1, 0, 2, 3, 4])])
}

/// Exact distance-to-solved table, filled breadth-first from the solved
/// state. The move set of a `PermutationPuzzle` is closed under inverses,
/// so distance from solved equals distance to solved. Exact distances are
/// trivially admissible, and double as the brute-force ground truth.
pub struct BfsOracle {
    distances: HashMap<PermPosition, usize>,
}

impl BfsOracle {
    pub fn build(puzzle: &PermutationPuzzle) -> Self {
        let mut distances = HashMap::new();
        let solved = puzzle.solved_position();
        distances.insert(solved.clone(), 0);
        let mut layer = vec![solved.clone()];
        let mut out = solved;
        let mut depth = 0usize;
        while !layer.is_empty() {
            depth += 1;
            let mut next_layer = Vec::new();
            for pos in &layer {
                for mv in 0..puzzle.moves().len() {
                    puzzle.apply(mv, pos, &mut out);
                    if !distances.contains_key(&out) {
                        distances.insert(out.clone(), depth);
                        next_layer.push(out.clone());
                    }
                }
            }
            layer = next_layer;
        }
        Self { distances }
    }

    /// The true minimal solving distance, `None` for unreachable states.
    pub fn true_distance(&self, pos: &PermPosition) -> Option<usize> {
        self.distances.get(pos).copied()
    }

    /// Every reachable position at exactly `distance` moves from solved.
    pub fn positions_at(&self, distance: usize) -> Vec<PermPosition> {
        let mut positions: Vec<PermPosition> = self
            .distances
            .iter()
            .filter(|(_, &d)| d == distance)
            .map(|(p, _)| p.clone())
            .collect();
        positions.sort();
        positions
    }

    pub fn max_distance(&self) -> usize {
        self.distances.values().copied().max().unwrap_or(0)
    }
}

impl LowerBound<PermutationPuzzle> for BfsOracle {
    fn query(&self, _puzzle: &PermutationPuzzle, pos: &PermPosition) -> usize {
        // Unknown (unreachable) positions get 0, which is admissible.
        self.distances.get(pos).copied().unwrap_or(0)
    }
}

/// One recorded acceptance: history, depth, reporting worker.
pub type AcceptedRecord = (Vec<usize>, usize, usize);

/// Handler test double that records every invocation. When `verify_root`
/// is set, each candidate's history is replayed from that root and must
/// reproduce the reported (solved) position.
pub struct RecordingHandler {
    pub verify_root: Option<PermPosition>,
    pub accepted: Mutex<Vec<AcceptedRecord>>,
    pub progress_calls: Mutex<u64>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self {
            verify_root: None,
            accepted: Mutex::new(Vec::new()),
            progress_calls: Mutex::new(0),
        }
    }

    pub fn verifying(root: PermPosition) -> Self {
        Self {
            verify_root: Some(root),
            ..Self::new()
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.lock().unwrap().len()
    }

    pub fn accepted_records(&self) -> Vec<AcceptedRecord> {
        self.accepted.lock().unwrap().clone()
    }
}

impl SolveHandler<PermutationPuzzle> for RecordingHandler {
    fn accept_candidate(
        &self,
        puzzle: &PermutationPuzzle,
        position: &PermPosition,
        history: &[usize],
        depth: usize,
        worker_id: usize,
    ) -> bool {
        assert_eq!(history.len(), depth, "history length must equal depth");
        if let Some(root) = &self.verify_root {
            let mut current = root.clone();
            let mut next = root.clone();
            for &mv in history {
                puzzle.apply(mv, &current, &mut next);
                std::mem::swap(&mut current, &mut next);
            }
            assert!(
                puzzle.is_solved(&current),
                "accepted history does not solve the root"
            );
            assert_eq!(
                &current, position,
                "reported position disagrees with the replayed history"
            );
        }
        self.accepted
            .lock()
            .unwrap()
            .push((history.to_vec(), depth, worker_id));
        true
    }

    fn report_progress(&self, _nodes_visited: u64) -> bool {
        *self.progress_calls.lock().unwrap() += 1;
        true
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}
