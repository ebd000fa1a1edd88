//! Parallel iterative-deepening search for twisty permutation puzzles.
//!
//! Given a puzzle position, the solver finds a move sequence reaching the
//! solved state by repeating bounded depth-first searches with rising
//! depth limits (IDDFS), pruning with an admissible lower-bound heuristic
//! and a canonical move ordering that skips commutation-redundant
//! sequences, and distributing the top-level branch space across a fixed
//! pool of worker threads.
//!
//! The crate is built around four collaborator seams: the Move Model
//! ([`puzzle::Puzzle`]), the Lower-Bound Oracle ([`oracle::LowerBound`]),
//! the Symmetry Reducer ([`symmetry::SymmetryReducer`]), and the
//! caller-side callbacks ([`solver::SolveHandler`]). The engine itself
//! (frames, workers, coordinator) lives in [`solver`].
//!
//! ```
//! use permsearch::{PermutationPuzzle, SolveConfig, SolveOutcome, Solver, ZeroBound};
//!
//! // 3 slots; one move M swaps the first two.
//! let puzzle = PermutationPuzzle::new(3, &[("M", &[1, 0, 2])]);
//! let config = SolveConfig::default().with_threads(2).with_max_depth(4);
//! let mut solver = Solver::new(config)?;
//!
//! let outcome = solver.solve(&puzzle, &ZeroBound, vec![1, 0, 2], None)?;
//! assert_eq!(outcome, SolveOutcome::Solved { depth: 1 });
//! assert_eq!(solver.last_solution(), Some("M"));
//! # Ok::<(), permsearch::SolveError>(())
//! ```

pub mod canon;
pub mod error;
pub mod oracle;
pub mod puzzle;
pub mod solver;
pub mod symmetry;

pub use canon::CanonicalFilter;
pub use error::SolveError;
pub use oracle::{LowerBound, ZeroBound};
pub use puzzle::{MoveInfo, PermutationPuzzle, Puzzle};
pub use solver::{AcceptAll, SolveConfig, SolveHandler, SolveOutcome, Solver};
pub use symmetry::SymmetryReducer;
