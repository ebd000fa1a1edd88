//! Crate error type.
//!
//! Absence of a solution is never an error: `solve` reports it through
//! [`SolveOutcome::Exhausted`](crate::solver::SolveOutcome::Exhausted).
//! Errors are reserved for precondition failures, where continuing would
//! silently break the pruning guarantees.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// The options record is contradictory (e.g. `min_depth > max_depth`).
    #[error("invalid solve configuration: {0}")]
    InvalidConfig(String),

    /// The lower-bound oracle reported a positive bound for a solved
    /// position. Admissibility is the foundation of every prune; an oracle
    /// caught violating it cannot be recovered from.
    #[error("lower-bound oracle is not admissible: reported {bound} for a solved position")]
    InadmissibleOracle { bound: usize },
}
