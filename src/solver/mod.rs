//! The search engine: iterative-deepening DFS distributed over a fixed
//! pool of worker threads.
//!
//! Layering, leaves first: `frame` holds the per-ply search state and
//! the checkpoint cursor; `context` the shared coordination state for
//! one invocation; `worker` the per-thread bounded DFS; [`coordinator`]
//! the iterative-deepening driver and thread dispatch. [`config`] and
//! [`handler`] are the caller-facing surface. The first three are
//! internal machinery: nothing a caller can reach produces or consumes
//! their types.

pub mod config;
pub(crate) mod context;
pub mod coordinator;
pub(crate) mod frame;
pub mod handler;
mod worker;

pub use config::SolveConfig;
pub use coordinator::{SolveOutcome, Solver};
pub use handler::{AcceptAll, SolveHandler};
