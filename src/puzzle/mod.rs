//! The Move Model: what the search engine needs to know about a puzzle.
//!
//! The solver never looks inside a position. It enumerates legal moves,
//! applies them into caller-owned buffers, and asks whether a position is
//! solved. Anything satisfying [`Puzzle`] can be searched; the crate ships
//! [`PermutationPuzzle`] as a concrete model for twisty permutation puzzles.

pub mod permutation;

pub use permutation::PermutationPuzzle;

use std::hash::Hash;

/// A single legal move, identified by its index into [`Puzzle::moves`].
///
/// `class` groups moves that turn the same axis/generator (e.g. a face turn
/// and its inverse). Canonical move ordering operates on classes, never on
/// individual moves: two consecutive moves of the same class are always
/// redundant, and commuting classes are only explored in ascending order.
#[derive(Debug, Clone)]
pub struct MoveInfo {
    /// Human-readable move name, used for the last-solution record.
    pub name: String,
    /// Move-class (axis/generator) index. Classes are numbered densely
    /// from 0; at most 64 classes are supported (mask width).
    pub class: usize,
}

/// Contract between the search engine and a concrete puzzle.
///
/// Implementations must be cheap to query: `apply` and `is_solved` run once
/// per visited node, millions of times per second, and must not allocate.
pub trait Puzzle: Sync {
    /// Opaque fixed-size puzzle state.
    type Position: Clone + Eq + Hash + Send + Sync;

    /// All legal moves, in a stable order. Move indices used throughout the
    /// solver (history entries, work units, cursors) index into this slice.
    fn moves(&self) -> &[MoveInfo];

    /// Number of distinct move classes (one more than the largest
    /// `MoveInfo::class`).
    fn class_count(&self) -> usize;

    /// Whether every move of class `a` commutes with every move of class
    /// `b`. Must be symmetric and exact: claiming commutation where none
    /// exists makes canonical pruning discard valid solutions.
    fn classes_commute(&self, a: usize, b: usize) -> bool;

    /// Apply move `mv` to `pos`, writing the successor into `out`.
    fn apply(&self, mv: usize, pos: &Self::Position, out: &mut Self::Position);

    /// Whether `pos` is the solved state.
    fn is_solved(&self, pos: &Self::Position) -> bool;

    /// The solved (identity) position.
    fn solved_position(&self) -> Self::Position;

    /// Render a move history as a space-joined string of move names.
    fn format_history(&self, history: &[usize]) -> String {
        history
            .iter()
            .map(|&mv| self.moves()[mv].name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
