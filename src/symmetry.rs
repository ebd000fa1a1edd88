//! The Symmetry Reducer contract.
//!
//! When a puzzle has a symmetry group, searching two symmetric branches
//! finds the same solutions twice. A reducer supplies two reductions: it
//! picks a canonical representative of the root's symmetry class (applied
//! once, before the search), and it vetoes candidate moves whose branch is
//! dominated by a symmetric branch the search will reach anyway.

use crate::puzzle::Puzzle;

/// Collaborator that canonicalizes positions and detects move-sequence
/// redundancy under a symmetry group. Queried concurrently from every
/// worker, so implementations must be `Sync` and read-only during search.
pub trait SymmetryReducer<P: Puzzle>: Sync {
    /// An equivalent position chosen as the canonical representative of
    /// `pos`'s symmetry class. Called once on the root.
    fn canonicalize(&self, puzzle: &P, pos: &P::Position) -> P::Position;

    /// Whether appending `next` to `history` produces a branch dominated
    /// by an equivalent branch that is canonical (and therefore searched).
    /// Must never veto both a branch and all of its equivalents.
    fn redundant(&self, puzzle: &P, history: &[usize], next: usize) -> bool;
}
