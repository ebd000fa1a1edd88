//! Canonical move ordering.
//!
//! Shrinks the branching factor by refusing move sequences that are
//! redundant under commutativity: a move class never follows itself (the
//! combined effect is a single move of that class, found elsewhere in the
//! tree), and two adjacent commuting classes are only explored in ascending
//! class order (the descending order reaches the same position). Both rules
//! are folded into one precomputed bitmask per class, so the DFS pays a
//! single AND per candidate move.

use crate::puzzle::Puzzle;

/// Precomputed per-class exclusion masks.
pub struct CanonicalFilter {
    /// `after[c]`: bitmask of classes that may not immediately follow a
    /// move of class `c`.
    after: Vec<u64>,
}

impl CanonicalFilter {
    /// Build the filter for a puzzle's move classes.
    pub fn new<P: Puzzle>(puzzle: &P) -> Self {
        let n = puzzle.class_count();
        // Runs once per solve; a release build must not wrap the shifts.
        assert!(n <= 64, "at most 64 move classes are supported");
        let mut after = vec![0u64; n];
        for prev in 0..n {
            let mut mask = 1u64 << prev;
            for next in 0..n {
                // Commuting pair: keep only the ascending order.
                if next < prev && puzzle.classes_commute(prev, next) {
                    mask |= 1u64 << next;
                }
            }
            after[prev] = mask;
        }
        Self { after }
    }

    /// Classes forbidden immediately after a move of class `prev`.
    #[inline]
    pub fn forbidden_after(&self, prev: usize) -> u64 {
        self.after[prev]
    }

    /// Whether a move of class `class` is allowed under `forbidden`.
    #[inline]
    pub fn allows(forbidden: u64, class: usize) -> bool {
        forbidden & (1u64 << class) == 0
    }

    /// Number of move classes the filter was built for.
    pub fn class_count(&self) -> usize {
        self.after.len()
    }
}
