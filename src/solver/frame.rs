//! Per-ply search frames and the checkpoint/resume cursor.
//!
//! The DFS is iterative: one [`Frame`] per explored ply, held in a flat
//! array sized once to the maximum depth. This bounds memory
//! deterministically and makes the traversal position a plain piece of
//! data (a [`SearchCursor`]) rather than native call-stack state, which
//! is what lets work units be sliced off and a traversal be suspended and
//! resumed.

/// Search state for one ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Next move index to try at this ply. Indices already below it have
    /// been consumed (tried or filtered).
    pub move_index: usize,
    /// Exclusive ceiling on move indices at this ply. Interior plies
    /// enumerate the full move list; ply 0 of a work unit stops after the
    /// unit's first move, leaving the rest to other units.
    pub skip_base: usize,
    /// Move-class exclusion bitmask: classes redundant after the parent
    /// ply's move (repeat or out-of-order commuting continuation), plus
    /// any classes barred by a phase restriction.
    pub forbidden: u64,
}

impl Frame {
    /// A frame enumerating `[start, end)` under the given exclusion mask.
    pub fn new(start: usize, end: usize, forbidden: u64) -> Self {
        Self {
            move_index: start,
            skip_base: end,
            forbidden,
        }
    }

    /// Whether every admissible move index has been consumed.
    #[inline]
    pub fn exhausted(&self) -> bool {
        self.move_index >= self.skip_base
    }
}

/// A compact, inspectable record of a worker's exact traversal position.
///
/// `history[i]` is the move applied at ply `i`; `frames` holds one entry
/// per ply from the root to the current ply inclusive, so
/// `frames.len() == history.len() + 1`. Resuming replays `history` from
/// the root to rebuild the position buffers exactly and re-installs the
/// frames verbatim; node and lookup counters restart at zero. A cursor
/// taken at a throttle interrupt points at the node that was in flight,
/// so resuming revisits that one node before continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCursor {
    /// Depth bound of the pass this cursor was taken from.
    pub depth: usize,
    /// Moves applied from the root, outermost first.
    pub history: Vec<usize>,
    /// Frame state per ply, including the ply being enumerated.
    pub frames: Vec<Frame>,
}

impl SearchCursor {
    /// The ply the traversal was enumerating when captured.
    pub fn ply(&self) -> usize {
        self.history.len()
    }
}
