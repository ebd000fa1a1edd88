//! A concrete Move Model: permutation puzzles.
//!
//! A puzzle is described by named generators, each a permutation of `n`
//! slots. Every non-identity power of a generator becomes a legal move, and
//! all powers of one generator share a move class (they turn the same
//! "axis"). Class commutation is computed exactly by composing generator
//! pairs both ways.

use crate::puzzle::{MoveInfo, Puzzle};

/// Fixed-size permutation state: `state[i]` is the piece in slot `i`.
pub type PermPosition = Vec<u8>;

/// A permutation puzzle built from named generators.
pub struct PermutationPuzzle {
    size: usize,
    infos: Vec<MoveInfo>,
    /// Move permutations, parallel to `infos`: applying move `m` puts the
    /// piece from slot `perms[m][i]` into slot `i`.
    perms: Vec<Vec<u8>>,
    class_count: usize,
    /// `commute[a * class_count + b]`, computed on the generators.
    commute: Vec<bool>,
}

fn compose(a: &[u8], b: &[u8]) -> Vec<u8> {
    // (a then b): slot i receives the piece b pulls from a's output.
    b.iter().map(|&j| a[j as usize]).collect()
}

fn is_identity(p: &[u8]) -> bool {
    p.iter().enumerate().all(|(i, &v)| v as usize == i)
}

impl PermutationPuzzle {
    /// Build a puzzle over `size` slots from `(name, permutation)`
    /// generators. Each generator's non-identity powers become moves named
    /// `name`, `name2`, `name3`, ... sharing one move class.
    ///
    /// # Panics
    /// Panics if a generator is not a permutation of `0..size`, is the
    /// identity, or if more than 64 generators are given.
    pub fn new(size: usize, generators: &[(&str, &[u8])]) -> Self {
        assert!(
            generators.len() <= 64,
            "at most 64 move classes are supported"
        );
        let mut infos = Vec::new();
        let mut perms: Vec<Vec<u8>> = Vec::new();
        let mut gen_perms = Vec::new();
        for (class, (name, perm)) in generators.iter().enumerate() {
            assert_eq!(perm.len(), size, "generator `{name}` has wrong size");
            let mut seen = vec![false; size];
            for &v in perm.iter() {
                assert!(
                    (v as usize) < size && !seen[v as usize],
                    "generator `{name}` is not a permutation"
                );
                seen[v as usize] = true;
            }
            assert!(!is_identity(perm), "generator `{name}` is the identity");
            gen_perms.push(perm.to_vec());

            // Expand non-identity powers: g, g^2, ... until cycling back.
            let mut power = perm.to_vec();
            let mut exponent = 1usize;
            loop {
                let name = if exponent == 1 {
                    (*name).to_string()
                } else {
                    format!("{name}{exponent}")
                };
                infos.push(MoveInfo { name, class });
                perms.push(power.clone());
                power = compose(&power, perm);
                exponent += 1;
                if is_identity(&power) {
                    break;
                }
            }
        }

        let class_count = generators.len();
        let mut commute = vec![false; class_count * class_count];
        for a in 0..class_count {
            for b in 0..class_count {
                let ab = compose(&gen_perms[a], &gen_perms[b]);
                let ba = compose(&gen_perms[b], &gen_perms[a]);
                commute[a * class_count + b] = ab == ba;
            }
        }

        Self {
            size,
            infos,
            perms,
            class_count,
            commute,
        }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Look up a move index by name.
    pub fn move_index(&self, name: &str) -> Option<usize> {
        self.infos.iter().position(|m| m.name == name)
    }
}

impl Puzzle for PermutationPuzzle {
    type Position = PermPosition;

    fn moves(&self) -> &[MoveInfo] {
        &self.infos
    }

    fn class_count(&self) -> usize {
        self.class_count
    }

    fn classes_commute(&self, a: usize, b: usize) -> bool {
        self.commute[a * self.class_count + b]
    }

    fn apply(&self, mv: usize, pos: &Self::Position, out: &mut Self::Position) {
        let perm = &self.perms[mv];
        out.clear();
        out.extend(perm.iter().map(|&j| pos[j as usize]));
    }

    fn is_solved(&self, pos: &Self::Position) -> bool {
        pos.iter().enumerate().all(|(i, &v)| v as usize == i)
    }

    fn solved_position(&self) -> Self::Position {
        (0..self.size as u8).collect()
    }
}
