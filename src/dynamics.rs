//! The sequential activation rule and the one-round stabilization test.
//!
//! One round visits the vertices in word order and sets each vertex active
//! iff none of its neighbors is currently active. Updates are sequential: a
//! vertex sees the values its predecessors in the word have just written.
//!
//! A word is a *permis* when, from every starting configuration, the state
//! after one round is already a fixed point. After a round the active set is
//! independent (a vertex switched on only when its neighborhood was empty,
//! and every later neighbor saw it and switched off), so active vertices can
//! never flip again and only inactive vertices with an empty active
//! neighborhood can break stability.

use crate::bitstrings::{Bitstrings, StatusTable, StatusVector};
use crate::graph::{bit, AdjacencyMatrix};

/// Runs one round of updates over `rows` in `word` order.
#[inline(always)]
fn round(rows: &[u64], word: &[u8], mut s: u64) -> u64 {
    for &v in word {
        let v = usize::from(v);
        if rows[v] & s == 0 {
            s |= bit(v);
        } else {
            s &= !bit(v);
        }
    }
    s
}

/// Returns `true` if no inactive vertex would switch on in a second round.
#[inline(always)]
fn is_settled(rows: &[u64], word: &[u8], s: u64) -> bool {
    word.iter().all(|&v| {
        let v = usize::from(v);
        s & bit(v) != 0 || rows[v] & s != 0
    })
}

#[inline(always)]
fn settles(rows: &[u64], word: &[u8], start: u64) -> bool {
    is_settled(rows, word, round(rows, word, start))
}

/// Applies one round of the activation rule to `status` in `word` order.
pub fn apply_round(m: &AdjacencyMatrix, word: &[u8], status: &mut StatusVector) {
    debug_assert_eq!(word.len(), m.n());
    debug_assert_eq!(status.n(), m.n());
    *status = StatusVector::from_bits(round(m.rows(), word, status.bits()), m.n());
}

/// Returns whether one round under `word` from `start` reaches a fixed point.
pub fn settles_from(m: &AdjacencyMatrix, word: &[u8], start: StatusVector) -> bool {
    debug_assert_eq!(word.len(), m.n());
    settles(m.rows(), word, start.bits())
}

/// Returns whether `word` is a permis of `m`.
///
/// Every one of the `2^n` starting configurations is tried; the test stops at
/// the first configuration that is not settled after one round.
///
/// # Panics
/// Panics if `m` has 64 vertices (the configurations cannot be enumerated).
pub fn is_permis(m: &AdjacencyMatrix, word: &[u8]) -> bool {
    debug_assert_eq!(word.len(), m.n());
    let rows = m.rows();
    Bitstrings::new(m.n()).all(|s| settles(rows, word, s.bits()))
}

/// Same as [`is_permis`], reading the configurations from a precomputed table.
pub fn is_permis_with(statuses: &StatusTable, m: &AdjacencyMatrix, word: &[u8]) -> bool {
    debug_assert_eq!(statuses.n(), m.n());
    debug_assert_eq!(word.len(), m.n());
    let rows = m.rows();
    statuses.as_bits().iter().all(|&s| settles(rows, word, s))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permutations::{Ehrlich, Word};
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    #[test]
    fn identity_on_edgeless_graph_is_permis() {
        for n in 0..=10 {
            let m = AdjacencyMatrix::empty(n);
            assert!(is_permis(&m, &Word::identity(n)), "n = {n}");
        }
    }

    #[test]
    fn every_word_of_a_complete_graph_is_permis() {
        let m = AdjacencyMatrix::complete(4);
        assert!(Ehrlich::new(4).all(|w| is_permis(&m, &w)));
    }

    #[test]
    fn identity_on_p3_is_not_permis() {
        // From {1, 2}: 0 stays off, 1 switches off, 2 stays on, leaving 0 off
        // with no active neighbor.
        let m = AdjacencyMatrix::path(3);
        let start = StatusVector::from_bits(0b110, 3);
        assert!(!settles_from(&m, &[0, 1, 2], start));
        assert!(!is_permis(&m, &[0, 1, 2]));
        assert!(is_permis(&m, &[1, 0, 2]));
    }

    #[test]
    fn active_vertices_never_need_re_examination() {
        let mut rng = XorShiftRng::seed_from_u64(0xAC71);
        for _ in 0..200 {
            let n = rng.random_range(1..=10);
            let m = AdjacencyMatrix::new_random(&mut rng, n, 0.4);
            let mut word = Word::identity(n).into_inner();
            word.shuffle(&mut rng);
            for start in Bitstrings::new(n) {
                let mut s = start;
                apply_round(&m, &word, &mut s);
                for v in 0..n {
                    if s.is_active(v) {
                        assert_eq!(
                            m.neighbors(v) & s.bits(),
                            0,
                            "active vertex {v} has an active neighbor"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn settled_check_matches_an_explicit_second_round() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EC0);
        for _ in 0..100 {
            let m = AdjacencyMatrix::new_random(&mut rng, 7, 0.35);
            let mut word = Word::identity(7).into_inner();
            word.shuffle(&mut rng);
            for start in Bitstrings::new(7) {
                let mut once = start;
                apply_round(&m, &word, &mut once);
                let mut twice = once;
                apply_round(&m, &word, &mut twice);
                assert_eq!(settles_from(&m, &word, start), once == twice);
            }
        }
    }

    #[test]
    fn is_permis_is_deterministic() {
        let mut rng = XorShiftRng::seed_from_u64(11);
        for _ in 0..20 {
            let m = AdjacencyMatrix::new_random(&mut rng, 6, 0.5);
            let mut word = Word::identity(6).into_inner();
            word.shuffle(&mut rng);
            let first = is_permis(&m, &word);
            for _ in 0..3 {
                assert_eq!(is_permis(&m, &word), first);
            }
        }
    }

    #[test]
    fn table_variant_agrees_with_enumerator() {
        let mut rng = XorShiftRng::seed_from_u64(23);
        let statuses = StatusTable::new(6);
        for _ in 0..30 {
            let m = AdjacencyMatrix::new_random(&mut rng, 6, 0.4);
            for word in Ehrlich::new(6).step_by(37) {
                assert_eq!(is_permis_with(&statuses, &m, &word), is_permis(&m, &word));
            }
        }
    }

    #[test]
    fn c7_has_no_permis_word() {
        let m = AdjacencyMatrix::cycle(7);
        assert!(Ehrlich::new(7).all(|w| !is_permis(&m, &w)));
    }
}
