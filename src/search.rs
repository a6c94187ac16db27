//! Searching a graph's words for a permis.
//!
//! Two strategies are offered. The exhaustive search walks all `n!` words in
//! [`Ehrlich`] order and is the only way to prove that no permis exists. The
//! probabilistic search tries the identity and then a fixed number of uniformly
//! random words; it is cheap and, for graphs that have permises at all, almost
//! always finds one.
//!
//! Either way a returned word has passed [`is_permis`], so a witness never
//! depends on chance. Only a `None` from the probabilistic search is
//! inconclusive.

use crate::bitstrings::StatusTable;
use crate::dynamics::{is_permis, is_permis_with};
use crate::graph::AdjacencyMatrix;
use crate::permutations::{Ehrlich, Word};
use rand::seq::SliceRandom;
use rand::Rng;

// ============================================================================
// Exhaustive
// ============================================================================

/// Returns the first permis of `m` in generation order, or `None` if none of
/// the `n!` words is a permis.
pub fn find_permis(m: &AdjacencyMatrix) -> Option<Word> {
    first_in_order(m.n(), |w| is_permis(m, w))
}

/// Same as [`find_permis`], reading configurations from `statuses`.
pub fn find_permis_with(statuses: &StatusTable, m: &AdjacencyMatrix) -> Option<Word> {
    first_in_order(m.n(), |w| is_permis_with(statuses, m, w))
}

/// Returns whether `m` has at least one permis (exhaustive).
pub fn has_permis(m: &AdjacencyMatrix) -> bool {
    find_permis(m).is_some()
}

/// Counts the words of `m` that are permises.
///
/// Unlike [`find_permis`] this never stops early: all `n!` words are tested.
pub fn permis_count(m: &AdjacencyMatrix) -> u64 {
    let mut words = Ehrlich::new(m.n());
    let mut count = 0;
    while let Some(w) = words.next_word() {
        if is_permis(m, w) {
            count += 1;
        }
    }
    count
}

#[inline]
fn first_in_order<F>(n: usize, mut accept: F) -> Option<Word>
where
    F: FnMut(&[u8]) -> bool,
{
    let mut words = Ehrlich::new(n);
    while let Some(w) = words.next_word() {
        if accept(w) {
            return Word::from_slice(w);
        }
    }
    None
}

// ============================================================================
// Probabilistic
// ============================================================================

/// Tests the identity word, then up to `tries` uniformly random words.
///
/// Returns the first permis found. `None` means only that no permis turned up
/// within the budget; use [`find_permis`] to settle the question.
pub fn find_permis_whp<R: Rng + ?Sized>(m: &AdjacencyMatrix, tries: usize, rng: &mut R) -> Option<Word> {
    first_sampled(m.n(), tries, rng, |w| is_permis(m, w))
}

/// Same as [`find_permis_whp`], reading configurations from `statuses`.
pub fn find_permis_whp_with<R: Rng + ?Sized>(
    statuses: &StatusTable,
    m: &AdjacencyMatrix,
    tries: usize,
    rng: &mut R,
) -> Option<Word> {
    first_sampled(m.n(), tries, rng, |w| is_permis_with(statuses, m, w))
}

/// Returns whether a permis turned up within `tries` random words.
pub fn has_permis_whp<R: Rng + ?Sized>(m: &AdjacencyMatrix, tries: usize, rng: &mut R) -> bool {
    find_permis_whp(m, tries, rng).is_some()
}

fn first_sampled<R, F>(n: usize, tries: usize, rng: &mut R, mut accept: F) -> Option<Word>
where
    R: Rng + ?Sized,
    F: FnMut(&[u8]) -> bool,
{
    let mut word = Word::identity(n).into_inner();
    if accept(&word) {
        return Word::from_vec(word);
    }
    for _ in 0..tries {
        word.shuffle(rng);
        if accept(&word) {
            return Word::from_vec(word);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
