//! Status vectors and the enumeration of all `2^n` starting configurations.

use std::iter::FusedIterator;

/// An `n`-vertex configuration: vertex `v` is active iff bit `v` is set.
///
/// The canonical enumeration order identifies a configuration with an integer
/// whose big-endian `n`-bit representation lists the vertices in order, so
/// vertex `0` is the *most* significant bit of [`index`](Self::index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatusVector {
    bits: u64,
    n: u8,
}

impl StatusVector {
    /// Returns the all-inactive configuration on `n` vertices.
    #[inline]
    pub const fn zeros(n: usize) -> Self {
        debug_assert!(n <= 64);
        Self { bits: 0, n: n as u8 }
    }

    /// Returns configuration number `index` in the canonical order.
    #[inline]
    pub const fn from_index(index: u64, n: usize) -> Self {
        debug_assert!(n <= 64);
        let bits = if n == 0 { 0 } else { index.reverse_bits() >> (64 - n) };
        Self { bits, n: n as u8 }
    }

    /// Wraps a vertex bitset.
    #[inline]
    pub const fn from_bits(bits: u64, n: usize) -> Self {
        debug_assert!(n <= 64);
        Self { bits, n: n as u8 }
    }

    /// Returns the position of this configuration in the canonical order.
    #[inline]
    pub const fn index(&self) -> u64 {
        if self.n == 0 {
            0
        } else {
            self.bits.reverse_bits() >> (64 - self.n as u32)
        }
    }

    /// Returns the vertex bitset.
    #[inline(always)]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Returns the number of vertices.
    #[inline(always)]
    pub const fn n(&self) -> usize {
        self.n as usize
    }

    /// Returns whether vertex `v` is active.
    #[inline(always)]
    pub const fn is_active(&self, v: usize) -> bool {
        (self.bits >> v) & 1 != 0
    }

    /// Sets the status of vertex `v`.
    #[inline(always)]
    pub fn set(&mut self, v: usize, active: bool) {
        debug_assert!(v < self.n());
        if active {
            self.bits |= 1 << v;
        } else {
            self.bits &= !(1 << v);
        }
    }

    /// Returns the number of active vertices.
    #[inline]
    pub const fn active_count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Returns one `0/1` entry per vertex, vertex `0` first.
    pub fn to_vec(&self) -> Vec<u8> {
        (0..self.n()).map(|v| u8::from(self.is_active(v))).collect()
    }
}

// ============================================================================
// Enumeration
// ============================================================================

/// Lazily enumerates all `2^n` configurations in increasing index order.
///
/// Each step is a couple of bit operations; nothing is allocated.
#[derive(Clone, Debug)]
pub struct Bitstrings {
    n: usize,
    next: u64,
    end: u64,
}

impl Bitstrings {
    /// Creates an enumerator over `n`-vertex configurations.
    ///
    /// # Panics
    /// Panics if `n >= 64`, since `2^n` would not fit the counter.
    pub fn new(n: usize) -> Self {
        assert!(n < 64, "cannot enumerate 2^{n} configurations");
        Self {
            n,
            next: 0,
            end: 1u64 << n,
        }
    }

    /// Restarts the enumeration from the all-inactive configuration.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Iterator for Bitstrings {
    type Item = StatusVector;

    #[inline]
    fn next(&mut self) -> Option<StatusVector> {
        if self.next == self.end {
            return None;
        }
        let status = StatusVector::from_index(self.next, self.n);
        self.next += 1;
        Some(status)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.end - self.next).ok();
        (left.unwrap_or(usize::MAX), left)
    }
}

impl ExactSizeIterator for Bitstrings {}

impl FusedIterator for Bitstrings {}

/// All `2^n` configuration bitsets, precomputed in canonical order.
///
/// Build one per vertex count and share it (read-only) across every graph of
/// that order; see [`crate::dynamics::is_permis_with`].
#[derive(Clone, Debug)]
pub struct StatusTable {
    n: usize,
    bits: Vec<u64>,
}

impl StatusTable {
    /// Precomputes the configurations on `n` vertices.
    ///
    /// # Panics
    /// Panics if `n >= 64`.
    pub fn new(n: usize) -> Self {
        let bits = Bitstrings::new(n).map(|s| s.bits()).collect();
        Self { n, bits }
    }

    /// Returns the vertex count the table was built for.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the number of configurations, `2^n`.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always `false`: even `n = 0` has one (empty) configuration.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the configuration bitsets in canonical order.
    #[inline(always)]
    pub fn as_bits(&self) -> &[u64] {
        &self.bits
    }

    /// Iterates over the configurations in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = StatusVector> + '_ {
        self.bits.iter().map(|&bits| StatusVector::from_bits(bits, self.n))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn enumerates_every_configuration_once_in_order() {
        for n in 0..=15 {
            let indices: Vec<u64> = Bitstrings::new(n).map(|s| s.index()).collect();
            assert_eq!(indices.len(), 1 << n, "n = {n}");
            assert!(indices.iter().copied().eq(0..(1u64 << n)), "n = {n}");

            let distinct: HashSet<u64> = Bitstrings::new(n).map(|s| s.bits()).collect();
            assert_eq!(distinct.len(), 1 << n, "n = {n}");
        }
    }

    #[test]
    fn vertex_zero_is_the_most_significant_bit() {
        let all: Vec<Vec<u8>> = Bitstrings::new(3).map(|s| s.to_vec()).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0, 0],
                vec![0, 0, 1],
                vec![0, 1, 0],
                vec![0, 1, 1],
                vec![1, 0, 0],
                vec![1, 0, 1],
                vec![1, 1, 0],
                vec![1, 1, 1],
            ]
        );
    }

    #[test]
    fn reset_restarts_the_sequence() {
        let mut it = Bitstrings::new(4);
        let first: Vec<StatusVector> = it.by_ref().take(5).collect();
        assert_eq!(it.len(), 11);
        it.reset();
        assert_eq!(it.len(), 16);
        let again: Vec<StatusVector> = it.take(5).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn exhausted_enumerator_stays_exhausted() {
        let mut it = Bitstrings::new(2);
        assert_eq!(it.by_ref().count(), 4);
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn index_round_trips_through_bits() {
        for n in [1, 5, 17, 63] {
            for index in [0u64, 1, 2, (1 << n) - 1] {
                let s = StatusVector::from_index(index, n);
                assert_eq!(s.index(), index);
                assert_eq!(StatusVector::from_bits(s.bits(), n), s);
            }
        }
    }

    #[test]
    fn set_and_query_single_vertices() {
        let mut s = StatusVector::zeros(6);
        s.set(4, true);
        s.set(1, true);
        assert!(s.is_active(4) && s.is_active(1));
        assert_eq!(s.active_count(), 2);
        s.set(4, false);
        assert_eq!(s.to_vec(), vec![0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn status_table_matches_enumerator() {
        let table = StatusTable::new(9);
        assert_eq!(table.n(), 9);
        assert_eq!(table.len(), 512);
        assert!(table.iter().eq(Bitstrings::new(9)));
        assert_eq!(StatusTable::new(0).len(), 1);
    }
}
