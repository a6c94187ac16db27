//! Induced cycles (holes) and their complements (antiholes).
//!
//! Used to describe permisless graphs structurally: by the strong perfect
//! graph theorem, a graph with no odd hole and no odd antihole of length at
//! least 5 is perfect.

use crate::graph::{bit, vertex_mask, AdjacencyMatrix};

/// Returns whether `m` is a single cycle through all of its vertices.
///
/// Graphs with fewer than 3 vertices are never cycles.
pub fn is_cycle(m: &AdjacencyMatrix) -> bool {
    m.n() >= 3 && is_cycle_on(m.rows(), vertex_mask(m.n()))
}

/// Returns whether the subgraph induced by `set` is one cycle.
fn is_cycle_on(rows: &[u64], set: u64) -> bool {
    let len = set.count_ones();
    if len < 3 {
        return false;
    }
    let mut rest = set;
    while rest != 0 {
        let v = rest.trailing_zeros() as usize;
        rest &= rest - 1;
        if (rows[v] & set).count_ones() != 2 {
            return false;
        }
    }

    // Every vertex has degree 2, so the set is a union of cycles. Walk the one
    // through the lowest vertex; returning early means there is another.
    let start = set.trailing_zeros() as usize;
    let mut prev = start;
    let mut current = (rows[start] & set).trailing_zeros() as usize;
    for _ in 1..len - 1 {
        let next = (rows[current] & set & !bit(prev)).trailing_zeros() as usize;
        if next == start {
            return false;
        }
        prev = current;
        current = next;
    }
    true
}

/// Returns whether `m` has an induced cycle on exactly `k` vertices.
///
/// Vertex sets are grown in increasing order and abandoned as soon as some
/// chosen vertex has three chosen neighbors.
pub fn has_induced_cycle(m: &AdjacencyMatrix, k: usize) -> bool {
    let n = m.n();
    if k < 3 || n < k {
        return false;
    }
    if n == k {
        return is_cycle(m);
    }
    grow(m.rows(), k, 0, 0)
}

fn grow(rows: &[u64], k: usize, from: usize, chosen: u64) -> bool {
    let size = chosen.count_ones() as usize;
    if size == k {
        return is_cycle_on(rows, chosen);
    }
    let n = rows.len();
    for v in from..n {
        if n - v < k - size {
            break;
        }
        let with = chosen | bit(v);
        if (rows[v] & chosen).count_ones() > 2 {
            continue;
        }
        let mut overloaded = false;
        let mut touched = rows[v] & chosen;
        while touched != 0 {
            let u = touched.trailing_zeros() as usize;
            touched &= touched - 1;
            if (rows[u] & with).count_ones() > 2 {
                overloaded = true;
                break;
            }
        }
        if !overloaded && grow(rows, k, v + 1, with) {
            return true;
        }
    }
    false
}

/// Returns whether `m` has an induced complement of `C_k`.
pub fn has_induced_antihole(m: &AdjacencyMatrix, k: usize) -> bool {
    has_induced_cycle(&m.complement(), k)
}

/// Which holes and antiholes of the requested lengths a graph contains.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoleReport {
    /// Lengths `k` with an induced `C_k`.
    pub holes: Vec<usize>,
    /// Lengths `k` with an induced complement of `C_k`.
    pub antiholes: Vec<usize>,
}

impl HoleReport {
    /// Returns `true` if no hole or antihole of a requested length was found.
    ///
    /// When every odd length from 5 up to the order was requested, this means
    /// the graph is perfect.
    pub fn is_berge(&self) -> bool {
        self.holes.is_empty() && self.antiholes.is_empty()
    }
}

/// Checks `m` for holes and antiholes of each length in `lengths`.
pub fn odd_hole_report(m: &AdjacencyMatrix, lengths: &[usize]) -> HoleReport {
    let complement = m.complement();
    HoleReport {
        holes: lengths.iter().copied().filter(|&k| has_induced_cycle(m, k)).collect(),
        antiholes: lengths
            .iter()
            .copied()
            .filter(|&k| has_induced_cycle(&complement, k))
            .collect(),
    }
}

/// Returns the odd lengths from 5 up to `n`.
pub fn odd_lengths_up_to(n: usize) -> Vec<usize> {
    (5..=n).step_by(2).collect()
}

// ============================================================================
// Tests
// ============================================================================
