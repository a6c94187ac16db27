//! Adjacency matrices of small simple graphs (currently \(n \le 64\)).

use rand::Rng;
use std::fmt;
use std::io::{self, Write};

/// Largest vertex count representable by the `u64` neighbor bitsets.
pub const MAX_VERTICES: usize = 64;

/// Returns a mask with the lowest `n` bits set.
#[inline(always)]
pub const fn vertex_mask(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

#[inline(always)]
pub(crate) const fn bit(v: usize) -> u64 {
    1u64 << v
}

// ============================================================================
// AdjacencyMatrix
// ============================================================================

/// Symmetric 0/1 adjacency matrix with zero diagonal.
///
/// Row `v` is stored as the neighbor bitset of vertex `v`. Matrices are never
/// mutated once built; operations that need a different graph
/// ([`complement`](Self::complement), [`delete_vertex`](Self::delete_vertex))
/// return a new matrix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AdjacencyMatrix {
    rows: Vec<u64>,
}

impl AdjacencyMatrix {
    /// Creates a matrix from neighbor bitsets.
    ///
    /// # Panics
    /// Panics if there are more than [`MAX_VERTICES`] rows. In debug builds, also
    /// panics if a row has bits outside the vertex range, a self-loop, or if the
    /// matrix is not symmetric.
    pub fn from_rows(rows: Vec<u64>) -> Self {
        let n = rows.len();
        assert!(n <= MAX_VERTICES, "at most {MAX_VERTICES} vertices are supported");
        let mask = vertex_mask(n);

        for (i, &row) in rows.iter().enumerate() {
            debug_assert_eq!(row & !mask, 0, "row {i} has bits outside n");
            debug_assert_eq!((row >> i) & 1, 0, "self-loop at vertex {i}");
        }
        for i in 0..n {
            for j in (i + 1)..n {
                debug_assert_eq!(
                    (rows[i] >> j) & 1,
                    (rows[j] >> i) & 1,
                    "matrix is not symmetric at ({i},{j})"
                );
            }
        }

        Self { rows }
    }

    /// Creates the edgeless graph on `n` vertices.
    pub fn empty(n: usize) -> Self {
        Self::from_rows(vec![0; n])
    }

    /// Creates the complete graph on `n` vertices.
    pub fn complete(n: usize) -> Self {
        let mask = vertex_mask(n);
        Self::from_rows((0..n).map(|v| mask & !bit(v)).collect())
    }

    /// Creates the cycle `0 - 1 - ... - (n-1) - 0`.
    ///
    /// # Panics
    /// Panics if `n < 3`.
    pub fn cycle(n: usize) -> Self {
        assert!(n >= 3, "a cycle needs at least 3 vertices");
        let edges: Vec<(usize, usize)> = (0..n).map(|v| (v, (v + 1) % n)).collect();
        Self::from_edges(n, &edges)
    }

    /// Creates the path `0 - 1 - ... - (n-1)`.
    pub fn path(n: usize) -> Self {
        let edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
        Self::from_edges(n, &edges)
    }

    /// Creates a graph on `n` vertices from an undirected edge list.
    ///
    /// # Panics
    /// Panics if an endpoint is out of range or an edge is a self-loop.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut rows = vec![0u64; n];
        for &(u, v) in edges {
            assert!(u < n && v < n, "edge ({u}, {v}) out of range for {n} vertices");
            assert_ne!(u, v, "self-loop at vertex {u}");
            rows[u] |= bit(v);
            rows[v] |= bit(u);
        }
        Self::from_rows(rows)
    }

    /// Samples an Erdős–Rényi graph `G(n, p)`.
    pub fn new_random<R: Rng + ?Sized>(rng: &mut R, n: usize, p: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p), "p must be in [0, 1]");
        let mut rows = vec![0u64; n];
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.random_bool(p) {
                    rows[i] |= bit(j);
                    rows[j] |= bit(i);
                }
            }
        }
        Self::from_rows(rows)
    }

    /// Returns the number of vertices.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.rows.len()
    }

    /// Returns the neighbor bitsets, one per vertex.
    #[inline(always)]
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// Returns the neighbor bitset of `v`.
    #[inline(always)]
    pub fn neighbors(&self, v: usize) -> u64 {
        self.rows[v]
    }

    /// Returns whether the edge `(u, v)` exists.
    #[inline(always)]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        debug_assert!(u < self.n() && v < self.n());
        (self.rows[u] & bit(v)) != 0
    }

    /// Returns the degree of vertex `v`.
    #[inline(always)]
    pub fn degree(&self, v: usize) -> u32 {
        self.rows[v].count_ones()
    }

    /// Returns the total number of edges.
    pub fn edge_count(&self) -> usize {
        let sum: u32 = self.rows.iter().map(|row| row.count_ones()).sum();
        (sum as usize) / 2
    }

    /// Returns the complement graph (same vertices, every non-edge becomes an edge).
    pub fn complement(&self) -> Self {
        let mask = vertex_mask(self.n());
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(v, &row)| !row & mask & !bit(v))
            .collect();
        Self { rows }
    }

    /// Returns the subgraph induced by all vertices except `v`.
    ///
    /// Vertices above `v` shift down by one, keeping their relative order.
    pub fn delete_vertex(&self, v: usize) -> Self {
        debug_assert!(v < self.n());
        let low = bit(v) - 1;
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|&(u, _)| u != v)
            .map(|(_, &row)| (row & low) | ((row >> 1) & !low))
            .collect();
        Self { rows }
    }

    /// Writes the matrix as `n` lines of `0/1` characters.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        write!(w, "{self}")
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &row in &self.rows {
            for j in 0..self.n() {
                write!(f, "{}", (row >> j) & 1)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
