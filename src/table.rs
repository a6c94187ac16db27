//! The permis table: one witness word (or zeros) per corpus graph.
//!
//! On disk the table is the raw `u8` cells, row-major, with no header. Row `i`
//! belongs to slot `i` of the corpus it was computed from; the row width is
//! the vertex count, which the reader must know.

use crate::error::TableError;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Returns the conventional file name of the table for `n`-vertex graphs.
pub fn file_name(n: usize) -> String {
    format!("permises_for_g{n}c.bin")
}

/// Returns the conventional name of the graph6 file of permisless graphs.
pub fn permisless_file_name(n: usize) -> String {
    format!("permisless_g{n}c.g6")
}

/// An `rows × n` matrix of word entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermisTable {
    n: usize,
    rows: usize,
    data: Vec<u8>,
}

impl PermisTable {
    /// Creates an all-zero table.
    pub fn new(rows: usize, n: usize) -> Self {
        Self {
            n,
            rows,
            data: vec![0; rows * n],
        }
    }

    /// Returns the row width.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the raw row-major cells.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns row `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[u8] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Overwrites row `i` with `word`.
    ///
    /// # Panics
    /// Panics if `i` is out of range or `word` does not have length `n`.
    pub fn set_row(&mut self, i: usize, word: &[u8]) {
        assert_eq!(word.len(), self.n, "word length must equal the row width");
        self.data[i * self.n..(i + 1) * self.n].copy_from_slice(word);
    }

    /// Resets row `i` to zeros.
    pub fn clear_row(&mut self, i: usize) {
        self.data[i * self.n..(i + 1) * self.n].fill(0);
    }

    /// Returns `true` if row `i` is all zeros.
    pub fn is_zero_row(&self, i: usize) -> bool {
        self.row(i).iter().all(|&c| c == 0)
    }

    /// Returns the word stored in row `i`, or `None` for the no-witness marker.
    ///
    /// For `n <= 1` the only word is itself all zeros, so every row is read as
    /// a witness.
    pub fn witness(&self, i: usize) -> Option<&[u8]> {
        (self.n <= 1 || !self.is_zero_row(i)).then(|| self.row(i))
    }

    /// Iterates over the indices of the all-zero rows.
    pub fn zero_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.rows).filter(|&i| self.is_zero_row(i))
    }

    /// Writes the raw cells.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(&self.data)?;
        w.flush()
    }

    /// Writes the table to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns [`TableError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        self.write_to(BufWriter::new(File::create(path)?))?;
        Ok(())
    }

    /// Reads a table of row width `n`.
    ///
    /// The file has no header, so the row count is the byte count over `n`. A
    /// table of width 0 is always empty on disk and reads back with no rows,
    /// whatever the size of the corpus it was computed from.
    ///
    /// # Errors
    /// Returns [`TableError::Io`] if reading fails and [`TableError::Ragged`]
    /// if the byte count is not a multiple of `n`.
    pub fn read_from<R: Read>(mut r: R, n: usize) -> Result<Self, TableError> {
        let mut data = Vec::new();
        r.read_to_end(&mut data)?;
        let rows = match n {
            0 if data.is_empty() => 0,
            0 => return Err(TableError::Ragged { len: data.len(), n }),
            _ if data.len() % n != 0 => return Err(TableError::Ragged { len: data.len(), n }),
            _ => data.len() / n,
        };
        Ok(Self { n, rows, data })
    }

    /// Reads the table stored at `path`.
    ///
    /// # Errors
    /// As [`read_from`](Self::read_from).
    pub fn load(path: impl AsRef<Path>, n: usize) -> Result<Self, TableError> {
        Self::read_from(File::open(path)?, n)
    }
}

// ============================================================================
// Tests
// ============================================================================
