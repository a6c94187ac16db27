//! Error types shared across the crate.
//!
//! Search never fails on a "no permis" outcome: absence of a witness is a
//! value (see [`crate::classify::RowOutcome`]), not an error. The types here
//! only cover malformed input, inconsistent corpora and persistence failures.

use thiserror::Error;

/// A malformed graph6 line.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Graph6Error {
    /// The line has no bytes at all.
    #[error("graph6 line is empty")]
    Empty,
    /// A byte outside the printable graph6 range `63..=126`.
    #[error("invalid graph6 byte {byte:#04x} at offset {offset}")]
    InvalidByte {
        /// Offset of the byte in the line.
        offset: usize,
        /// The offending byte.
        byte: u8,
    },
    /// The vertex-count header ends before its declared width.
    #[error("graph6 header truncated: need {needed} units, line has {got}")]
    TruncatedHeader {
        /// Units the header needs.
        needed: usize,
        /// Units available.
        got: usize,
    },
    /// The graph does not fit the 64-bit neighbor bitsets.
    #[error("graph has {n} vertices; at most {max} are supported")]
    TooManyVertices {
        /// Declared vertex count.
        n: u64,
        /// Supported maximum.
        max: usize,
    },
    /// Fewer 6-bit units than the upper triangle requires.
    #[error("graph6 bitstream truncated: {n} vertices need {needed} data units, line has {got}")]
    Truncated {
        /// Declared vertex count.
        n: usize,
        /// Units the triangle needs.
        needed: usize,
        /// Units available after the header.
        got: usize,
    },
    /// The line declares a vertex count different from the rest of the batch.
    #[error("graph has {got} vertices but the batch has {expected}")]
    OrderMismatch {
        /// Vertex count established by the batch.
        expected: usize,
        /// Vertex count declared by this line.
        got: usize,
    },
}

/// Failures while loading or validating a whole graph6 corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// No line decoded, so the batch vertex count is unknown.
    #[error("no line of the corpus decodes; cannot establish the vertex count ({lines} non-blank lines)")]
    NoConsistentOrder {
        /// Number of non-blank lines seen.
        lines: usize,
    },
    /// The graph count disagrees with the number of connected graphs on `n` vertices.
    #[error("corpus on {n} vertices has {got} graphs, expected {expected} connected graphs")]
    SizeMismatch {
        /// Vertex count of the corpus.
        n: usize,
        /// Graph count from the size oracle.
        expected: u128,
        /// Graph count found in the file.
        got: usize,
    },
    /// The size oracle has no entry for this vertex count.
    #[error("no known connected-graph count for {n} vertices")]
    UnknownOrder {
        /// Vertex count of the corpus.
        n: usize,
    },
}

/// Failures while persisting, loading or checking a permis table.
#[derive(Error, Debug)]
pub enum TableError {
    /// Reading or writing the table file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file length is not a whole number of rows.
    #[error("table of {len} bytes is not a whole number of rows of width {n}")]
    Ragged {
        /// File length in bytes.
        len: usize,
        /// Row width.
        n: usize,
    },
    /// Table and corpus disagree on the number of graphs.
    #[error("table has {table} rows but the corpus has {corpus} graphs")]
    RowCount {
        /// Rows in the table.
        table: usize,
        /// Graphs in the corpus.
        corpus: usize,
    },
    /// Table and corpus disagree on the vertex count.
    #[error("table rows have width {table} but the corpus graphs have {corpus} vertices")]
    Width {
        /// Row width of the table.
        table: usize,
        /// Vertex count of the corpus.
        corpus: usize,
    },
    /// The corpus order is too large to enumerate its configurations.
    #[error("cannot verify permises of {n}-vertex graphs: 2^{n} configurations")]
    OrderTooLarge {
        /// Vertex count of the corpus.
        n: usize,
    },
}

/// Failures of a batch classification run.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The corpus failed a consistency check.
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    /// The worker pool could not be built.
    #[error("could not create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// The configuration cannot be run.
    #[error("invalid classifier configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = Graph6Error::Truncated {
            n: 5,
            needed: 2,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "graph6 bitstream truncated: 5 vertices need 2 data units, line has 1"
        );

        let err = CorpusError::SizeMismatch {
            n: 4,
            expected: 6,
            got: 5,
        };
        assert!(err.to_string().contains("expected 6"));
    }

    #[test]
    fn corpus_error_converts_into_classify_error() {
        let err: ClassifyError = CorpusError::UnknownOrder { n: 40 }.into();
        assert!(matches!(err, ClassifyError::Corpus(CorpusError::UnknownOrder { n: 40 })));
    }
}
