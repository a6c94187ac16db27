//! Loading a graph6 corpus: one file, one vertex count, many graphs.
//!
//! Every non-blank line gets a slot, in file order. A line that fails to
//! decode keeps its slot as a rejected entry so that slot `i` of a corpus,
//! of its permis table, and of any report all refer to the same graph.

use crate::error::{CorpusError, Graph6Error};
use crate::graph::AdjacencyMatrix;
use crate::graph6::{decode_graph6, decode_graph6_of_order};
use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Number of connected graphs on `n` unlabelled vertices (OEIS A001349).
const CONNECTED_GRAPHS: [u128; 20] = [
    1,
    1,
    1,
    2,
    6,
    21,
    112,
    853,
    11_117,
    261_080,
    11_716_571,
    1_006_700_565,
    164_059_830_476,
    50_335_907_869_219,
    29_003_487_462_848_061,
    31_397_381_142_761_241_960,
    63_969_560_113_225_176_176_277,
    245_871_831_682_084_026_519_528_568,
    1_787_331_725_248_899_088_890_200_576_580,
    24_636_021_429_399_867_655_322_650_759_681_644,
];

/// Returns the number of connected graphs on `n` unlabelled vertices, if known.
pub fn connected_graph_count(n: usize) -> Option<u128> {
    CONNECTED_GRAPHS.get(n).copied()
}

/// One slot of a corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// 1-based line number in the source.
    pub line: usize,
    /// The decoded graph, or why the line was rejected.
    pub graph: Result<AdjacencyMatrix, Graph6Error>,
}

/// The graphs of one graph6 file, all on the same number of vertices.
#[derive(Clone, Debug)]
pub struct GraphCorpus {
    n: usize,
    entries: Vec<Entry>,
}

impl GraphCorpus {
    /// Reads a corpus from graph6 lines.
    ///
    /// Blank lines are skipped. The first line that decodes fixes the vertex
    /// count; later lines declaring another count are rejected with
    /// [`Graph6Error::OrderMismatch`]. Rejected lines are logged and kept.
    ///
    /// # Errors
    /// Returns [`CorpusError::Io`] if reading fails and
    /// [`CorpusError::NoConsistentOrder`] if no line decodes.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, CorpusError> {
        let mut n = None;
        let mut entries = Vec::new();

        for (i, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let line = line.trim_ascii();
            if line.is_empty() {
                continue;
            }
            let graph = match n {
                Some(n) => decode_graph6_of_order(line, n),
                None => decode_graph6(line),
            };
            match &graph {
                Ok(m) => {
                    n.get_or_insert(m.n());
                }
                Err(e) => warn!("Rejecting line {}: {e}", i + 1),
            }
            entries.push(Entry { line: i + 1, graph });
        }

        let n = n.ok_or(CorpusError::NoConsistentOrder {
            lines: entries.len(),
        })?;
        Ok(Self { n, entries })
    }

    /// Reads the corpus stored at `path`.
    ///
    /// # Errors
    /// As [`from_reader`](Self::from_reader).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let corpus = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(
            "Loaded {} graphs on {} vertices from {} ({} rejected)",
            corpus.len(),
            corpus.n,
            path.display(),
            corpus.rejected().count()
        );
        Ok(corpus)
    }

    /// Builds a corpus from already decoded graphs.
    ///
    /// # Panics
    /// Panics if the graphs do not all have `n` vertices.
    pub fn from_matrices(n: usize, graphs: Vec<AdjacencyMatrix>) -> Self {
        let entries = graphs
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                assert_eq!(m.n(), n, "graph {i} has {} vertices, not {n}", m.n());
                Entry { line: i + 1, graph: Ok(m) }
            })
            .collect();
        Self { n, entries }
    }

    /// Returns the vertex count shared by every graph.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the number of slots, rejected lines included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the corpus has no slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns slot `i`.
    pub fn get(&self, i: usize) -> Option<&Entry> {
        self.entries.get(i)
    }

    /// Returns every slot in file order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Iterates over the decoded graphs with their slot index.
    pub fn graphs(&self) -> impl Iterator<Item = (usize, &AdjacencyMatrix)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.graph.as_ref().ok().map(|m| (i, m)))
    }

    /// Iterates over the rejected lines with their slot index.
    pub fn rejected(&self) -> impl Iterator<Item = (usize, &Entry)> + '_ {
        self.entries.iter().enumerate().filter(|(_, e)| e.graph.is_err())
    }

    /// Checks the slot count against the number of connected graphs on `n`
    /// vertices.
    ///
    /// # Errors
    /// Returns [`CorpusError::UnknownOrder`] if the count is not tabulated and
    /// [`CorpusError::SizeMismatch`] if it differs.
    pub fn check_size(&self) -> Result<(), CorpusError> {
        let expected = connected_graph_count(self.n).ok_or(CorpusError::UnknownOrder { n: self.n })?;
        if expected != self.len() as u128 {
            return Err(CorpusError::SizeMismatch {
                n: self.n,
                expected,
                got: self.len(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONNECTED_4: &str = "Cs\nCq\nC{\nCr\nC}\nC~\n";

    #[test]
    fn reads_lines_in_order() {
        let corpus = GraphCorpus::from_reader("Dhc\nD~{\n".as_bytes()).unwrap();
        assert_eq!(corpus.n(), 5);
        assert_eq!(corpus.len(), 2);
        let graphs: Vec<_> = corpus.graphs().collect();
        assert_eq!(graphs[0], (0, &AdjacencyMatrix::cycle(5)));
        assert_eq!(graphs[1], (1, &AdjacencyMatrix::complete(5)));
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let corpus = GraphCorpus::from_reader("\nDhc\r\n\n  \nD~{".as_bytes()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0).unwrap().line, 2);
        assert_eq!(corpus.get(1).unwrap().line, 5);
        assert_eq!(corpus.rejected().count(), 0);
    }

    #[test]
    fn rejected_lines_keep_their_slot() {
        let corpus = GraphCorpus::from_reader("Dhc\nD h\nCs\nD~{\n".as_bytes()).unwrap();
        assert_eq!(corpus.len(), 4);
        let rejected: Vec<usize> = corpus.rejected().map(|(i, _)| i).collect();
        assert_eq!(rejected, vec![1, 2]);
        assert!(matches!(
            corpus.get(1).unwrap().graph,
            Err(Graph6Error::InvalidByte { .. })
        ));
        assert_eq!(
            corpus.get(2).unwrap().graph,
            Err(Graph6Error::OrderMismatch { expected: 5, got: 4 })
        );
        let kept: Vec<usize> = corpus.graphs().map(|(i, _)| i).collect();
        assert_eq!(kept, vec![0, 3]);
    }

    #[test]
    fn order_comes_from_the_first_decodable_line() {
        let corpus = GraphCorpus::from_reader("D\nCs\nCq\n".as_bytes()).unwrap();
        assert_eq!(corpus.n(), 4);
        assert_eq!(corpus.len(), 3);
        assert!(corpus.get(0).unwrap().graph.is_err());
    }

    #[test]
    fn no_decodable_line_is_fatal() {
        let err = GraphCorpus::from_reader("D h\n\n~\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CorpusError::NoConsistentOrder { lines: 2 }));
        let err = GraphCorpus::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, CorpusError::NoConsistentOrder { lines: 0 }));
    }

    #[test]
    fn size_oracle() {
        assert_eq!(connected_graph_count(0), Some(1));
        assert_eq!(connected_graph_count(4), Some(6));
        assert_eq!(connected_graph_count(7), Some(853));
        assert_eq!(connected_graph_count(10), Some(11_716_571));
        assert_eq!(connected_graph_count(20), None);
    }

    #[test]
    fn full_corpus_passes_size_check() {
        let corpus = GraphCorpus::from_reader(CONNECTED_4.as_bytes()).unwrap();
        corpus.check_size().unwrap();
    }

    #[test]
    fn partial_corpus_fails_size_check() {
        let corpus = GraphCorpus::from_reader("Cs\nCq\n".as_bytes()).unwrap();
        assert!(matches!(
            corpus.check_size(),
            Err(CorpusError::SizeMismatch {
                n: 4,
                expected: 6,
                got: 2
            })
        ));
    }

    #[test]
    fn open_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONNECTED_4.as_bytes()).unwrap();
        let corpus = GraphCorpus::open(file.path()).unwrap();
        assert_eq!(corpus.n(), 4);
        assert_eq!(corpus.len(), 6);
    }

    #[test]
    fn open_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = GraphCorpus::open(dir.path().join("missing.g6")).unwrap_err();
        assert!(matches!(err, CorpusError::Io(_)));
    }
}
