//! Independent checks of a permis table against its corpus.

use crate::corpus::GraphCorpus;
use crate::dynamics::is_permis;
use crate::error::TableError;
use crate::graph::MAX_VERTICES;
use crate::induced::{odd_hole_report, HoleReport};
use crate::permutations::{is_permutation, Word};
use crate::search::find_permis_whp;
use crate::table::PermisTable;
use dsi_progress_logger::prelude::*;
use log::{info, warn};
use rand::Rng;

/// A non-zero row that is not a permis of its graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FalseWitness {
    /// Corpus slot.
    pub index: usize,
    /// The stored row.
    pub row: Vec<u8>,
    /// A permis found by a fresh probabilistic search, if any.
    pub replacement: Option<Word>,
}

/// Result of [`verify_table`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Rows whose word passed the stabilization test.
    pub verified: usize,
    /// Rows claiming a witness that does not hold.
    pub false_witnesses: Vec<FalseWitness>,
    /// Slots of decoded graphs with an all-zero row.
    pub permisless: Vec<usize>,
    /// Slots of lines that did not decode.
    pub rejected: Vec<usize>,
}

impl VerificationReport {
    /// Returns `true` if every stored witness holds.
    pub fn is_valid(&self) -> bool {
        self.false_witnesses.is_empty()
    }
}

/// Re-checks every row of `table` against the matching graph of `corpus`.
///
/// A stored word must be a permutation and pass [`is_permis`]. For each row
/// that fails, a probabilistic search with `tries` random words looks for a
/// genuine replacement, which tells a corrupted row from a graph that has no
/// permis at all.
///
/// # Errors
/// Returns [`TableError::Width`] or [`TableError::RowCount`] if the table does
/// not have the corpus's shape, and [`TableError::OrderTooLarge`] if the
/// corpus graphs have [`MAX_VERTICES`] vertices.
pub fn verify_table<R: Rng + ?Sized>(
    corpus: &GraphCorpus,
    table: &PermisTable,
    tries: usize,
    rng: &mut R,
) -> Result<VerificationReport, TableError> {
    if corpus.n() >= MAX_VERTICES {
        return Err(TableError::OrderTooLarge { n: corpus.n() });
    }
    if table.n() != corpus.n() {
        return Err(TableError::Width {
            table: table.n(),
            corpus: corpus.n(),
        });
    }
    if table.rows() != corpus.len() {
        return Err(TableError::RowCount {
            table: table.rows(),
            corpus: corpus.len(),
        });
    }

    let mut report = VerificationReport::default();
    let mut pl = progress_logger![item_name = "graph", expected_updates = Some(corpus.len())];
    pl.start("Verifying permis table...");
    for (i, entry) in corpus.entries().iter().enumerate() {
        pl.light_update();
        let Ok(m) = &entry.graph else {
            report.rejected.push(i);
            continue;
        };
        let Some(row) = table.witness(i) else {
            report.permisless.push(i);
            continue;
        };
        if is_permutation(row) && is_permis(m, row) {
            report.verified += 1;
            continue;
        }
        let replacement = find_permis_whp(m, tries, rng);
        match &replacement {
            Some(word) => warn!("Row {i} is not a permis; {word} is"),
            None => warn!("Row {i} is not a permis and no permis turned up in {tries} tries"),
        }
        report.false_witnesses.push(FalseWitness {
            index: i,
            row: row.to_vec(),
            replacement,
        });
    }
    pl.done();

    info!(
        "Verified {} witnesses; {} false, {} permisless rows, {} rejected lines",
        report.verified,
        report.false_witnesses.len(),
        report.permisless.len(),
        report.rejected.len()
    );
    Ok(report)
}

/// Reports holes and antiholes of the given lengths for each listed slot.
///
/// Slots that are out of range or hold a rejected line are skipped.
pub fn hole_census(corpus: &GraphCorpus, slots: &[usize], lengths: &[usize]) -> Vec<(usize, HoleReport)> {
    slots
        .iter()
        .filter_map(|&i| {
            let m = corpus.get(i)?.graph.as_ref().ok()?;
            Some((i, odd_hole_report(m, lengths)))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyMatrix;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn corpus() -> GraphCorpus {
        GraphCorpus::from_matrices(
            5,
            vec![
                AdjacencyMatrix::cycle(5),
                AdjacencyMatrix::path(5),
                AdjacencyMatrix::complete(5),
            ],
        )
    }

    #[test]
    fn genuine_witnesses_verify() {
        let mut table = PermisTable::new(3, 5);
        table.set_row(0, &[2, 0, 1, 3, 4]);
        table.set_row(2, &[0, 1, 2, 3, 4]);
        let mut rng = XorShiftRng::seed_from_u64(1);
        let report = verify_table(&corpus(), &table, 100, &mut rng).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.verified, 2);
        assert_eq!(report.permisless, vec![1]);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn false_witnesses_are_reported_with_a_replacement() {
        let mut table = PermisTable::new(3, 5);
        // The identity is not a permis of C5, and a repeated entry is no word.
        table.set_row(0, &[0, 1, 2, 3, 4]);
        table.set_row(2, &[1, 1, 2, 3, 4]);
        let mut rng = XorShiftRng::seed_from_u64(2);
        let report = verify_table(&corpus(), &table, 1000, &mut rng).unwrap();
        assert!(!report.is_valid());
        let indices: Vec<usize> = report.false_witnesses.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(report.false_witnesses[0].row, vec![0, 1, 2, 3, 4]);
        let replacement = report.false_witnesses[0].replacement.as_ref().unwrap();
        assert!(is_permis(&AdjacencyMatrix::cycle(5), replacement));
    }

    #[test]
    fn shape_mismatches_are_errors() {
        let mut rng = XorShiftRng::seed_from_u64(3);
        let err = verify_table(&corpus(), &PermisTable::new(2, 5), 10, &mut rng).unwrap_err();
        assert!(matches!(err, TableError::RowCount { table: 2, corpus: 3 }));
        let err = verify_table(&corpus(), &PermisTable::new(3, 4), 10, &mut rng).unwrap_err();
        assert!(matches!(err, TableError::Width { table: 4, corpus: 5 }));
    }

    #[test]
    fn sixty_four_vertices_are_an_error() {
        let n = MAX_VERTICES;
        let corpus = GraphCorpus::from_matrices(n, vec![AdjacencyMatrix::empty(n)]);
        let mut table = PermisTable::new(1, n);
        table.set_row(0, &(0..n as u8).collect::<Vec<_>>());
        let mut rng = XorShiftRng::seed_from_u64(5);
        let err = verify_table(&corpus, &table, 1, &mut rng).unwrap_err();
        assert!(matches!(err, TableError::OrderTooLarge { n: 64 }));
    }

    #[test]
    fn rejected_lines_are_listed() {
        let corpus = GraphCorpus::from_reader("Dhc\nD h\n".as_bytes()).unwrap();
        let mut table = PermisTable::new(2, 5);
        table.set_row(0, &[2, 0, 1, 3, 4]);
        let mut rng = XorShiftRng::seed_from_u64(4);
        let report = verify_table(&corpus, &table, 10, &mut rng).unwrap();
        assert_eq!(report.verified, 1);
        assert_eq!(report.rejected, vec![1]);
        assert!(report.permisless.is_empty());
    }

    #[test]
    fn census_skips_rejected_and_missing_slots() {
        let corpus = GraphCorpus::from_reader("FhCKG\nF h\nFhCGG\n".as_bytes()).unwrap();
        let census = hole_census(&corpus, &[0, 1, 2, 9], &[5, 7]);
        assert_eq!(census.len(), 2);
        assert_eq!(census[0].0, 0);
        assert_eq!(census[0].1.holes, vec![7]);
        assert_eq!(census[1].0, 2);
        assert!(census[1].1.is_berge());
    }
}
