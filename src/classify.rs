//! Two-phase batch classification of a corpus.
//!
//! Phase 1 runs the cheap probabilistic search on every graph. Phase 2 runs
//! the exhaustive search only on the graphs Phase 1 left without a witness,
//! which for realistic corpora is a small fraction. Both phases run on a
//! fixed-size rayon pool fed through crossbeam channels: the dispatcher sends
//! ranges of task positions, workers send back one `(position, result)` per
//! graph, and the dispatcher alone writes the table. A panic while searching
//! one graph is caught on the worker and only fails that graph.

use crate::bitstrings::StatusTable;
use crate::corpus::GraphCorpus;
use crate::error::ClassifyError;
use crate::graph::{AdjacencyMatrix, MAX_VERTICES};
use crate::graph6::write_graph6;
use crate::search::{find_permis, find_permis_whp, find_permis_whp_with, find_permis_with};
use crate::table::PermisTable;
use crossbeam::channel;
use dsi_progress_logger::prelude::*;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;
use std::io::{self, Write};
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// Largest order for which the `2^n` configurations are precomputed.
const STATUS_TABLE_MAX_ORDER: usize = 20;

// ============================================================================
// Configuration
// ============================================================================

/// Classifier configuration parameters.
#[derive(Clone, Debug)]
pub struct ClassifierConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Random words tried per graph in Phase 1 (after the identity).
    pub tries: usize,
    /// Graphs per dispatched chunk in Phase 1.
    pub phase1_chunk: usize,
    /// Graphs per dispatched chunk in Phase 2.
    pub phase2_chunk: usize,
    /// Optional deterministic base seed.
    pub seed: Option<u64>,
    /// Check the corpus size against the number of connected graphs.
    pub check_corpus_size: bool,
    /// Run Phase 2 on the graphs Phase 1 could not settle.
    pub exhaustive_fallback: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(std::num::NonZero::get)
                .unwrap_or(1),
            tries: 1000,
            phase1_chunk: 128,
            phase2_chunk: 1,
            seed: None,
            check_corpus_size: true,
            exhaustive_fallback: true,
        }
    }
}

impl ClassifierConfig {
    fn validate(&self) -> Result<(), ClassifyError> {
        if self.workers == 0 {
            return Err(ClassifyError::Config("workers must be at least 1".into()));
        }
        if self.phase1_chunk == 0 || self.phase2_chunk == 0 {
            return Err(ClassifyError::Config("chunk sizes must be at least 1".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// The search that produced a witness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Identity or random words.
    Probabilistic,
    /// Full sweep of all `n!` words.
    Exhaustive,
}

/// What the classifier established for one corpus slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowOutcome {
    /// The row holds a certified permis.
    Witness {
        /// Which phase found it.
        phase: Phase,
    },
    /// The probabilistic search found nothing and no exhaustive search ran.
    BudgetExhausted,
    /// The exhaustive search proved that the graph has no permis.
    NoPermisExists,
    /// The line did not decode; the row is zero.
    Rejected,
    /// The search panicked on this graph; the row is zero.
    Failed,
}

/// Outcome counts of a classification run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Corpus slots, rejected lines included.
    pub slots: usize,
    /// Witnesses found in Phase 1.
    pub probabilistic: usize,
    /// Witnesses found in Phase 2.
    pub exhaustive: usize,
    /// Graphs proven to have no permis.
    pub permisless: usize,
    /// Graphs left unsettled by Phase 1 alone.
    pub budget_exhausted: usize,
    /// Lines that did not decode.
    pub rejected: usize,
    /// Graphs whose search panicked.
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} slots: {} witnesses in phase 1, {} in phase 2, {} permisless, {} unsettled, {} rejected, {} failed",
            self.slots,
            self.probabilistic,
            self.exhaustive,
            self.permisless,
            self.budget_exhausted,
            self.rejected,
            self.failed
        )
    }
}

/// The permis table of a corpus together with how each row was settled.
#[derive(Clone, Debug)]
pub struct Classification {
    table: PermisTable,
    outcomes: Vec<RowOutcome>,
    seed: u64,
}

impl Classification {
    /// Returns the permis table.
    pub fn table(&self) -> &PermisTable {
        &self.table
    }

    /// Returns the permis table, consuming the classification.
    pub fn into_table(self) -> PermisTable {
        self.table
    }

    /// Returns the outcome of every slot.
    pub fn outcomes(&self) -> &[RowOutcome] {
        &self.outcomes
    }

    /// Returns the base seed the random streams were derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Iterates over the slots proven to have no permis.
    pub fn permisless(&self) -> impl Iterator<Item = usize> + '_ {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| **o == RowOutcome::NoPermisExists)
            .map(|(i, _)| i)
    }

    /// Writes the graphs proven to have no permis to `w` as graph6 lines, in
    /// slot order, and returns how many were written.
    ///
    /// `corpus` must be the corpus this classification was computed from.
    ///
    /// # Errors
    /// Propagates any error of the underlying writer.
    pub fn write_permisless<W: Write>(&self, corpus: &GraphCorpus, w: W) -> io::Result<usize> {
        let graphs = self
            .permisless()
            .filter_map(|i| corpus.get(i).and_then(|e| e.graph.as_ref().ok()));
        write_graph6(w, graphs)
    }

    /// Counts the outcomes.
    pub fn summary(&self) -> Summary {
        let mut s = Summary {
            slots: self.outcomes.len(),
            ..Summary::default()
        };
        for outcome in &self.outcomes {
            match outcome {
                RowOutcome::Witness {
                    phase: Phase::Probabilistic,
                } => s.probabilistic += 1,
                RowOutcome::Witness {
                    phase: Phase::Exhaustive,
                } => s.exhaustive += 1,
                RowOutcome::NoPermisExists => s.permisless += 1,
                RowOutcome::BudgetExhausted => s.budget_exhausted += 1,
                RowOutcome::Rejected => s.rejected += 1,
                RowOutcome::Failed => s.failed += 1,
            }
        }
        s
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Classifies every graph of `corpus`.
///
/// Each graph's random stream is derived from the base seed and the graph's
/// slot index, so the table depends only on the seed, never on the number of
/// workers or the chunk sizes.
///
/// # Errors
/// Returns an error if the configuration is invalid, the corpus fails the
/// size check (when enabled), its order is too large to enumerate, or the
/// thread pool cannot be built.
pub fn classify(corpus: &GraphCorpus, cfg: &ClassifierConfig) -> Result<Classification, ClassifyError> {
    cfg.validate()?;
    let n = corpus.n();
    if n >= MAX_VERTICES {
        return Err(ClassifyError::Config(format!(
            "cannot enumerate the 2^{n} configurations of {n}-vertex graphs"
        )));
    }
    if cfg.check_corpus_size {
        corpus.check_size()?;
    }

    let pool = ThreadPoolBuilder::new().num_threads(cfg.workers).build()?;
    let statuses = (n <= STATUS_TABLE_MAX_ORDER).then(|| StatusTable::new(n));
    let base_seed = cfg.seed.unwrap_or_else(rand::random);
    info!(
        "Classifying {} graphs on {n} vertices with {} workers (seed {base_seed:#x})",
        corpus.len(),
        cfg.workers
    );

    let mut table = PermisTable::new(corpus.len(), n);
    let mut outcomes = vec![RowOutcome::Rejected; corpus.len()];

    // Phase 1
    let tasks: Vec<(usize, &AdjacencyMatrix)> = corpus.graphs().collect();
    let mut pl = progress_logger![item_name = "graph", expected_updates = Some(tasks.len())];
    pl.start(format!("Phase 1: probabilistic search with {} tries...", cfg.tries));
    dispatch(
        &pool,
        &tasks,
        cfg.phase1_chunk,
        |&(i, m)| {
            let mut rng = SmallRng::seed_from_u64(slot_seed(base_seed, i));
            match &statuses {
                Some(statuses) => find_permis_whp_with(statuses, m, cfg.tries, &mut rng),
                None => find_permis_whp(m, cfg.tries, &mut rng),
            }
        },
        |pos, result| {
            let i = tasks[pos].0;
            outcomes[i] = match result {
                Ok(Some(word)) => {
                    table.set_row(i, &word);
                    RowOutcome::Witness {
                        phase: Phase::Probabilistic,
                    }
                }
                Ok(None) => RowOutcome::BudgetExhausted,
                Err(_) => {
                    warn!("Probabilistic search panicked on graph {i}");
                    RowOutcome::Failed
                }
            };
            pl.light_update();
        },
    );
    pl.done();

    // Phase 2
    let unsettled: Vec<(usize, &AdjacencyMatrix)> = tasks
        .iter()
        .copied()
        .filter(|&(i, _)| !matches!(outcomes[i], RowOutcome::Witness { .. }))
        .collect();
    info!(
        "Phase 1 settled {} of {} graphs; {} left for exhaustive search",
        tasks.len() - unsettled.len(),
        tasks.len(),
        unsettled.len()
    );

    if cfg.exhaustive_fallback && !unsettled.is_empty() {
        let mut pl = progress_logger![item_name = "graph", expected_updates = Some(unsettled.len())];
        pl.start("Phase 2: exhaustive search...");
        dispatch(
            &pool,
            &unsettled,
            cfg.phase2_chunk,
            |&(_, m)| match &statuses {
                Some(statuses) => find_permis_with(statuses, m),
                None => find_permis(m),
            },
            |pos, result| {
                let i = unsettled[pos].0;
                outcomes[i] = match result {
                    Ok(Some(word)) => {
                        debug!("Graph {i}: exhaustive witness {word}");
                        table.set_row(i, &word);
                        RowOutcome::Witness {
                            phase: Phase::Exhaustive,
                        }
                    }
                    Ok(None) => {
                        debug!("Graph {i}: no permis");
                        table.clear_row(i);
                        RowOutcome::NoPermisExists
                    }
                    Err(_) => {
                        warn!("Exhaustive search panicked on graph {i}");
                        table.clear_row(i);
                        RowOutcome::Failed
                    }
                };
                pl.update();
            },
        );
        pl.done();
    }

    let classification = Classification {
        table,
        outcomes,
        seed: base_seed,
    };
    info!("{}", classification.summary());
    Ok(classification)
}

// ============================================================================
// Dispatch
// ============================================================================

/// Runs `work` on every task on `pool` and hands each result to `absorb`.
///
/// Tasks are sent in ranges of `chunk` positions over a bounded channel;
/// results come back tagged with their position on an unbounded one, in any
/// order. `absorb` runs on the calling thread only. A panic inside `work` is
/// delivered to `absorb` as an `Err` for that task alone.
fn dispatch<T, R, F, A>(pool: &ThreadPool, tasks: &[T], chunk: usize, work: F, mut absorb: A)
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
    A: FnMut(usize, thread::Result<R>),
{
    if tasks.is_empty() {
        return;
    }
    let chunk = chunk.max(1);
    let num_threads = pool.current_num_threads().min(tasks.len().div_ceil(chunk)).max(1);

    let (task_tx, task_rx) = channel::bounded::<Range<usize>>(2 * num_threads);
    let (result_tx, result_rx) = channel::unbounded::<(usize, thread::Result<R>)>();

    pool.in_place_scope(|scope| {
        for _ in 0..num_threads {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let work = &work;
            scope.spawn(move |_| {
                for range in task_rx {
                    for pos in range {
                        let result = panic::catch_unwind(AssertUnwindSafe(|| work(&tasks[pos])));
                        if result_tx.send((pos, result)).is_err() {
                            return;
                        }
                    }
                }
            });
        }
        // The workers hold their own clones.
        drop(task_rx);
        drop(result_tx);

        let mut start = 0;
        while start < tasks.len() {
            let end = (start + chunk).min(tasks.len());
            if task_tx.send(start..end).is_err() {
                break;
            }
            start = end;
            for (pos, result) in result_rx.try_iter() {
                absorb(pos, result);
            }
        }
        drop(task_tx);
        for (pos, result) in result_rx {
            absorb(pos, result);
        }
    });
}

/// Seed of the random stream of slot `i`: the base seed and the slot index
/// pushed through one SplitMix64 step.
#[inline]
fn slot_seed(base_seed: u64, i: usize) -> u64 {
    let mut z = (base_seed ^ i as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Tests
// ============================================================================
