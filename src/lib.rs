//! # Permis
//!
//! Classifies small graphs by whether they have a *permis*: a vertex order
//! under which the sequential rule "a vertex is active iff none of its
//! neighbors is active" reaches a fixed point after a single round, whatever
//! the starting configuration.
//!
//! This crate provides:
//! - `u64` bitset adjacency matrices and a graph6 codec.
//! - Cursor-style enumerators for the `2^n` starting configurations and the
//!   `n!` vertex orders (minimal-change order, identity first).
//! - The one-round stabilization test and exhaustive / probabilistic searches.
//! - A two-phase parallel batch classifier producing a raw permis table.
//! - Table verification and an odd hole / antihole census of permisless graphs.
//!
//! ## Quick Start
//!
//! ```
//! use permis::prelude::*;
//!
//! let c5 = decode_graph6(b"Dhc").unwrap();
//! let word = find_permis(&c5).expect("C5 has a permis");
//! assert!(is_permis(&c5, &word));
//!
//! let c7 = decode_graph6(b"FhCKG").unwrap();
//! assert_eq!(find_permis(&c7), None);
//! ```
//!
//! ## Classifying a Corpus
//!
//! ```no_run
//! use permis::prelude::*;
//!
//! let corpus = GraphCorpus::open("graph7c.g6").unwrap();
//! let cfg = ClassifierConfig {
//!     seed: Some(12345),
//!     ..Default::default()
//! };
//! let classification = classify(&corpus, &cfg).unwrap();
//! classification.table().save(file_name(corpus.n())).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Adjacency matrices as neighbor bitsets.
//! - [`graph6`]: graph6 decoding and encoding.
//! - [`bitstrings`]: Status vectors and their enumeration.
//! - [`permutations`]: Words and the Ehrlich generator.
//! - [`dynamics`]: The activation rule and the permis test.
//! - [`search`]: Exhaustive and probabilistic permis search.
//! - [`corpus`]: graph6 corpora and the connected-graph size oracle.
//! - [`table`]: The permis table and its raw file format.
//! - [`classify`]: The two-phase parallel classifier.
//! - [`induced`]: Induced holes and antiholes.
//! - [`verify`]: Table verification and hole census.
//!
//! ## Performance Notes
//!
//! - The graph representation uses `u64` bitsets, limiting graphs to 64 vertices;
//!   enumerating configurations limits the permis test to 63.
//! - A permis test is at most `2^n` rounds of `n` bit operations each; the
//!   exhaustive search multiplies that by up to `n!`.
//! - For maximum performance, compile with: `RUSTFLAGS="-C target-cpu=native" cargo build --release`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::needless_range_loop)] // Often clearer for matrix indexing
#![allow(clippy::doc_markdown)] // LaTeX-style notation in docs
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod bitstrings;
pub mod classify;
pub mod corpus;
pub mod dynamics;
pub mod error;
pub mod graph;
pub mod graph6;
pub mod induced;
pub mod permutations;
pub mod search;
pub mod table;
pub mod verify;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::bitstrings::{Bitstrings, StatusTable, StatusVector};
    pub use crate::classify::{classify, Classification, ClassifierConfig, Phase, RowOutcome, Summary};
    pub use crate::corpus::{connected_graph_count, GraphCorpus};
    pub use crate::dynamics::{apply_round, is_permis, is_permis_with, settles_from};
    pub use crate::error::{ClassifyError, CorpusError, Graph6Error, TableError};
    pub use crate::graph::AdjacencyMatrix;
    pub use crate::graph6::{decode_graph6, encode_graph6, write_graph6};
    pub use crate::induced::{has_induced_antihole, has_induced_cycle, is_cycle, odd_hole_report, HoleReport};
    pub use crate::permutations::{Ehrlich, PermutationTable, Word};
    pub use crate::search::{find_permis, find_permis_whp, has_permis, has_permis_whp, permis_count};
    pub use crate::table::{file_name, permisless_file_name, PermisTable};
    pub use crate::verify::{hole_census, verify_table, VerificationReport};
}
