use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use permis::induced::odd_lengths_up_to;
use permis::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "permis", version, about = "Finds permises of small graphs.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classifies every graph of a graph6 file and writes the permis table.
    Classify {
        /// The graph6 file, one graph per line, all on the same vertex count.
        g6: PathBuf,
        /// Directory receiving `permises_for_g{n}c.bin`.
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Worker threads (default: available parallelism).
        #[arg(long)]
        workers: Option<usize>,
        /// Random words tried per graph before falling back to exhaustive search.
        #[arg(long, default_value_t = 1000)]
        tries: usize,
        /// Graphs per task chunk in the probabilistic phase.
        #[arg(long, default_value_t = 128)]
        chunk: usize,
        /// Graphs per task chunk in the exhaustive phase.
        #[arg(long, default_value_t = 1)]
        phase2_chunk: usize,
        /// Deterministic base seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the connected-graph count check.
        #[arg(long)]
        no_size_check: bool,
        /// Also write the permisless graphs to `permisless_g{n}c.g6`.
        #[arg(long)]
        write_g6: bool,
    },
    /// Re-checks every row of a permis table against its graph6 file.
    Verify {
        /// The graph6 file the table was computed from.
        g6: PathBuf,
        /// The permis table.
        table: PathBuf,
        /// Random words tried when looking for a replacement of a false witness.
        #[arg(long, default_value_t = 500)]
        tries: usize,
        /// Deterministic seed.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Reports odd holes and antiholes of the permisless graphs of a table.
    Holes {
        /// The graph6 file the table was computed from.
        g6: PathBuf,
        /// The permis table.
        table: PathBuf,
        /// Cycle lengths to look for (default: odd lengths from 5 to n).
        #[arg(long, value_delimiter = ',')]
        lengths: Option<Vec<usize>>,
    },
    /// Decodes one graph6 string and searches it for a permis.
    Check {
        /// A graph6 string.
        g6: String,
    },
}

fn init_env_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> Result<()> {
    init_env_logger();
    match Cli::parse().command {
        Command::Classify {
            g6,
            out,
            workers,
            tries,
            chunk,
            phase2_chunk,
            seed,
            no_size_check,
            write_g6,
        } => {
            let mut cfg = ClassifierConfig {
                tries,
                phase1_chunk: chunk,
                phase2_chunk,
                seed,
                check_corpus_size: !no_size_check,
                ..ClassifierConfig::default()
            };
            if let Some(workers) = workers {
                cfg.workers = workers;
            }
            classify_file(&g6, &out, &cfg, write_g6)
        }
        Command::Verify { g6, table, tries, seed } => verify_file(&g6, &table, tries, seed),
        Command::Holes { g6, table, lengths } => holes(&g6, &table, lengths),
        Command::Check { g6 } => check(&g6),
    }
}

fn classify_file(g6: &Path, out: &Path, cfg: &ClassifierConfig, write_g6: bool) -> Result<()> {
    let corpus = GraphCorpus::open(g6).with_context(|| format!("Could not load {}", g6.display()))?;
    let classification = classify(&corpus, cfg)?;

    std::fs::create_dir_all(out).with_context(|| format!("Could not create {}", out.display()))?;
    let path = out.join(file_name(corpus.n()));
    classification
        .table()
        .save(&path)
        .with_context(|| format!("Could not write {}", path.display()))?;
    info!("Permis table written to {}", path.display());

    if write_g6 {
        let path = out.join(permisless_file_name(corpus.n()));
        let file = File::create(&path).with_context(|| format!("Could not create {}", path.display()))?;
        let count = classification
            .write_permisless(&corpus, BufWriter::new(file))
            .with_context(|| format!("Could not write {}", path.display()))?;
        info!("{count} permisless graphs written to {}", path.display());
    }

    println!("{}", classification.summary());
    for i in classification.permisless() {
        println!("permisless: graph {i} (line {})", corpus.entries()[i].line);
    }
    Ok(())
}

fn load(g6: &Path, table: &Path) -> Result<(GraphCorpus, PermisTable)> {
    let corpus = GraphCorpus::open(g6).with_context(|| format!("Could not load {}", g6.display()))?;
    let table = PermisTable::load(table, corpus.n())
        .with_context(|| format!("Could not load permis table {}", table.display()))?;
    Ok((corpus, table))
}

fn verify_file(g6: &Path, table_path: &Path, tries: usize, seed: Option<u64>) -> Result<()> {
    let (corpus, table) = load(g6, table_path)?;
    let mut rng = SmallRng::seed_from_u64(seed.unwrap_or_else(rand::random));
    let report = verify_table(&corpus, &table, tries, &mut rng)?;

    println!(
        "{} verified, {} false, {} permisless, {} rejected",
        report.verified,
        report.false_witnesses.len(),
        report.permisless.len(),
        report.rejected.len()
    );
    for f in &report.false_witnesses {
        match &f.replacement {
            Some(word) => println!("graph {}: {:?} is not a permis; {word} is", f.index, f.row),
            None => println!("graph {}: {:?} is not a permis; none found", f.index, f.row),
        }
    }
    if !report.is_valid() {
        bail!("{} false witnesses in {}", report.false_witnesses.len(), table_path.display());
    }
    Ok(())
}

fn holes(g6: &Path, table_path: &Path, lengths: Option<Vec<usize>>) -> Result<()> {
    let (corpus, table) = load(g6, table_path)?;
    ensure!(
        table.rows() == corpus.len(),
        TableError::RowCount {
            table: table.rows(),
            corpus: corpus.len(),
        }
    );
    let lengths = lengths.unwrap_or_else(|| odd_lengths_up_to(corpus.n()));
    let slots: Vec<usize> = corpus
        .graphs()
        .map(|(i, _)| i)
        .filter(|&i| table.witness(i).is_none())
        .collect();
    info!("Checking {} permisless graphs for lengths {lengths:?}", slots.len());

    let census = hole_census(&corpus, &slots, &lengths);
    let mut berge = 0;
    for (i, report) in &census {
        if report.is_berge() {
            berge += 1;
            println!("graph {i}: no odd hole or antihole");
        } else {
            println!("graph {i}: holes {:?}, antiholes {:?}", report.holes, report.antiholes);
        }
    }
    println!("{} permisless graphs, {berge} without odd holes or antiholes", census.len());
    Ok(())
}

fn check(line: &str) -> Result<()> {
    let m = decode_graph6(line.trim().as_bytes()).with_context(|| format!("Could not decode {line:?}"))?;
    ensure!(m.n() < 64, "cannot enumerate the configurations of {} vertices", m.n());
    print!("{m}");
    match find_permis(&m) {
        Some(word) => println!("first permis: {word}"),
        None => println!("no permis"),
    }
    println!("permises: {}", permis_count(&m));
    Ok(())
}
