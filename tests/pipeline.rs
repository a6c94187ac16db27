use anyhow::Result;
use permis::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::Write;

/// All 6 connected graphs on 4 vertices.
const CONNECTED_4: &[&str] = &["Cs", "Cq", "C{", "Cr", "C}", "C~"];

/// All 21 connected graphs on 5 vertices.
const CONNECTED_5: &[&str] = &[
    "Ds_", "DsO", "DqG", "D{_", "D{O", "D{C", "DsW", "DqK", "D}_", "D{c", "D}G", "D{S", "Ds[", "D}o", "D~_", "D}g",
    "D}K", "D~o", "D}k", "D~w", "D~{",
];

fn write_corpus(lines: &[&str]) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    file.flush()?;
    Ok(file)
}

fn config(seed: u64) -> ClassifierConfig {
    ClassifierConfig {
        workers: 2,
        seed: Some(seed),
        check_corpus_size: false,
        ..ClassifierConfig::default()
    }
}

#[test]
fn seven_vertex_file_end_to_end() -> Result<()> {
    // C7, a blank line, P7, a corrupt line, K7, the star K_{1,6}.
    let file = write_corpus(&["FhCKG", "", "FhCGG", "F~ ~w", "F~~~w", "FsaC?"])?;
    let corpus = GraphCorpus::open(file.path())?;
    assert_eq!(corpus.n(), 7);
    assert_eq!(corpus.len(), 5);
    assert_eq!(corpus.rejected().map(|(i, _)| i).collect::<Vec<_>>(), vec![2]);
    assert_eq!(corpus.get(2).map(|e| e.line), Some(4));

    let classification = classify(&corpus, &config(7))?;
    let table = classification.table();
    assert_eq!(table.rows(), 5);
    assert_eq!(table.n(), 7);

    let outcomes = classification.outcomes();
    assert_eq!(outcomes[0], RowOutcome::NoPermisExists);
    assert_eq!(outcomes[2], RowOutcome::Rejected);
    assert!(matches!(outcomes[1], RowOutcome::Witness { .. }));
    assert!(matches!(outcomes[3], RowOutcome::Witness { .. }));
    assert!(matches!(outcomes[4], RowOutcome::Witness { .. }));
    assert!(table.is_zero_row(0));
    assert!(table.is_zero_row(2));

    // Slots line up with the decoded graphs.
    assert!(is_permis(&AdjacencyMatrix::path(7), table.row(1)));
    assert!(is_permis(&AdjacencyMatrix::complete(7), table.row(3)));
    let star = AdjacencyMatrix::from_edges(7, &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6)]);
    assert!(is_permis(&star, table.row(4)));

    let dir = tempfile::tempdir()?;
    let path = dir.path().join(file_name(corpus.n()));
    table.save(&path)?;
    assert_eq!(std::fs::metadata(&path)?.len(), 35);
    let loaded = PermisTable::load(&path, corpus.n())?;
    assert_eq!(&loaded, table);

    let g6_path = dir.path().join(permisless_file_name(corpus.n()));
    let written = classification.write_permisless(&corpus, std::fs::File::create(&g6_path)?)?;
    assert_eq!(written, 1);
    assert_eq!(std::fs::read(&g6_path)?, b"FhCKG\n");
    let permisless = GraphCorpus::open(&g6_path)?;
    assert_eq!(permisless.graphs().count(), 1);

    let mut rng = SmallRng::seed_from_u64(1);
    let report = verify_table(&corpus, &loaded, 100, &mut rng)?;
    assert!(report.is_valid());
    assert_eq!(report.verified, 3);
    assert_eq!(report.permisless, vec![0]);
    assert_eq!(report.rejected, vec![2]);

    let census = hole_census(&corpus, &report.permisless, &[5, 7]);
    assert_eq!(census.len(), 1);
    assert_eq!(census[0].1.holes, vec![7]);
    Ok(())
}

#[test]
fn corrupted_table_fails_verification() -> Result<()> {
    let file = write_corpus(CONNECTED_5)?;
    let corpus = GraphCorpus::open(file.path())?;
    let mut table = classify(&corpus, &config(3))?.into_table();
    // Find a graph whose identity is not a permis and store it anyway.
    let bad = corpus
        .graphs()
        .find(|(_, m)| !is_permis(m, &Word::identity(5)))
        .map(|(i, _)| i)
        .expect("some connected 5-vertex graph needs a non-identity word");
    table.set_row(bad, &Word::identity(5));

    let mut rng = SmallRng::seed_from_u64(2);
    let report = verify_table(&corpus, &table, 500, &mut rng)?;
    assert!(!report.is_valid());
    assert_eq!(report.false_witnesses.len(), 1);
    assert_eq!(report.false_witnesses[0].index, bad);
    assert!(report.false_witnesses[0].replacement.is_some());
    Ok(())
}

#[test]
fn complete_corpora_pass_the_size_check() -> Result<()> {
    for (n, lines) in [(4, CONNECTED_4), (5, CONNECTED_5)] {
        let file = write_corpus(lines)?;
        let corpus = GraphCorpus::open(file.path())?;
        assert_eq!(corpus.n(), n);
        assert_eq!(Some(corpus.len() as u128), connected_graph_count(n));

        let cfg = ClassifierConfig {
            check_corpus_size: true,
            ..config(11)
        };
        let classification = classify(&corpus, &cfg)?;
        // Every connected graph on at most 5 vertices has a permis.
        assert_eq!(classification.summary().permisless, 0);
        for (i, m) in corpus.graphs() {
            let word = classification.table().witness(i).expect("witness row");
            assert!(is_permis(m, word));
        }
    }
    Ok(())
}

#[test]
fn missing_graph_fails_the_size_check() -> Result<()> {
    let file = write_corpus(&CONNECTED_5[1..])?;
    let corpus = GraphCorpus::open(file.path())?;
    let cfg = ClassifierConfig {
        check_corpus_size: true,
        ..config(0)
    };
    let err = classify(&corpus, &cfg).unwrap_err();
    assert!(matches!(
        err,
        ClassifyError::Corpus(CorpusError::SizeMismatch {
            n: 5,
            expected: 21,
            got: 20
        })
    ));
    Ok(())
}

#[test]
fn hybrid_table_matches_exhaustive_search() -> Result<()> {
    let file = write_corpus(CONNECTED_5)?;
    let corpus = GraphCorpus::open(file.path())?;
    for tries in [0, 10] {
        let cfg = ClassifierConfig { tries, ..config(5) };
        let classification = classify(&corpus, &cfg)?;
        for (i, m) in corpus.graphs() {
            assert_eq!(
                classification.table().witness(i).is_some(),
                find_permis(m).is_some(),
                "graph {i}"
            );
        }
    }
    Ok(())
}

#[test]
fn graph6_fixtures_round_trip_through_a_file() -> Result<()> {
    let file = write_corpus(CONNECTED_5)?;
    let corpus = GraphCorpus::open(file.path())?;
    for ((_, m), line) in corpus.graphs().zip(CONNECTED_5) {
        assert_eq!(encode_graph6(m), line.as_bytes());
        assert!(m.edge_count() >= 4, "connected graphs on 5 vertices have at least 4 edges");
    }
    Ok(())
}
