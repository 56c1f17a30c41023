//! Library-level pipeline tests: files in, ranked spans out.

use std::io::Write;

use pblast::matching::engine::{EngineError, ScoringConfig};
use pblast::parsing::{confidence, fasta, hits};
use pblast::search::{SeedSource, StaticSeeds};
use pblast::{HeuristicConfig, PositionalProbabilityModel, ScoringEngine, Span};
use tempfile::NamedTempFile;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_confident_exact_match_scores_zero() {
    let reference = temp_file(">ref\nATGC\n");
    let values = temp_file("1.0\n1.0\n1.0\n1.0\n");
    let queries = temp_file(">q\nATGC\n");
    let seeds = temp_file("q\t1\t4\t1\t4\n");

    let record = fasta::read_reference(reference.path()).unwrap();
    let values = confidence::parse_confidence_file(values.path()).unwrap();
    let model = PositionalProbabilityModel::build(&record.sequence, &values).unwrap();

    let queries = fasta::read_queries(queries.path()).unwrap();
    let source = StaticSeeds::from_hits(hits::parse_hits_file(seeds.path()).unwrap());
    let found = source.seeds(&queries[0]).unwrap();

    let engine = ScoringEngine::new(&model);
    let result = engine.score_seeds(&queries[0], &found).unwrap();

    let best = result.results.best().unwrap();
    assert_eq!(best.span, Span::new(0, 3));
    assert_eq!(best.score, 0.0);
}

#[test]
fn test_score_is_sum_of_log_probabilities() {
    let model = PositionalProbabilityModel::build(b"ATGC", &[0.9, 0.6, 1.0, 0.3]).unwrap();
    let query = fasta::parse_sequences(b">q\nATGA\n").unwrap();
    let query = pblast::QueryRecord::new(
        query[0].name.clone(),
        pblast::utils::validation::encode_sequence(&query[0].sequence).unwrap(),
    );

    let engine = ScoringEngine::new(&model);
    let result = engine
        .score_seeds(&query, &[pblast::SeedMatch::new(0, 1, 0, 1)])
        .unwrap();

    // Last position observed C at 0.3 confidence; A carries round(0.7 / 3, 3)
    let expected = 0.9f64.ln() + 0.6f64.ln() + 1.0f64.ln() + 0.233f64.ln();
    let best = result.results.best().unwrap();
    assert_eq!(best.span, Span::new(0, 3));
    assert!((best.score - expected).abs() < 1e-9, "{} != {expected}", best.score);
}

#[test]
fn test_batch_over_many_queries() {
    let reference = b"ATCGGGGGATGCGGGG";
    let model = PositionalProbabilityModel::build(reference, &[0.95; 16]).unwrap();
    let text = "q1\t1\t4\t9\t12\nq1\t1\t2\t1\t2\nq2\t1\t4\t5\t8\n";
    let source = StaticSeeds::from_hits(hits::parse_hits_text(text).unwrap());

    let queries = fasta::parse_sequences(b">q1\nATGC\n>q2\nGGGG\n>q3\nTTTT\n").unwrap();
    let requests: Vec<_> = queries
        .into_iter()
        .map(|record| {
            let symbols = pblast::utils::validation::encode_sequence(&record.sequence).unwrap();
            let query = pblast::QueryRecord::new(record.name, symbols);
            let seeds = source.seeds(&query).unwrap();
            (query, seeds)
        })
        .collect();

    let config = ScoringConfig {
        heuristic: HeuristicConfig::enabled(0.5, 2),
    };
    let engine = ScoringEngine::with_config(&model, config).unwrap();
    let results: Vec<_> = engine
        .score_batch(&requests)
        .into_iter()
        .collect::<Result<_, EngineError>>()
        .unwrap();

    assert_eq!(results.len(), 3);

    // q1: the 0..=3 window has two adjacent mismatches and is dropped
    assert_eq!(results[0].query_id, "q1");
    assert_eq!(results[0].stats.discarded, 1);
    assert_eq!(results[0].results.best().unwrap().span, Span::new(8, 11));

    assert_eq!(results[1].results.best().unwrap().span, Span::new(4, 7));
    assert!(results[2].results.is_empty());
}

#[test]
fn test_invalid_heuristic_rejected() {
    let model = PositionalProbabilityModel::build(b"ATGC", &[1.0; 4]).unwrap();
    let config = ScoringConfig {
        heuristic: HeuristicConfig::enabled(1.5, 3),
    };
    assert!(matches!(
        ScoringEngine::with_config(&model, config),
        Err(EngineError::Validation(_))
    ));
}
