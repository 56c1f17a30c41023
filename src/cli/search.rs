//! Search command - seed, extend, score and rank every query.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::model::load_model;
use crate::cli::OutputFormat;
use crate::config::PipelineConfig;
use crate::core::types::{QueryRecord, SeedMatch};
use crate::matching::engine::{QueryResult, ScoringEngine};
use crate::parsing::{fasta, hits};
use crate::search::blastn::{BlastTools, BlastnSearch};
use crate::search::{SeedSource, StaticSeeds};

#[derive(Args)]
pub struct SearchArgs {
    /// Reference FASTA file (first record is used)
    #[arg(short, long, required = true)]
    pub reference: PathBuf,

    /// Confidence file with one probability per reference base
    #[arg(short, long, required = true)]
    pub confidence: PathBuf,

    /// Query FASTA file (every record is scored)
    #[arg(short, long, required = true)]
    pub query: PathBuf,

    /// Pre-computed BLAST tabular hits; skips running blastn
    #[arg(long)]
    pub hits: Option<PathBuf>,

    /// JSON configuration file (heuristic and blast sections)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of ranked spans to show per query (all by default)
    #[arg(short = 'n', long)]
    pub max_hits: Option<usize>,

    // === Heuristic options ===
    /// Discard windows with a run of low-probability positions
    #[arg(long)]
    pub heuristic: bool,

    /// Probability below which a position counts as low
    #[arg(long)]
    pub low_probability: Option<f64>,

    /// Number of consecutive low positions that discards a window
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_low_run: Option<u32>,

    // === blastn options ===
    /// blastn word size
    #[arg(long, value_parser = clap::value_parser!(u32).range(4..))]
    pub word_size: Option<u32>,

    /// blastn expectation value threshold
    #[arg(long)]
    pub evalue: Option<f64>,

    /// Path to the blastn executable
    #[arg(long, default_value = "blastn")]
    pub blastn: PathBuf,

    /// Path to the makeblastdb executable
    #[arg(long, default_value = "makeblastdb")]
    pub makeblastdb: PathBuf,
}

impl SearchArgs {
    /// Configuration file values with command-line overrides applied
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if self.heuristic {
            config.heuristic.enabled = true;
        }
        if let Some(threshold) = self.low_probability {
            config.heuristic.low_probability_threshold = threshold;
        }
        if let Some(run) = self.max_low_run {
            config.heuristic.consecutive_low_count_threshold = run as usize;
        }
        if let Some(word_size) = self.word_size {
            config.blast.word_size = word_size;
        }
        if let Some(evalue) = self.evalue {
            config.blast.evalue = evalue;
        }

        config
            .heuristic
            .validate()
            .context("Invalid heuristic settings")?;

        Ok(config)
    }
}

/// Execute the search command
///
/// # Errors
///
/// Returns an error if inputs cannot be parsed, the search tool fails, or a
/// seed falls outside its query or the reference.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SearchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.pipeline_config()?;
    let (reference, model) = load_model(&args.reference, &args.confidence)?;
    let queries = fasta::read_queries(&args.query)
        .with_context(|| format!("Failed to read queries from {}", args.query.display()))?;

    if verbose {
        eprintln!(
            "Reference {}: {} bp; {} queries",
            reference.name,
            model.len(),
            queries.len()
        );
        if config.heuristic.enabled {
            eprintln!(
                "Heuristic: discard after {} consecutive positions below {}",
                config.heuristic.consecutive_low_count_threshold,
                config.heuristic.low_probability_threshold
            );
        }
    }

    let source: Box<dyn SeedSource> = match &args.hits {
        Some(path) => {
            let hits = hits::parse_hits_file(path)
                .with_context(|| format!("Failed to read hits from {}", path.display()))?;
            Box::new(StaticSeeds::from_hits(hits))
        }
        None => {
            let tools = BlastTools {
                blastn: args.blastn.clone(),
                makeblastdb: args.makeblastdb.clone(),
            };
            Box::new(BlastnSearch::with_tools(
                &reference,
                config.blast.clone(),
                tools,
            )?)
        }
    };

    let requests = collect_seeds(source.as_ref(), queries)?;
    if verbose {
        let total: usize = requests.iter().map(|(_, seeds)| seeds.len()).sum();
        eprintln!("Collected {total} seeds from {}", source.name());
    }

    let engine = ScoringEngine::with_config(&model, config.scoring())?;
    let results = engine
        .score_batch(&requests)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let limit = args.max_hits.unwrap_or(usize::MAX);
    match format {
        OutputFormat::Text => print_text(&results, &requests, limit),
        OutputFormat::Json => print_json(&results, &requests, limit)?,
        OutputFormat::Tsv => print_tsv(&results, limit),
    }

    Ok(())
}

/// Ask the seed source for every query, in input order
fn collect_seeds(
    source: &dyn SeedSource,
    queries: Vec<QueryRecord>,
) -> anyhow::Result<Vec<(QueryRecord, Vec<SeedMatch>)>> {
    queries
        .into_iter()
        .map(|query| {
            let seeds = source.seeds(&query)?;
            Ok::<_, anyhow::Error>((query, seeds))
        })
        .collect()
}

fn print_text(results: &[QueryResult], requests: &[(QueryRecord, Vec<SeedMatch>)], limit: usize) {
    for (result, (query, _)) in results.iter().zip(requests) {
        println!(
            "\nQuery {} ({} bp): {} seeds, {} discarded, {} spans",
            result.query_id,
            query.len(),
            result.stats.seeds,
            result.stats.discarded,
            result.results.len()
        );

        let Some(best) = result.results.best() else {
            println!("   No surviving match");
            continue;
        };
        println!("   Best: {}  score {:.4}", best.span, best.score);

        println!("\n   {:>4}  {:<21}  {:>12}", "#", "reference span", "score");
        for (rank, hit) in result.results.top(limit).iter().enumerate() {
            println!(
                "   {:>4}  {:<21}  {:>12.4}",
                rank + 1,
                hit.span.to_string(),
                hit.score
            );
        }
    }
}

fn print_json(
    results: &[QueryResult],
    requests: &[(QueryRecord, Vec<SeedMatch>)],
    limit: usize,
) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = results
        .iter()
        .zip(requests)
        .map(|(result, (query, _))| {
            let ranked: Vec<serde_json::Value> = result
                .results
                .top(limit)
                .iter()
                .map(|hit| {
                    serde_json::json!({
                        "start": hit.span.start,
                        "end": hit.span.end,
                        "score": hit.score,
                    })
                })
                .collect();

            serde_json::json!({
                "query": result.query_id,
                "length": query.len(),
                "stats": result.stats,
                "best": result.results.best(),
                "hits": ranked,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(results: &[QueryResult], limit: usize) {
    println!("query\trank\tref_start\tref_end\tscore");
    for result in results {
        for (rank, hit) in result.results.top(limit).iter().enumerate() {
            println!(
                "{}\t{}\t{}\t{}\t{:.6}",
                result.query_id,
                rank + 1,
                hit.span.start,
                hit.span.end,
                hit.score
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SearchArgs,
    }

    fn parse(extra: &[&str]) -> SearchArgs {
        let mut argv = vec!["pblast", "-r", "ref.fa", "-c", "ref.prob", "-q", "q.fa"];
        argv.extend_from_slice(extra);
        TestCli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_default_config() {
        let config = parse(&[]).pipeline_config().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let config = parse(&[
            "--heuristic",
            "--low-probability",
            "0.2",
            "--max-low-run",
            "5",
            "--word-size",
            "7",
        ])
        .pipeline_config()
        .unwrap();

        assert!(config.heuristic.enabled);
        assert!((config.heuristic.low_probability_threshold - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.heuristic.consecutive_low_count_threshold, 5);
        assert_eq!(config.blast.word_size, 7);
    }

    #[test]
    fn test_invalid_threshold_rejected_before_search() {
        let err = parse(&["--heuristic", "--low-probability", "1.5"])
            .pipeline_config()
            .unwrap_err();
        assert!(format!("{err:#}").contains("Low-probability threshold 1.5"));
    }

    #[test]
    fn test_zero_run_rejected() {
        let argv = [
            "pblast", "-r", "ref.fa", "-c", "ref.prob", "-q", "q.fa", "--max-low-run", "0",
        ];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_collect_seeds_keeps_order() {
        use crate::core::types::Nucleotide;
        use crate::parsing::hits::Hit;

        let source = StaticSeeds::from_hits(vec![
            Hit {
                query_id: Some("b".to_string()),
                seed: SeedMatch::new(0, 1, 2, 3),
            },
            Hit {
                query_id: Some("a".to_string()),
                seed: SeedMatch::new(0, 1, 4, 5),
            },
        ]);
        let queries = vec![
            QueryRecord::new("a", vec![Nucleotide::A; 2]),
            QueryRecord::new("b", vec![Nucleotide::A; 2]),
        ];

        let requests = collect_seeds(&source, queries).unwrap();
        assert_eq!(requests[0].0.id, "a");
        assert_eq!(requests[0].1, vec![SeedMatch::new(0, 1, 4, 5)]);
        assert_eq!(requests[1].1, vec![SeedMatch::new(0, 1, 2, 3)]);
    }
}
