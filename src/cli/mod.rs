//! Command-line interface for pblast.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **search**: Find seeds for each query and rank their extended windows
//! - **model**: Print the per-position base distributions of a reference
//!
//! ## Usage
//!
//! ```text
//! # Run blastn and score every query
//! pblast search --reference ref.fa --confidence ref.prob --query reads.fa
//!
//! # Score pre-computed hits with early abort
//! pblast search -r ref.fa -c ref.prob -q reads.fa --hits hits.tsv --heuristic
//!
//! # JSON output for scripting
//! pblast search -r ref.fa -c ref.prob -q reads.fa --format json
//!
//! # Inspect the probability model
//! pblast model -r ref.fa -c ref.prob --format tsv
//! ```

use clap::{Parser, Subcommand};

pub mod model;
pub mod search;

#[derive(Parser)]
#[command(name = "pblast")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Re-score BLAST seeds against a reference with per-position confidence")]
#[command(
    long_about = "pblast extends BLAST seed matches to the full query length and scores each window by its log-likelihood under a reference whose bases are only known with some confidence.\n\nFor every query it reports:\n- The reference spans of all surviving windows, best first\n- The natural-log likelihood of each window (0 is a perfect, fully confident match)\n- How many windows were discarded early by the low-probability heuristic"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score seed matches of query sequences against an uncertain reference
    Search(search::SearchArgs),

    /// Print the positional probability model of a reference
    Model(model::ModelArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
