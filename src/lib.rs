//! # pblast
//!
//! Scores BLAST seed matches against a reference sequence whose bases are
//! only known with some confidence.
//!
//! Each reference position carries the observed base and a probability that
//! the observation is correct; the remaining mass is spread evenly over the
//! other three bases. Seeds reported by `blastn` are extended without gaps to
//! the full query length, and every extended window is scored by the sum of
//! natural-log probabilities of the query bases under that model.
//!
//! ## Features
//!
//! - **Positional probability model**: a 4-way distribution per reference base
//! - **Seed extension**: ungapped, clamped at both sequence ends
//! - **Log-likelihood scoring**: with an optional early-abort heuristic for
//!   runs of low-probability positions
//! - **Ranked results**: one score per reference span, best first
//!
//! ## Example
//!
//! ```rust
//! use pblast::{PositionalProbabilityModel, QueryRecord, ScoringEngine, SeedMatch};
//! use pblast::utils::validation::encode_sequence;
//!
//! let model = PositionalProbabilityModel::build(b"ATGCATGC", &[0.9; 8]).unwrap();
//! let query = QueryRecord::new("read1", encode_sequence(b"GCAT").unwrap());
//!
//! let engine = ScoringEngine::new(&model);
//! let result = engine
//!     .score_seeds(&query, &[SeedMatch::new(1, 2, 3, 4)])
//!     .unwrap();
//!
//! let best = result.results.best().unwrap();
//! assert_eq!((best.span.start, best.span.end), (2, 5));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Nucleotides, seeds, spans and the probability model
//! - [`matching`]: Seed extension, scoring and result ranking
//! - [`parsing`]: FASTA, confidence and BLAST tabular parsers
//! - [`search`]: Seed sources, including the `blastn` wrapper
//! - [`config`]: JSON run configuration
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod search;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::model::PositionalProbabilityModel;
pub use core::types::*;
pub use matching::engine::{ScoringConfig, ScoringEngine};
pub use matching::scoring::HeuristicConfig;
pub use matching::{RankedHit, RankedResultSet};
