//! Seed extension, likelihood scoring and ranking.
//!
//! - [`extend`](extension::extend): grow a seed into the maximal ungapped window
//! - [`score`](scoring::score): log-likelihood of a window under the reference model
//! - [`RankedResultSet`]: scores keyed by reference span, best tracked incrementally
//! - [`ScoringEngine`](engine::ScoringEngine): runs extend -> score -> record over the seeds of a query
//!
//! ## Scoring
//!
//! For a window of length `L` starting at reference position `r` and query
//! offset `q`, the score is
//!
//! ```text
//! sum over k in 0..L of ln P(reference[r + k] = query[q + k])
//! ```
//!
//! with zero probabilities floored at `1e-10`. A perfect match against a fully
//! confident reference scores exactly 0; every uncertain or mismatched base makes
//! the score more negative.
//!
//! ## Example
//!
//! ```rust
//! use pblast::{PositionalProbabilityModel, QueryRecord, ScoringEngine, SeedMatch, Span};
//! use pblast::utils::validation::encode_sequence;
//!
//! let model = PositionalProbabilityModel::build(b"ATGC", &[1.0, 1.0, 1.0, 1.0]).unwrap();
//! let query = QueryRecord::new("q1", encode_sequence(b"ATGC").unwrap());
//!
//! let engine = ScoringEngine::new(&model);
//! let result = engine.score_seeds(&query, &[SeedMatch::new(0, 3, 0, 3)]).unwrap();
//!
//! let best = result.results.best().unwrap();
//! assert_eq!(best.span, Span::new(0, 3));
//! assert_eq!(best.score, 0.0);
//! ```

pub mod engine;
pub mod extension;
pub mod results;
pub mod scoring;

pub use results::{RankedHit, RankedResultSet};
