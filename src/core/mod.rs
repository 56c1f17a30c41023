//! Core data types for probabilistic seed re-scoring.
//!
//! - [`Nucleotide`]: the four-symbol reference alphabet
//! - [`SeedMatch`]: a local match reported by the search tool (0-based, inclusive)
//! - [`ExtendedAlignment`]: the ungapped window a seed is extended into
//! - [`Span`]: inclusive reference interval keying the ranked results
//! - [`PositionalProbabilityModel`]: per-position base distributions of the reference
//!
//! [`Nucleotide`]: types::Nucleotide
//! [`SeedMatch`]: types::SeedMatch
//! [`ExtendedAlignment`]: types::ExtendedAlignment
//! [`Span`]: types::Span
//! [`PositionalProbabilityModel`]: model::PositionalProbabilityModel

pub mod model;
pub mod types;
