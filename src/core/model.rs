//! Per-position probability model of an uncertain reference.
//!
//! Each reference position holds a categorical distribution over {A, T, G, C}:
//! the observed base carries the position's confidence and the three remaining
//! bases share the residual mass equally, rounded to three decimal places.

use serde::Serialize;

use crate::core::types::{Nucleotide, RangeError};
use crate::utils::validation::{encode_sequence, validate_confidence, ValidationError};

/// Probabilities are stored with this many decimal places for the non-observed bases
const RESIDUAL_DECIMALS: i32 = 3;

/// Round to `RESIDUAL_DECIMALS` decimal places
fn round_residual(value: f64) -> f64 {
    let scale = 10f64.powi(RESIDUAL_DECIMALS);
    (value * scale).round() / scale
}

/// Distribution at a single position, as exported by the `model` command
#[derive(Debug, Clone, Serialize)]
pub struct PositionalDistribution {
    pub position: usize,
    pub observed: Nucleotide,
    pub confidence: f64,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "T")]
    pub t: f64,
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "C")]
    pub c: f64,
}

/// Immutable probability table built from a reference and its confidence values.
///
/// The table is never mutated after `build`, so a single model can be shared by
/// reference across threads scoring independent queries.
#[derive(Debug, Clone)]
pub struct PositionalProbabilityModel {
    observed: Vec<Nucleotide>,
    confidence: Vec<f64>,
    /// Row per position, column per `Nucleotide::index`
    table: Vec<[f64; 4]>,
}

impl PositionalProbabilityModel {
    /// Build a model from reference bases and index-aligned confidence values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::LengthMismatch` if the inputs differ in length,
    /// `ValidationError::InvalidSymbol` for a base outside {A, T, G, C}, or
    /// `ValidationError::ConfidenceOutOfRange` for a value outside [0, 1].
    pub fn build(reference: &[u8], confidence: &[f64]) -> Result<Self, ValidationError> {
        if reference.len() != confidence.len() {
            return Err(ValidationError::LengthMismatch {
                reference: reference.len(),
                confidence: confidence.len(),
            });
        }

        validate_confidence(confidence)?;
        let observed = encode_sequence(reference)?;

        let table = observed
            .iter()
            .zip(confidence)
            .map(|(&base, &p)| {
                let residual = round_residual((1.0 - p) / 3.0);
                let mut row = [residual; 4];
                row[base.index()] = p;
                row
            })
            .collect();

        Ok(Self {
            observed,
            confidence: confidence.to_vec(),
            table,
        })
    }

    /// Probability that the reference holds `symbol` at `position`.
    ///
    /// # Errors
    ///
    /// Returns `RangeError::Position` if `position` is outside the reference.
    #[inline]
    pub fn query(&self, position: usize, symbol: Nucleotide) -> Result<f64, RangeError> {
        self.table
            .get(position)
            .map(|row| row[symbol.index()])
            .ok_or(RangeError::Position {
                position,
                length: self.table.len(),
            })
    }

    /// Reference length
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[must_use]
    pub fn observed(&self, position: usize) -> Option<Nucleotide> {
        self.observed.get(position).copied()
    }

    #[must_use]
    pub fn confidence(&self, position: usize) -> Option<f64> {
        self.confidence.get(position).copied()
    }

    /// Full distribution at `position`, or None past the end of the reference
    #[must_use]
    pub fn distribution(&self, position: usize) -> Option<PositionalDistribution> {
        let row = self.table.get(position)?;
        Some(PositionalDistribution {
            position,
            observed: self.observed(position)?,
            confidence: self.confidence(position)?,
            a: row[Nucleotide::A.index()],
            t: row[Nucleotide::T.index()],
            g: row[Nucleotide::G.index()],
            c: row[Nucleotide::C.index()],
        })
    }

    /// Iterate distributions in reference order
    pub fn distributions(&self) -> impl Iterator<Item = PositionalDistribution> + '_ {
        (0..self.len()).filter_map(|position| self.distribution(position))
    }
}
