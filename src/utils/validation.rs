//! Centralized validation and helper functions.

use crate::core::types::Nucleotide;

/// Invalid input to model construction or scorer configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Reference has {reference} bases but {confidence} confidence values were given")]
    LengthMismatch { reference: usize, confidence: usize },

    #[error("Confidence {value} at position {position} is outside [0, 1]")]
    ConfidenceOutOfRange { position: usize, value: f64 },

    #[error("Invalid symbol '{symbol}' at position {position} (expected A, T, G or C)")]
    InvalidSymbol { position: usize, symbol: char },

    #[error("Low-probability threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),

    #[error("Consecutive low-probability count must be at least 1")]
    ZeroRunLength,
}

/// Check that a value is a probability. NaN is rejected.
#[must_use]
pub fn is_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Convert raw sequence bytes into nucleotides.
///
/// # Examples
///
/// ```
/// use pblast::utils::validation::encode_sequence;
///
/// assert_eq!(encode_sequence(b"acgt").unwrap().len(), 4);
/// assert!(encode_sequence(b"ACNT").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::InvalidSymbol` for the first byte outside {A, T, G, C}.
pub fn encode_sequence(bytes: &[u8]) -> Result<Vec<Nucleotide>, ValidationError> {
    bytes
        .iter()
        .enumerate()
        .map(|(position, &byte)| {
            Nucleotide::from_ascii(byte).ok_or(ValidationError::InvalidSymbol {
                position,
                symbol: char::from(byte),
            })
        })
        .collect()
}

/// Check every confidence value lies in [0, 1].
///
/// # Errors
///
/// Returns `ValidationError::ConfidenceOutOfRange` for the first offending value.
pub fn validate_confidence(values: &[f64]) -> Result<(), ValidationError> {
    match values.iter().position(|&v| !is_probability(v)) {
        Some(position) => Err(ValidationError::ConfidenceOutOfRange {
            position,
            value: values[position],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_probability() {
        assert!(is_probability(0.0));
        assert!(is_probability(1.0));
        assert!(is_probability(0.25));
        assert!(!is_probability(-0.01));
        assert!(!is_probability(1.01));
        assert!(!is_probability(f64::NAN));
    }

    #[test]
    fn test_encode_sequence() {
        let encoded = encode_sequence(b"ATgc").unwrap();
        assert_eq!(
            encoded,
            vec![Nucleotide::A, Nucleotide::T, Nucleotide::G, Nucleotide::C]
        );

        match encode_sequence(b"ATNC") {
            Err(ValidationError::InvalidSymbol { position, symbol }) => {
                assert_eq!(position, 2);
                assert_eq!(symbol, 'N');
            }
            other => panic!("Expected InvalidSymbol, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_confidence() {
        assert!(validate_confidence(&[0.0, 0.5, 1.0]).is_ok());
        assert!(validate_confidence(&[]).is_ok());

        let err = validate_confidence(&[0.9, 1.5, -1.0]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ConfidenceOutOfRange {
                position: 1,
                value: 1.5
            }
        );
    }
}
