use serde::{Deserialize, Serialize};

use crate::core::model::PositionalProbabilityModel;
use crate::core::types::{ExtendedAlignment, Nucleotide, RangeError};
use crate::utils::validation::{is_probability, ValidationError};

/// Substituted for a zero probability so the log-likelihood stays finite
pub const PROBABILITY_FLOOR: f64 = 1e-10;

/// Default probability below which a position counts as low
pub const DEFAULT_LOW_PROBABILITY: f64 = 0.5;

/// Default number of consecutive low positions that discards a window
pub const DEFAULT_MAX_LOW_RUN: usize = 3;

/// Early-abort settings for the scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Whether runs of low-probability positions abort scoring
    pub enabled: bool,
    /// Positions with probability strictly below this are low
    pub low_probability_threshold: f64,
    /// A run of this many low positions discards the window
    pub consecutive_low_count_threshold: usize,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            low_probability_threshold: DEFAULT_LOW_PROBABILITY,
            consecutive_low_count_threshold: DEFAULT_MAX_LOW_RUN,
        }
    }
}

impl HeuristicConfig {
    /// Enabled heuristic with the given thresholds
    #[must_use]
    pub fn enabled(low_probability_threshold: f64, consecutive_low_count_threshold: usize) -> Self {
        Self {
            enabled: true,
            low_probability_threshold,
            consecutive_low_count_threshold,
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError::ThresholdOutOfRange` if the probability threshold is
    /// outside [0, 1], or `ValidationError::ZeroRunLength` if the run length is 0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_probability(self.low_probability_threshold) {
            return Err(ValidationError::ThresholdOutOfRange(
                self.low_probability_threshold,
            ));
        }
        if self.consecutive_low_count_threshold == 0 {
            return Err(ValidationError::ZeroRunLength);
        }
        Ok(())
    }
}

/// Result of scoring one extended window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowScore {
    /// Sum of per-position natural-log probabilities over the scored positions
    pub score: f64,
    /// True if the heuristic aborted the window
    pub discarded: bool,
    /// Positions that contributed (the whole window unless discarded)
    pub positions_scored: usize,
}

/// Natural log of a probability, floored at `PROBABILITY_FLOOR`
#[inline]
fn log_probability(p: f64) -> f64 {
    if p > 0.0 {
        p.ln()
    } else {
        PROBABILITY_FLOOR.ln()
    }
}

/// Log-likelihood of the query over `alignment` under the reference model.
///
/// Offsets are walked left to right; the same offset indexes the query window
/// and the reference window. With the heuristic enabled, a run of
/// `consecutive_low_count_threshold` positions whose probability is below
/// `low_probability_threshold` stops scoring and marks the window discarded.
///
/// # Errors
///
/// Returns `RangeError::MalformedWindow` if either window runs backwards or the
/// two differ in length, `RangeError::Position` if the reference window leaves
/// the model, or `RangeError::QueryOffset` if the query window leaves the query.
pub fn score(
    alignment: &ExtendedAlignment,
    query: &[Nucleotide],
    model: &PositionalProbabilityModel,
    heuristic: Option<&HeuristicConfig>,
) -> Result<WindowScore, RangeError> {
    let length = alignment
        .window_len()
        .ok_or(RangeError::MalformedWindow(*alignment))?;
    let heuristic = heuristic.filter(|h| h.enabled);
    let mut total = 0.0;
    let mut low_run = 0usize;

    for offset in 0..length {
        let query_offset = alignment.query_start + offset;
        let symbol = *query.get(query_offset).ok_or(RangeError::QueryOffset {
            offset: query_offset,
            length: query.len(),
        })?;
        let p = model.query(alignment.ref_start + offset, symbol)?;

        if let Some(h) = heuristic {
            if p < h.low_probability_threshold {
                low_run += 1;
            } else {
                low_run = 0;
            }
            if low_run >= h.consecutive_low_count_threshold {
                return Ok(WindowScore {
                    score: total,
                    discarded: true,
                    positions_scored: offset,
                });
            }
        }

        total += log_probability(p);
    }

    Ok(WindowScore {
        score: total,
        discarded: false,
        positions_scored: length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::encode_sequence;

    fn window(start: usize, end: usize) -> ExtendedAlignment {
        ExtendedAlignment {
            query_start: start,
            query_end: end,
            ref_start: start,
            ref_end: end,
        }
    }

    fn query(seq: &[u8]) -> Vec<Nucleotide> {
        encode_sequence(seq).unwrap()
    }

    #[test]
    fn test_perfect_match_scores_zero() {
        let model = PositionalProbabilityModel::build(b"ATGC", &[1.0; 4]).unwrap();
        let result = score(&window(0, 3), &query(b"ATGC"), &model, None).unwrap();

        assert!(!result.discarded);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.positions_scored, 4);
    }

    #[test]
    fn test_score_is_sum_of_logs() {
        let model = PositionalProbabilityModel::build(b"ATGC", &[0.9, 0.8, 0.7, 0.6]).unwrap();
        // Mismatch at position 3: residual round(0.4 / 3, 3) = 0.133
        let result = score(&window(0, 3), &query(b"ATGA"), &model, None).unwrap();

        let expected = 0.9f64.ln() + 0.8f64.ln() + 0.7f64.ln() + 0.133f64.ln();
        assert!((result.score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_probability_is_floored() {
        let model = PositionalProbabilityModel::build(b"AT", &[1.0, 1.0]).unwrap();
        let result = score(&window(0, 1), &query(b"AA"), &model, None).unwrap();

        assert!(result.score.is_finite());
        assert!((result.score - PROBABILITY_FLOOR.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_lower_confidence_on_matched_position_lowers_score() {
        let high = PositionalProbabilityModel::build(b"ATGC", &[0.9, 0.9, 0.9, 0.9]).unwrap();
        let low = PositionalProbabilityModel::build(b"ATGC", &[0.9, 0.6, 0.9, 0.9]).unwrap();
        // Position 3 mismatches in both runs; position 1 matches and loses confidence
        let q = query(b"ATGA");

        let s_high = score(&window(0, 3), &q, &high, None).unwrap().score;
        let s_low = score(&window(0, 3), &q, &low, None).unwrap().score;
        assert!(s_low < s_high, "{s_low} should be below {s_high}");
    }

    #[test]
    fn test_mismatched_position_follows_residual() {
        // On the mismatched position itself, lower confidence leaves more residual mass
        let confident = PositionalProbabilityModel::build(b"ATGC", &[0.9, 0.9, 0.9, 0.9]).unwrap();
        let unsure = PositionalProbabilityModel::build(b"ATGC", &[0.9, 0.9, 0.9, 0.6]).unwrap();
        let q = query(b"ATGA");

        let s_confident = score(&window(0, 3), &q, &confident, None).unwrap().score;
        let s_unsure = score(&window(0, 3), &q, &unsure, None).unwrap().score;
        assert!(s_unsure > s_confident);
    }

    #[test]
    fn test_heuristic_discards_two_low_positions() {
        let model = PositionalProbabilityModel::build(b"AAAAAAAA", &[0.99; 8]).unwrap();
        let heuristic = HeuristicConfig::enabled(0.5, 2);

        // Two adjacent mismatches in the middle of an otherwise perfect window
        let result = score(&window(0, 7), &query(b"AAACCAAA"), &model, Some(&heuristic)).unwrap();
        assert!(result.discarded);
        assert_eq!(result.positions_scored, 4);
    }

    #[test]
    fn test_heuristic_discards_run_at_window_edges() {
        let model = PositionalProbabilityModel::build(b"AAAAAA", &[0.99; 6]).unwrap();
        let heuristic = HeuristicConfig::enabled(0.5, 2);

        let head = score(&window(0, 5), &query(b"CCAAAA"), &model, Some(&heuristic)).unwrap();
        assert!(head.discarded);
        assert_eq!(head.positions_scored, 1);

        let tail = score(&window(0, 5), &query(b"AAAACC"), &model, Some(&heuristic)).unwrap();
        assert!(tail.discarded);
        assert_eq!(tail.positions_scored, 5);
    }

    #[test]
    fn test_heuristic_resets_run_on_high_position() {
        let model = PositionalProbabilityModel::build(b"AAAAAAAA", &[0.99; 8]).unwrap();
        let heuristic = HeuristicConfig::enabled(0.5, 2);

        // Isolated mismatches never form a run of two
        let result = score(&window(0, 7), &query(b"CACACACA"), &model, Some(&heuristic)).unwrap();
        assert!(!result.discarded);
        assert_eq!(result.positions_scored, 8);
    }

    #[test]
    fn test_disabled_heuristic_is_ignored() {
        let model = PositionalProbabilityModel::build(b"AAAA", &[0.99; 4]).unwrap();
        let heuristic = HeuristicConfig {
            enabled: false,
            low_probability_threshold: 0.5,
            consecutive_low_count_threshold: 1,
        };

        let result = score(&window(0, 3), &query(b"CCCC"), &model, Some(&heuristic)).unwrap();
        assert!(!result.discarded);
    }

    #[test]
    fn test_malformed_windows_are_errors() {
        let model = PositionalProbabilityModel::build(b"ATGC", &[1.0; 4]).unwrap();
        let q = query(b"ATGC");

        let inverted = ExtendedAlignment {
            query_start: 0,
            query_end: 3,
            ref_start: 3,
            ref_end: 0,
        };
        assert_eq!(
            score(&inverted, &q, &model, None),
            Err(RangeError::MalformedWindow(inverted))
        );

        let gapped = ExtendedAlignment {
            query_start: 0,
            query_end: 2,
            ref_start: 0,
            ref_end: 3,
        };
        assert!(matches!(
            score(&gapped, &q, &model, None),
            Err(RangeError::MalformedWindow(_))
        ));
    }

    #[test]
    fn test_offset_windows() {
        // Query window 0..=2 against reference 3..=5
        let model = PositionalProbabilityModel::build(b"CCCATG", &[0.5, 0.5, 0.5, 1.0, 1.0, 1.0])
            .unwrap();
        let alignment = ExtendedAlignment {
            query_start: 0,
            query_end: 2,
            ref_start: 3,
            ref_end: 5,
        };
        let result = score(&alignment, &query(b"ATG"), &model, None).unwrap();
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_window_outside_query() {
        let model = PositionalProbabilityModel::build(b"ATGC", &[1.0; 4]).unwrap();
        let err = score(&window(0, 3), &query(b"AT"), &model, None).unwrap_err();
        assert_eq!(err, RangeError::QueryOffset { offset: 2, length: 2 });
    }

    #[test]
    fn test_window_outside_model() {
        let model = PositionalProbabilityModel::build(b"AT", &[1.0; 2]).unwrap();
        let err = score(&window(0, 3), &query(b"ATGC"), &model, None).unwrap_err();
        assert_eq!(err, RangeError::Position { position: 2, length: 2 });
    }

    #[test]
    fn test_heuristic_validation() {
        assert!(HeuristicConfig::default().validate().is_ok());
        assert_eq!(
            HeuristicConfig::enabled(1.5, 2).validate(),
            Err(ValidationError::ThresholdOutOfRange(1.5))
        );
        assert_eq!(
            HeuristicConfig::enabled(0.5, 0).validate(),
            Err(ValidationError::ZeroRunLength)
        );
    }
}
