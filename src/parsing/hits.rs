//! Parser for BLAST tabular (`-outfmt 6`) output.
//!
//! The search tool reports 1-based inclusive coordinates; every record is
//! converted to a 0-based [`SeedMatch`] here so nothing downstream sees
//! tool-native positions.

use std::path::Path;

use crate::core::types::SeedMatch;
use crate::parsing::ParseError;

/// Columns requested from `blastn` when it is run by this crate
pub const SEED_OUTFMT: &str = "6 qstart qend sstart send";

/// A seed together with the query it was reported for, when known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub query_id: Option<String>,
    pub seed: SeedMatch,
}

/// Parse a hits file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_hits_file(path: &Path) -> Result<Vec<Hit>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_hits_text(&content)
}

/// Parse tab-delimited hit records. An empty input yields no hits.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for an unsupported column count, a
/// non-numeric coordinate, a zero coordinate, or a record whose start lies after
/// its end (minus-strand hits are not searched for).
pub fn parse_hits_text(text: &str) -> Result<Vec<Hit>, ParseError> {
    let mut hits = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_num = i + 1;
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        let (query_id, coords) = match fields.len() {
            4 => (None, &fields[0..4]),
            5 => (Some(fields[0]), &fields[1..5]),
            n if n >= 12 => (Some(fields[0]), &fields[6..10]),
            n => {
                return Err(ParseError::InvalidFormat(format!(
                    "Line {line_num} has {n} fields (expected 4, 5 or at least 12)"
                )));
            }
        };

        let mut parsed = [0usize; 4];
        for (slot, field) in parsed.iter_mut().zip(coords) {
            *slot = field.parse().map_err(|_| {
                ParseError::InvalidFormat(format!(
                    "Invalid coordinate on line {line_num}: '{field}'"
                ))
            })?;
        }
        let [qstart, qend, sstart, send] = parsed;

        if qstart > qend || sstart > send {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} is a reverse-strand or inverted hit"
            )));
        }

        let seed = SeedMatch::from_one_based(qstart, qend, sstart, send).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Line {line_num} has a zero coordinate (positions are 1-based)"
            ))
        })?;

        hits.push(Hit {
            query_id: query_id.map(str::to_string),
            seed,
        });
    }

    Ok(hits)
}
