//! Parser for FASTA files using noodles.
//!
//! Supports both uncompressed and gzip/bgzip compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use tracing::warn;

use crate::core::types::QueryRecord;
use crate::parsing::ParseError;
use crate::utils::validation::encode_sequence;

/// Maximum number of records read from a single file (DOS protection)
pub const MAX_RECORDS: usize = 1_000_000;

/// A raw FASTA record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read every record of a FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, `ParseError::InvalidFormat` if no records are found, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        let reader = BufReader::new(GzDecoder::new(file));
        read_sequences_from(&mut fasta::io::Reader::new(reader))
    } else {
        let reader = BufReader::new(file);
        read_sequences_from(&mut fasta::io::Reader::new(reader))
    }
}

/// Parse FASTA records from an in-memory buffer
///
/// # Errors
///
/// Same conditions as [`read_sequences`].
pub fn parse_sequences(data: &[u8]) -> Result<Vec<SequenceRecord>, ParseError> {
    read_sequences_from(&mut fasta::io::Reader::new(data))
}

/// Parse from a noodles FASTA reader
fn read_sequences_from<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if records.len() >= MAX_RECORDS {
            return Err(ParseError::TooManyRecords(records.len()));
        }

        records.push(SequenceRecord {
            name: String::from_utf8_lossy(record.name()).to_string(),
            sequence: record.sequence().as_ref().to_vec(),
        });
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(records)
}

/// Read the reference sequence: the first record of the file.
///
/// # Errors
///
/// Same conditions as [`read_sequences`].
pub fn read_reference(path: &Path) -> Result<SequenceRecord, ParseError> {
    let mut records = read_sequences(path)?;
    if records.len() > 1 {
        warn!(
            "{} contains {} sequences; using only the first ({})",
            path.display(),
            records.len(),
            records[0].name
        );
    }
    Ok(records.swap_remove(0))
}

/// Read query records and encode them into nucleotides.
///
/// # Errors
///
/// Returns the errors of [`read_sequences`], or `ParseError::Validation` if a
/// query contains a symbol outside {A, T, G, C}.
pub fn read_queries(path: &Path) -> Result<Vec<QueryRecord>, ParseError> {
    read_sequences(path)?
        .into_iter()
        .map(|record| {
            let symbols = encode_sequence(&record.sequence).map_err(|source| {
                ParseError::Validation {
                    record: record.name.clone(),
                    source,
                }
            })?;
            Ok(QueryRecord::new(record.name, symbols))
        })
        .collect()
}

/// Write a single record in 80-column FASTA, the layout the search tool expects
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_record<W: Write>(writer: &mut W, name: &str, sequence: &[u8]) -> std::io::Result<()> {
    writeln!(writer, ">{name}")?;
    for chunk in sequence.chunks(80) {
        writer.write_all(chunk)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
