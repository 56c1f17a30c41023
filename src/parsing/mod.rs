//! Parsers for the inputs of a scoring run.
//!
//! This module provides parsers for:
//!
//! - **FASTA files**: reference and query sequences, plain or gzip compressed
//! - **Confidence files**: one probability per reference position, plain text
//! - **BLAST tabular hits**: `-outfmt 6` seed records, converted to 0-based
//!
//! ## Example
//!
//! ```rust,no_run
//! use pblast::parsing::{confidence, fasta};
//! use pblast::PositionalProbabilityModel;
//! use std::path::Path;
//!
//! let reference = fasta::read_reference(Path::new("reference.fa")).unwrap();
//! let values = confidence::parse_confidence_file(Path::new("reference.prob")).unwrap();
//! let model = PositionalProbabilityModel::build(&reference.sequence, &values).unwrap();
//! ```
//!
//! ## Hit Columns
//!
//! | Columns | Layout |
//! |---------|--------|
//! | 4  | `qstart qend sstart send` |
//! | 5  | `qseqid qstart qend sstart send` |
//! | 12 | standard `-outfmt 6` (`qstart`..`send` in columns 7-10) |

use thiserror::Error;

use crate::utils::validation::ValidationError;

pub mod confidence;
pub mod fasta;
pub mod hits;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Record '{record}': {source}")]
    Validation {
        record: String,
        #[source]
        source: ValidationError,
    },

    #[error("Too many records: {0} exceeds maximum allowed")]
    TooManyRecords(usize),
}
