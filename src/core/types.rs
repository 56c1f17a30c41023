use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinates that fall outside the domain of a model, query or reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Position {position} is outside the reference (length {length})")]
    Position { position: usize, length: usize },

    #[error("Seed {seed} is outside [0, {query_length}) x [0, {reference_length})")]
    Seed {
        seed: SeedMatch,
        query_length: usize,
        reference_length: usize,
    },

    #[error("Seed {0} has a start after its end")]
    InvertedSeed(SeedMatch),

    #[error("Seed {0} spans unequal query and reference lengths")]
    GappedSeed(SeedMatch),

    #[error("Query offset {offset} is outside the query (length {length})")]
    QueryOffset { offset: usize, length: usize },

    #[error("Window {0} is inverted or spans unequal query and reference lengths")]
    MalformedWindow(ExtendedAlignment),
}

/// A nucleotide of the reference alphabet.
///
/// The discriminant is the column of the symbol in the positional probability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nucleotide {
    A = 0,
    T = 1,
    G = 2,
    C = 3,
}

impl Nucleotide {
    /// Parse an ASCII base, case-insensitive. Returns None for anything outside {A, T, G, C}.
    #[must_use]
    pub fn from_ascii(byte: u8) -> Option<Self> {
        match byte.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'T' => Some(Self::T),
            b'G' => Some(Self::G),
            b'C' => Some(Self::C),
            _ => None,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::T => b'T',
            Self::G => b'G',
            Self::C => b'C',
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(self.as_byte())
    }
}

impl std::fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.as_char(), f)
    }
}

/// Inclusive reference interval used as the key of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A local match reported by the search tool, 0-based inclusive on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedMatch {
    pub query_start: usize,
    pub query_end: usize,
    pub ref_start: usize,
    pub ref_end: usize,
}

impl SeedMatch {
    #[must_use]
    pub fn new(query_start: usize, query_end: usize, ref_start: usize, ref_end: usize) -> Self {
        Self {
            query_start,
            query_end,
            ref_start,
            ref_end,
        }
    }

    /// Convert 1-based inclusive tool coordinates. Returns None if any coordinate is 0.
    #[must_use]
    pub fn from_one_based(
        query_start: usize,
        query_end: usize,
        ref_start: usize,
        ref_end: usize,
    ) -> Option<Self> {
        Some(Self {
            query_start: query_start.checked_sub(1)?,
            query_end: query_end.checked_sub(1)?,
            ref_start: ref_start.checked_sub(1)?,
            ref_end: ref_end.checked_sub(1)?,
        })
    }
}

impl std::fmt::Display for SeedMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "q[{}..={}] r[{}..={}]",
            self.query_start, self.query_end, self.ref_start, self.ref_end
        )
    }
}

/// Ungapped window derived from a seed, 0-based inclusive on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedAlignment {
    pub query_start: usize,
    pub query_end: usize,
    pub ref_start: usize,
    pub ref_end: usize,
}

impl ExtendedAlignment {
    /// Number of aligned positions, or None unless both windows run forward and
    /// have the same length
    #[must_use]
    pub fn window_len(&self) -> Option<usize> {
        let query = self.query_end.checked_sub(self.query_start)?;
        let reference = self.ref_end.checked_sub(self.ref_start)?;
        (query == reference).then_some(reference + 1)
    }

    #[must_use]
    pub fn reference_span(&self) -> Span {
        Span::new(self.ref_start, self.ref_end)
    }
}

impl std::fmt::Display for ExtendedAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "q[{}..={}] r[{}..={}]",
            self.query_start, self.query_end, self.ref_start, self.ref_end
        )
    }
}

/// A query sequence to be scored against the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub id: String,
    pub symbols: Vec<Nucleotide>,
}

impl QueryRecord {
    pub fn new(id: impl Into<String>, symbols: Vec<Nucleotide>) -> Self {
        Self {
            id: id.into(),
            symbols,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
