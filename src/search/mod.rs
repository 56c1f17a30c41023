//! Seed sources: where the seed matches for a query come from.
//!
//! - [`BlastnSearch`](blastn::BlastnSearch): runs `makeblastdb` and `blastn` as subprocesses
//! - [`StaticSeeds`]: seeds read from a pre-computed hits file
//!
//! Both produce 0-based [`SeedMatch`] records; scoring never sees tool-native
//! coordinates.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::types::{QueryRecord, SeedMatch};
use crate::parsing::hits::Hit;
use crate::parsing::ParseError;

pub mod blastn;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Unreadable {tool} output: {source}")]
    Output {
        tool: String,
        #[source]
        source: ParseError,
    },
}

/// Something that can find seed matches for a query
pub trait SeedSource: Sync {
    /// Seeds for `query`, in the order the source reports them
    ///
    /// # Errors
    ///
    /// Returns `SearchError` if the seeds cannot be produced.
    fn seeds(&self, query: &QueryRecord) -> Result<Vec<SeedMatch>, SearchError>;

    fn name(&self) -> &'static str;
}

/// Seeds loaded ahead of time, grouped by query id
#[derive(Debug, Clone, Default)]
pub struct StaticSeeds {
    by_query: HashMap<String, Vec<SeedMatch>>,
    /// Hits without a query id apply to every query
    shared: Vec<SeedMatch>,
}

impl StaticSeeds {
    #[must_use]
    pub fn from_hits(hits: Vec<Hit>) -> Self {
        let mut seeds = Self::default();
        for hit in hits {
            match hit.query_id {
                Some(id) => seeds.by_query.entry(id).or_default().push(hit.seed),
                None => seeds.shared.push(hit.seed),
            }
        }
        seeds
    }

    /// Total number of seeds held
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.len() + self.by_query.values().map(Vec::len).sum::<usize>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeedSource for StaticSeeds {
    fn seeds(&self, query: &QueryRecord) -> Result<Vec<SeedMatch>, SearchError> {
        let mut seeds = self.by_query.get(&query.id).cloned().unwrap_or_default();
        seeds.extend_from_slice(&self.shared);
        Ok(seeds)
    }

    fn name(&self) -> &'static str {
        "hits file"
    }
}
