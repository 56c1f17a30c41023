use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::model::PositionalProbabilityModel;
use crate::core::types::{QueryRecord, RangeError, SeedMatch};
use crate::matching::extension::extend;
use crate::matching::results::RankedResultSet;
use crate::matching::scoring::{score, HeuristicConfig};
use crate::utils::validation::ValidationError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Query '{query}': {source}")]
    Range {
        query: String,
        #[source]
        source: RangeError,
    },
}

/// Configuration for the scoring engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Early-abort settings applied to every window
    pub heuristic: HeuristicConfig,
}

/// Counters collected while scoring one query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoringStats {
    pub seeds: usize,
    pub discarded: usize,
    pub recorded: usize,
}

/// Ranked results for a single query
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub query_id: String,
    pub results: RankedResultSet,
    pub stats: ScoringStats,
}

/// Extends, scores and ranks seed matches against a shared reference model
pub struct ScoringEngine<'a> {
    model: &'a PositionalProbabilityModel,
    config: ScoringConfig,
}

impl<'a> ScoringEngine<'a> {
    /// Create an engine with the heuristic disabled
    pub fn new(model: &'a PositionalProbabilityModel) -> Self {
        Self {
            model,
            config: ScoringConfig::default(),
        }
    }

    /// Create an engine with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` if the heuristic thresholds are invalid.
    pub fn with_config(
        model: &'a PositionalProbabilityModel,
        config: ScoringConfig,
    ) -> Result<Self, EngineError> {
        config.heuristic.validate()?;
        Ok(Self { model, config })
    }

    /// Score every seed of one query, in the order received.
    ///
    /// Discarded windows are left out of the result set. An empty set means no
    /// seed survived.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Range` if a seed lies outside the query or reference.
    pub fn score_seeds(
        &self,
        query: &QueryRecord,
        seeds: &[SeedMatch],
    ) -> Result<QueryResult, EngineError> {
        let range_error = |source| EngineError::Range {
            query: query.id.clone(),
            source,
        };

        let mut results = RankedResultSet::new();
        let mut stats = ScoringStats {
            seeds: seeds.len(),
            ..ScoringStats::default()
        };

        for seed in seeds {
            let alignment = extend(seed, query.len(), self.model.len()).map_err(range_error)?;
            let window = score(
                &alignment,
                &query.symbols,
                self.model,
                Some(&self.config.heuristic),
            )
            .map_err(range_error)?;

            if window.discarded {
                trace!(
                    query = %query.id,
                    %seed,
                    after = window.positions_scored,
                    "window discarded"
                );
                stats.discarded += 1;
                continue;
            }

            results.record(alignment.reference_span(), window.score);
            stats.recorded += 1;
        }

        debug!(
            query = %query.id,
            seeds = stats.seeds,
            discarded = stats.discarded,
            spans = results.len(),
            "scored query"
        );

        Ok(QueryResult {
            query_id: query.id.clone(),
            results,
            stats,
        })
    }

    /// Score independent queries in parallel. Output order follows input order.
    pub fn score_batch(
        &self,
        requests: &[(QueryRecord, Vec<SeedMatch>)],
    ) -> Vec<Result<QueryResult, EngineError>> {
        requests
            .par_iter()
            .map(|(query, seeds)| self.score_seeds(query, seeds))
            .collect()
    }
}
