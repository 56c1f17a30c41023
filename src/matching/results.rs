use std::collections::HashMap;

use serde::Serialize;

use crate::core::types::Span;

/// A reference span with its log-likelihood score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedHit {
    pub span: Span,
    pub score: f64,
}

/// Scores keyed by reference span, with the best entry tracked as entries arrive.
///
/// Entries keep the slot of the first time their span was recorded. Re-recording a
/// span replaces its score in place. Ties on score are broken by slot order, both
/// for [`best`](Self::best) and for [`sorted`](Self::sorted).
#[derive(Debug, Clone, Default)]
pub struct RankedResultSet {
    entries: Vec<RankedHit>,
    index: HashMap<Span, usize>,
    best: Option<usize>,
}

impl RankedResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a score for `span`, replacing any previous score for the same span
    pub fn record(&mut self, span: Span, score: f64) {
        if let Some(&slot) = self.index.get(&span) {
            let previous = self.entries[slot].score;
            self.entries[slot].score = score;
            if score > previous || self.best == Some(slot) {
                self.refresh_best();
            }
            return;
        }

        let slot = self.entries.len();
        self.entries.push(RankedHit { span, score });
        self.index.insert(span, slot);

        let improves = match self.best {
            Some(best) => score > self.entries[best].score,
            None => true,
        };
        if improves {
            self.best = Some(slot);
        }
    }

    /// Rescan for the highest score, earliest slot winning ties
    fn refresh_best(&mut self) {
        let mut best: Option<usize> = None;
        for (slot, entry) in self.iter().enumerate() {
            if best.map_or(true, |b| entry.score > self.entries[b].score) {
                best = Some(slot);
            }
        }
        self.best = best;
    }

    /// Highest-scoring entry, or None when nothing survived scoring
    #[must_use]
    pub fn best(&self) -> Option<RankedHit> {
        self.best.map(|slot| self.entries[slot])
    }

    #[must_use]
    pub fn get(&self, span: &Span) -> Option<f64> {
        self.index.get(span).map(|&slot| self.entries[slot].score)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in recording order
    pub fn iter(&self) -> impl Iterator<Item = &RankedHit> {
        self.entries.iter()
    }

    /// All entries by score descending; equal scores keep recording order
    #[must_use]
    pub fn sorted(&self) -> Vec<RankedHit> {
        let mut hits = self.entries.clone();
        // sort_by is stable
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits
    }

    /// The `limit` highest-scoring entries
    #[must_use]
    pub fn top(&self, limit: usize) -> Vec<RankedHit> {
        let mut hits = self.sorted();
        hits.truncate(limit);
        hits
    }
}
