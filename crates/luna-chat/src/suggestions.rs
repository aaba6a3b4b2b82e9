//! Used-question bookkeeping for the suggestion pools.
//!
//! Tracks which suggestion chips have already been clicked so they are not
//! offered again, and implements the freshness policy: once the set grows
//! past a configurable threshold it is cleared wholesale, so the pool
//! never goes stale forever.

use tracing::debug;

/// Insertion-ordered set of question strings already used this session.
///
/// Ordered so the wire payload (`usedQuestions`) is deterministic. The set
/// only ever grows or resets to empty; individual entries are never
/// removed.
#[derive(Debug, Clone, Default)]
pub struct UsedQuestions {
    entries: Vec<String>,
    reset_threshold: usize,
}

impl UsedQuestions {
    /// New empty set with the given freshness threshold.
    pub fn new(reset_threshold: usize) -> Self {
        Self {
            entries: Vec::new(),
            reset_threshold,
        }
    }

    /// Record a clicked suggestion chip. Duplicates are ignored.
    pub fn record(&mut self, question: &str) {
        if !self.contains(question) {
            self.entries.push(question.to_string());
        }
    }

    pub fn contains(&self, question: &str) -> bool {
        self.entries.iter().any(|q| q == question)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in insertion order, for the wire payload.
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    /// Drop candidates that were already used, preserving order.
    pub fn filter_fresh(&self, candidates: Vec<String>) -> Vec<String> {
        candidates
            .into_iter()
            .filter(|q| !self.contains(q))
            .collect()
    }

    /// Clear the set if it has grown past the threshold. Returns whether a
    /// reset happened.
    pub fn maybe_reset(&mut self) -> bool {
        if self.entries.len() > self.reset_threshold {
            debug!(
                used = self.entries.len(),
                threshold = self.reset_threshold,
                "Resetting used-question set to keep suggestions fresh"
            );
            self.entries.clear();
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
