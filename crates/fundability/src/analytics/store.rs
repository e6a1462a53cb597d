use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::summary;
use super::views::{AnalyticsFilter, AnalyticsSummary};
use crate::scoring::{Snapshot, ValidatedInput};

pub const DEFAULT_ANALYTICS_CAPACITY: usize = 10_000;

/// One scored submission retained for aggregate reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEntry {
    pub recorded_at: DateTime<Utc>,
    pub input: ValidatedInput,
    pub snapshot: Snapshot,
}

/// Destination for scored submissions so the service can be exercised without
/// the in-memory store.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, input: &ValidatedInput, snapshot: &Snapshot);
    fn summarize(&self, filter: &AnalyticsFilter) -> AnalyticsSummary;
}

/// Bounded, process-local store keeping the most recent observations.
#[derive(Debug)]
pub struct AnalyticsStore {
    capacity: usize,
    entries: Mutex<VecDeque<AnalyticsEntry>>,
}

impl Default for AnalyticsStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ANALYTICS_CAPACITY)
    }
}

impl AnalyticsStore {
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1_024))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, entry: AnalyticsEntry) {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        while guard.len() >= self.capacity {
            guard.pop_front();
        }
        guard.push_back(entry);
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<AnalyticsEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl AnalyticsSink for AnalyticsStore {
    fn record(&self, input: &ValidatedInput, snapshot: &Snapshot) {
        self.push(AnalyticsEntry {
            recorded_at: snapshot.meta.generated_at,
            input: input.clone(),
            snapshot: snapshot.clone(),
        });
    }

    fn summarize(&self, filter: &AnalyticsFilter) -> AnalyticsSummary {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        summary::summarize(guard.iter(), filter)
    }
}
