//! Immutable dashboard view state
//!
//! A [`DashboardView`] is never mutated in place. Each transition consumes a
//! reference to the current view and returns the next one, touching only the
//! slot that belongs to the operation kind.

use std::sync::Arc;

use blockchair_core::StatsSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::ErrorKind;

/// Lifecycle of one operation slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum LoadState<T> {
    /// Nothing requested yet
    NotStarted,
    /// Request in flight
    Loading,
    /// Completed with a payload
    Loaded(T),
    /// Completed with a classified failure
    Failed(ErrorKind),
}

impl<T> LoadState<T> {
    /// Request in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Payload, if loaded
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Failure kind, if failed
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Failed(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// A lookup slot: the submitted query and its outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookup {
    /// Query as submitted by the user
    pub query: Option<String>,
    /// Outcome of the latest submission
    pub state: LoadState<Arc<Value>>,
    /// Bumped on every submission; stale completions are discarded
    #[serde(skip)]
    pub(crate) generation: u64,
}

impl Default for Lookup {
    fn default() -> Self {
        Self {
            query: None,
            state: LoadState::NotStarted,
            generation: 0,
        }
    }
}

/// The general-stats slot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneralStats {
    /// Snapshot outcome
    pub state: LoadState<Arc<StatsSnapshot>>,
    /// When the last successful load finished
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) generation: u64,
}

/// Which slot an operation writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// General stats
    General,
    /// Address lookup
    Address,
    /// Transaction lookup
    Transaction,
}

/// Complete dashboard state, replaced wholesale on every transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Chain used for lookups
    pub chain: String,
    /// Multi-chain statistics
    pub general: GeneralStats,
    /// Address lookup
    pub address: Lookup,
    /// Transaction lookup
    pub transaction: Lookup,
    /// Slot that failed most recently
    pub last_failed: Option<Slot>,
}

impl DashboardView {
    /// Fresh view for `chain`
    pub fn new(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            general: GeneralStats::default(),
            address: Lookup::default(),
            transaction: Lookup::default(),
            last_failed: None,
        }
    }

    /// Message for the most recent failure still on screen
    pub fn banner(&self) -> Option<&'static str> {
        let kind = match self.last_failed? {
            Slot::General => self.general.state.error(),
            Slot::Address => self.address.state.error(),
            Slot::Transaction => self.transaction.state.error(),
        }?;
        Some(kind.message())
    }

    /// Any slot in flight
    pub fn is_busy(&self) -> bool {
        self.general.state.is_loading()
            || self.address.state.is_loading()
            || self.transaction.state.is_loading()
    }

    /// General stats requested
    #[must_use]
    pub fn general_started(&self) -> Self {
        let mut next = self.clone();
        next.general.generation += 1;
        next.general.state = LoadState::Loading;
        next.clear_failure(Slot::General);
        next
    }

    /// General stats completed
    #[must_use]
    pub fn general_finished(
        &self,
        generation: u64,
        outcome: Result<StatsSnapshot, ErrorKind>,
        now: DateTime<Utc>,
    ) -> Self {
        if generation != self.general.generation {
            return self.clone();
        }
        let mut next = self.clone();
        match outcome {
            Ok(snapshot) => {
                next.general.state = LoadState::Loaded(Arc::new(snapshot));
                next.general.fetched_at = Some(now);
            }
            Err(kind) => {
                next.general.state = LoadState::Failed(kind);
                next.last_failed = Some(Slot::General);
            }
        }
        next
    }

    /// Lookup submitted; clears the slot's previous result
    #[must_use]
    pub fn lookup_started(&self, slot: Slot, query: &str) -> Self {
        let mut next = self.clone();
        if let Some(lookup) = next.lookup_mut(slot) {
            lookup.generation += 1;
            lookup.query = Some(query.to_string());
            lookup.state = LoadState::Loading;
        }
        next.clear_failure(slot);
        next
    }

    /// Lookup completed. Completions of superseded submissions are dropped.
    #[must_use]
    pub fn lookup_finished(
        &self,
        slot: Slot,
        generation: u64,
        outcome: Result<Value, ErrorKind>,
    ) -> Self {
        let mut next = self.clone();
        let Some(lookup) = next.lookup_mut(slot) else {
            return next;
        };
        if lookup.generation != generation {
            return next;
        }
        match outcome {
            Ok(value) => lookup.state = LoadState::Loaded(Arc::new(value)),
            Err(kind) => {
                lookup.state = LoadState::Failed(kind);
                next.last_failed = Some(slot);
            }
        }
        next
    }

    /// Current generation counter of `slot`
    pub fn generation(&self, slot: Slot) -> u64 {
        match slot {
            Slot::General => self.general.generation,
            Slot::Address => self.address.generation,
            Slot::Transaction => self.transaction.generation,
        }
    }

    fn lookup_mut(&mut self, slot: Slot) -> Option<&mut Lookup> {
        match slot {
            Slot::General => None,
            Slot::Address => Some(&mut self.address),
            Slot::Transaction => Some(&mut self.transaction),
        }
    }

    fn clear_failure(&mut self, slot: Slot) {
        if self.last_failed == Some(slot) {
            self.last_failed = None;
        }
    }
}
