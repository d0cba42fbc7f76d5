//! Dashboard presentation layer
//!
//! [`Dashboard`] drives the view state: it invokes the API client on mount
//! and on user action, and swaps in a new [`DashboardView`] for every
//! transition. Network I/O never happens under the view lock.

pub mod card;
pub mod chains;
pub mod format;
pub mod render;
pub mod state;

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::ErrorKind;
use crate::client::BlockchainApi;

pub use card::{ChainCard, cards};
pub use chains::{ChainMeta, chain_meta};
pub use state::{DashboardView, LoadState, Lookup, Slot};

/// User-driven lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupKind {
    Address,
    Transaction,
}

impl LookupKind {
    fn slot(self) -> Slot {
        match self {
            Self::Address => Slot::Address,
            Self::Transaction => Slot::Transaction,
        }
    }
}

/// Dashboard controller
pub struct Dashboard {
    api: Arc<dyn BlockchainApi>,
    view: RwLock<Arc<DashboardView>>,
}

impl Dashboard {
    /// Create a dashboard doing lookups on `chain`
    pub fn new(api: Arc<dyn BlockchainApi>, chain: impl Into<String>) -> Self {
        Self {
            api,
            view: RwLock::new(Arc::new(DashboardView::new(chain))),
        }
    }

    /// Current view
    pub fn view(&self) -> Arc<DashboardView> {
        Arc::clone(&self.view.read())
    }

    /// Cards for the current snapshot, empty until general stats loaded
    pub fn cards(&self) -> Vec<ChainCard> {
        let view = self.view();
        view.general
            .state
            .value()
            .map(|snapshot| cards(snapshot, Utc::now()))
            .unwrap_or_default()
    }

    /// Fetch the multi-chain snapshot
    pub async fn load_general_stats(&self) -> Arc<DashboardView> {
        let started = self.transition(DashboardView::general_started);
        let generation = started.generation(Slot::General);

        let outcome = match self.api.general_stats().await {
            Ok(snapshot) => {
                info!(chains = snapshot.len(), "General stats loaded");
                Ok(snapshot)
            }
            Err(e) => {
                warn!(kind = %e.kind(), error = %e, "Failed to fetch general stats");
                Err(e.kind())
            }
        };

        self.transition(|view| view.general_finished(generation, outcome, Utc::now()))
    }

    /// Look up an address on the dashboard chain. Blank input is ignored.
    pub async fn lookup_address(&self, query: &str) -> Arc<DashboardView> {
        self.lookup(LookupKind::Address, query).await
    }

    /// Look up a transaction on the dashboard chain. Blank input is ignored.
    pub async fn lookup_transaction(&self, query: &str) -> Arc<DashboardView> {
        self.lookup(LookupKind::Transaction, query).await
    }

    async fn lookup(&self, kind: LookupKind, query: &str) -> Arc<DashboardView> {
        let query = query.trim();
        if query.is_empty() {
            debug!(lookup = ?kind, "Ignoring empty lookup");
            return self.view();
        }

        let slot = kind.slot();
        let started = self.transition(|view| view.lookup_started(slot, query));
        let generation = started.generation(slot);
        let chain = started.chain.as_str();

        let result = match kind {
            LookupKind::Address => self.api.address(chain, query).await,
            LookupKind::Transaction => self.api.transaction(chain, query).await,
        };

        let outcome = result.map_err(|e| {
            warn!(lookup = ?kind, chain = %chain, kind = %e.kind(), error = %e, "Lookup failed");
            e.kind()
        });

        self.transition(|view| view.lookup_finished(slot, generation, outcome))
    }

    /// Replace the view with `f(current)` and return the new view
    fn transition(&self, f: impl FnOnce(&DashboardView) -> DashboardView) -> Arc<DashboardView> {
        let mut guard = self.view.write();
        let next = Arc::new(f(&guard));
        *guard = Arc::clone(&next);
        next
    }
}

/// Outcome of a finished slot, for callers that only care about the class
pub fn slot_error(view: &DashboardView, slot: Slot) -> Option<ErrorKind> {
    match slot {
        Slot::General => view.general.state.error(),
        Slot::Address => view.address.state.error(),
        Slot::Transaction => view.transaction.state.error(),
    }
}
