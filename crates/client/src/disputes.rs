//! Dispute view models: filing a dispute and the admin resolution queue.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use peerrent_core::{DisputeId, TransactionId};
use peerrent_market::{AdminDispute, Dispute, DisputeStatus, NewDispute, Transaction};

use crate::backend::Backend;
use crate::section::Section;

/// State of the dispute filing page.
#[derive(Debug)]
pub struct DisputeState {
    /// The caller's transactions, feeding the selector.
    pub transactions: Section<Vec<Transaction>>,
    pub transaction_id: String,
    pub description: String,
    pub filing: Section<Dispute>,
}

/// View model for filing a dispute against one of the caller's transactions.
pub struct DisputeViewModel<B> {
    backend: Arc<B>,
    state: Arc<Mutex<DisputeState>>,
}

impl<B: Backend> DisputeViewModel<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(DisputeState {
                transactions: Section::new(),
                transaction_id: String::new(),
                description: String::new(),
                filing: Section::new(),
            })),
        }
    }

    pub async fn state(&self) -> MutexGuard<'_, DisputeState> {
        self.state.lock().await
    }

    pub async fn load_transactions(&self) {
        let Some(token) = self.state.lock().await.transactions.begin_load() else {
            return;
        };

        let result = self.backend.transactions().await;

        self.state.lock().await.transactions.finish_load(
            token,
            result.map_err(|_| "Failed to load transactions".to_string()),
        );
    }

    pub async fn set_transaction_id(&self, id: impl Into<String>) {
        let mut st = self.state.lock().await;
        st.transaction_id = id.into();
        st.filing.clear_error();
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        let mut st = self.state.lock().await;
        st.description = description.into();
        st.filing.clear_error();
    }

    /// File the dispute. The transaction must be one of the caller's own
    /// (visible in the loaded selector) and the description non-empty;
    /// neither check reaches the network.
    pub async fn file_dispute(&self) {
        let (token, dispute) = {
            let mut st = self.state.lock().await;

            let transaction_id = match st.transaction_id.parse::<TransactionId>() {
                Ok(id) => id,
                Err(_) => {
                    st.filing.set_error("Select a transaction");
                    return;
                }
            };
            let visible = st
                .transactions
                .data()
                .is_some_and(|list| list.iter().any(|t| t.transaction_id == transaction_id));
            if !visible {
                st.filing.set_error("Select one of your transactions");
                return;
            }

            let dispute = NewDispute::new(transaction_id, st.description.clone());
            if let Err(err) = dispute.validate() {
                st.filing.set_error(err.to_string());
                return;
            }
            let Some(token) = st.filing.begin_submit() else {
                return;
            };
            (token, dispute)
        };

        let result = self.backend.file_dispute(&dispute).await;

        let mut st = self.state.lock().await;
        match result {
            Ok(created) => {
                st.filing.set_data(created);
                st.filing.finish_submit(token, Ok(()));
                // Fresh form for the next filing.
                st.transaction_id.clear();
                st.description.clear();
            }
            Err(err) => {
                // The entered description stays for retry.
                st.filing.finish_submit(token, Err(err.message()));
            }
        }
    }
}

/// Filter over the admin dispute queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeFilter {
    All,
    Solved,
    Unsolved,
}

/// State of the admin dispute queue.
#[derive(Debug)]
pub struct AdminDisputesState {
    pub disputes: Section<Vec<AdminDispute>>,
    pub filter: DisputeFilter,
    /// Row opened in the detail modal, if any.
    pub selected: Option<DisputeId>,
}

/// View model for the admin dispute queue.
///
/// Who is allowed to resolve a dispute is the backend's call; this model only
/// surfaces the server's verdict and never re-derives authorization locally.
pub struct AdminDisputesViewModel<B> {
    backend: Arc<B>,
    state: Arc<Mutex<AdminDisputesState>>,
}

impl<B: Backend> AdminDisputesViewModel<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(AdminDisputesState {
                disputes: Section::new(),
                filter: DisputeFilter::All,
                selected: None,
            })),
        }
    }

    pub async fn state(&self) -> MutexGuard<'_, AdminDisputesState> {
        self.state.lock().await
    }

    pub async fn load(&self) {
        let Some(token) = self.state.lock().await.disputes.begin_load() else {
            return;
        };

        let result = self.backend.admin_disputes().await;

        self.state.lock().await.disputes.finish_load(
            token,
            result.map_err(|_| "Failed to load disputed transactions".to_string()),
        );
    }

    pub async fn set_filter(&self, filter: DisputeFilter) {
        self.state.lock().await.filter = filter;
    }

    pub async fn select(&self, dispute: Option<DisputeId>) {
        self.state.lock().await.selected = dispute;
    }

    /// Rows matching the active filter.
    pub async fn visible(&self) -> Vec<AdminDispute> {
        let st = self.state.lock().await;
        let Some(rows) = st.disputes.data() else {
            return Vec::new();
        };
        rows.iter()
            .filter(|d| match st.filter {
                DisputeFilter::All => true,
                DisputeFilter::Solved => d.status == DisputeStatus::Solved,
                DisputeFilter::Unsolved => d.status == DisputeStatus::Unsolved,
            })
            .cloned()
            .collect()
    }

    /// Mark a dispute resolved. Legal only while it is still unsolved:
    /// resolution is irreversible and an already-solved row is refused
    /// locally. On success the row takes the server's resolution date; the
    /// list is not refetched.
    pub async fn resolve_dispute(&self, id: DisputeId) {
        let token = {
            let mut st = self.state.lock().await;
            let status = st
                .disputes
                .data()
                .and_then(|rows| rows.iter().find(|d| d.dispute_id == id))
                .map(|d| d.status);
            match status {
                None => {
                    st.disputes.set_error("Dispute not found");
                    return;
                }
                Some(DisputeStatus::Solved) => {
                    st.disputes.set_error("Dispute is already resolved");
                    return;
                }
                Some(DisputeStatus::Unsolved) => {}
            }
            let Some(token) = st.disputes.begin_submit() else {
                return;
            };
            token
        };

        let result = self.backend.resolve_dispute(&id).await;

        let mut st = self.state.lock().await;
        match result {
            Ok(resolution) => {
                st.disputes.finish_submit(token, Ok(()));
                if let Some(row) = st
                    .disputes
                    .data_mut()
                    .and_then(|rows| rows.iter_mut().find(|d| d.dispute_id == id))
                {
                    if let Err(err) = row.resolve(&resolution) {
                        tracing::warn!("dispute {id} resolution not applied: {err}");
                    }
                }
                st.selected = None;
            }
            Err(err) => {
                tracing::warn!("dispute {id} resolution failed: {err}");
                st.disputes.finish_submit(token, Err(err.message()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Phase;
    use crate::testing::{server_error, FakeBackend};

    #[tokio::test]
    async fn filing_requires_a_visible_transaction() {
        let backend = Arc::new(FakeBackend::new());
        let vm = DisputeViewModel::new(backend.clone());
        vm.load_transactions().await;
        vm.set_transaction_id("txn-404").await;
        vm.set_description("Item not as described").await;
        vm.file_dispute().await;

        let st = vm.state().await;
        assert_eq!(st.filing.error(), Some("Select one of your transactions"));
        assert_eq!(backend.calls(), vec!["transactions"]);
    }

    #[tokio::test]
    async fn filing_requires_a_description() {
        let backend = Arc::new(FakeBackend::new());
        let vm = DisputeViewModel::new(backend.clone());
        vm.load_transactions().await;
        vm.set_transaction_id("txn-1").await;
        vm.set_description("   ").await;
        vm.file_dispute().await;

        let st = vm.state().await;
        assert!(st.filing.error().is_some());
        assert_eq!(backend.calls(), vec!["transactions"]);
    }

    #[tokio::test]
    async fn successful_filing_shows_the_dispute_and_resets_the_form() {
        let backend = Arc::new(FakeBackend::new());
        let vm = DisputeViewModel::new(backend);
        vm.load_transactions().await;
        vm.set_transaction_id("txn-1").await;
        vm.set_description("Item not as described").await;
        vm.file_dispute().await;

        let st = vm.state().await;
        let dispute = st.filing.data().unwrap();
        assert_eq!(dispute.status, DisputeStatus::Unsolved);
        assert!(st.transaction_id.is_empty());
        assert!(st.description.is_empty());
    }

    #[tokio::test]
    async fn failed_filing_retains_the_description() {
        let backend = Arc::new(FakeBackend::new());
        backend.dispute_file.push(Err(server_error()));
        let vm = DisputeViewModel::new(backend);
        vm.load_transactions().await;
        vm.set_transaction_id("txn-1").await;
        vm.set_description("Item not as described").await;
        vm.file_dispute().await;

        let st = vm.state().await;
        assert!(st.filing.error().is_some());
        assert_eq!(st.description, "Item not as described");
    }

    #[tokio::test]
    async fn filter_narrows_the_visible_rows() {
        let backend = Arc::new(FakeBackend::new());
        let vm = AdminDisputesViewModel::new(backend);
        vm.load().await;

        assert_eq!(vm.visible().await.len(), 1);
        vm.set_filter(DisputeFilter::Solved).await;
        assert!(vm.visible().await.is_empty());
        vm.set_filter(DisputeFilter::Unsolved).await;
        assert_eq!(vm.visible().await.len(), 1);
    }

    #[tokio::test]
    async fn resolving_applies_the_server_resolution_date() {
        let backend = Arc::new(FakeBackend::new());
        let vm = AdminDisputesViewModel::new(backend.clone());
        vm.load().await;
        vm.select(Some(DisputeId::new("dsp-1"))).await;
        vm.resolve_dispute(DisputeId::new("dsp-1")).await;

        assert_eq!(
            backend.calls(),
            vec!["admin_disputes", "resolve_dispute dsp-1"]
        );
        let st = vm.state().await;
        let row = &st.disputes.data().unwrap()[0];
        assert_eq!(row.status, DisputeStatus::Solved);
        assert!(row.resolution_date.is_some());
        assert!(st.selected.is_none());
    }

    #[tokio::test]
    async fn resolved_disputes_stay_resolved() {
        let backend = Arc::new(FakeBackend::new());
        let vm = AdminDisputesViewModel::new(backend.clone());
        vm.load().await;
        vm.resolve_dispute(DisputeId::new("dsp-1")).await;

        // A second attempt is refused locally: no further request, row intact.
        vm.resolve_dispute(DisputeId::new("dsp-1")).await;

        assert_eq!(
            backend.calls(),
            vec!["admin_disputes", "resolve_dispute dsp-1"]
        );
        let st = vm.state().await;
        assert_eq!(st.disputes.data().unwrap()[0].status, DisputeStatus::Solved);
        assert_eq!(st.disputes.error(), Some("Dispute is already resolved"));
    }

    #[tokio::test]
    async fn failed_resolution_leaves_the_row_unchanged() {
        let backend = Arc::new(FakeBackend::new());
        backend.dispute_resolve.push(Err(server_error()));
        let vm = AdminDisputesViewModel::new(backend);
        vm.load().await;
        vm.resolve_dispute(DisputeId::new("dsp-1")).await;

        let st = vm.state().await;
        let row = &st.disputes.data().unwrap()[0];
        assert_eq!(row.status, DisputeStatus::Unsolved);
        assert!(row.resolution_date.is_none());
        assert!(st.disputes.error().is_some());
        assert_eq!(st.disputes.phase(), Phase::Loaded);
    }
}
