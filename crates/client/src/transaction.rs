//! Transaction view models: the creation form and the detail page.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, MutexGuard};

use peerrent_core::{parse_amount, ListingId, TransactionId};
use peerrent_market::{
    service_fee, ListingStatus, NewTransaction, Transaction, TransactionDetail, TransactionStatus,
};

use crate::backend::Backend;
use crate::section::Section;

/// State of the transaction creation form.
///
/// The service fee is derived from the price on every edit and is read-only;
/// the request body is built through [`NewTransaction::new`], which recomputes
/// it from the price regardless of what the form shows.
#[derive(Debug)]
pub struct ComposerState {
    pub listing_id: String,
    pub agreed_price: String,
    pub serv_fee: Option<Decimal>,
    pub t_date: NaiveDate,
    pub submission: Section<Transaction>,
}

/// View model for creating a transaction against a listing.
pub struct TransactionComposer<B> {
    backend: Arc<B>,
    state: Arc<Mutex<ComposerState>>,
}

impl<B: Backend> TransactionComposer<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_date(backend, Utc::now().date_naive())
    }

    /// Like [`Self::new`] but with an explicit initial date.
    pub fn with_date(backend: Arc<B>, t_date: NaiveDate) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(ComposerState {
                listing_id: String::new(),
                agreed_price: String::new(),
                serv_fee: None,
                t_date,
                submission: Section::new(),
            })),
        }
    }

    pub async fn state(&self) -> MutexGuard<'_, ComposerState> {
        self.state.lock().await
    }

    /// Pre-fill the listing id (the form is usually reached from a listing).
    pub async fn for_listing(&self, listing_id: &ListingId) {
        self.state.lock().await.listing_id = listing_id.to_string();
    }

    pub async fn set_listing_id(&self, listing_id: impl Into<String>) {
        self.state.lock().await.listing_id = listing_id.into();
    }

    /// Update the price and recompute the read-only fee.
    pub async fn set_agreed_price(&self, input: impl Into<String>) {
        let input = input.into();
        let mut st = self.state.lock().await;
        st.serv_fee = parse_amount(&input).ok().map(service_fee);
        st.agreed_price = input;
    }

    pub async fn set_date(&self, t_date: NaiveDate) {
        self.state.lock().await.t_date = t_date;
    }

    /// Create the transaction, then take the listing off the market.
    ///
    /// The listing status PATCH is issued only after the create resolves
    /// successfully; a failed create leaves the listing untouched.
    pub async fn submit(&self) {
        let (token, new_txn) = {
            let mut st = self.state.lock().await;

            let listing_id = match st.listing_id.trim().parse::<ListingId>() {
                Ok(id) => id,
                Err(err) => {
                    st.submission.set_error(err.to_string());
                    return;
                }
            };
            let price = match parse_amount(&st.agreed_price) {
                Ok(price) => price,
                Err(err) => {
                    st.submission.set_error(err.to_string());
                    return;
                }
            };
            let Some(token) = st.submission.begin_submit() else {
                return;
            };
            (token, NewTransaction::new(listing_id, price, st.t_date))
        };

        match self.backend.create_transaction(&new_txn).await {
            Ok(transaction) => {
                let listing_id = transaction.listing_id.clone();
                {
                    let mut st = self.state.lock().await;
                    st.submission.set_data(transaction);
                    st.submission.finish_submit(token, Ok(()));
                }

                if let Err(err) = self
                    .backend
                    .update_listing_status(&listing_id, ListingStatus::Pending)
                    .await
                {
                    tracing::warn!("listing status update failed after create: {err}");
                    self.state.lock().await.submission.set_error(err.message());
                }
            }
            Err(err) => {
                let mut st = self.state.lock().await;
                st.submission.finish_submit(token, Err(err.message()));
            }
        }
    }
}

/// State of the transaction detail page.
#[derive(Debug)]
pub struct DetailState {
    pub transaction_id: TransactionId,
    pub detail: Section<TransactionDetail>,
    /// Current value of the status selector.
    pub selected_status: Option<TransactionStatus>,
}

/// View model for the transaction detail page and its status selector.
pub struct TransactionDetailViewModel<B> {
    backend: Arc<B>,
    state: Arc<Mutex<DetailState>>,
}

impl<B: Backend> TransactionDetailViewModel<B> {
    pub fn new(backend: Arc<B>, transaction_id: TransactionId) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(DetailState {
                transaction_id,
                detail: Section::new(),
                selected_status: None,
            })),
        }
    }

    pub async fn state(&self) -> MutexGuard<'_, DetailState> {
        self.state.lock().await
    }

    pub async fn load(&self) {
        let (token, id) = {
            let mut st = self.state.lock().await;
            let Some(token) = st.detail.begin_load() else {
                return;
            };
            (token, st.transaction_id.clone())
        };

        let result = self.backend.transaction_detail(&id).await;

        let mut st = self.state.lock().await;
        let st = &mut *st;
        if st
            .detail
            .finish_load(token, result.map_err(|e| e.message()))
        {
            st.selected_status = st.detail.data().map(|d| d.status);
        }
    }

    pub async fn set_selected_status(&self, status: TransactionStatus) {
        self.state.lock().await.selected_status = Some(status);
    }

    /// Push the selected status to the server.
    ///
    /// A no-op when the selection equals the current status. On success only
    /// the local record is updated; deliberately no refetch of the whole
    /// page. On failure the selector reverts to the server-confirmed value.
    pub async fn update_status(&self) {
        let (token, id, new_status) = {
            let mut st = self.state.lock().await;
            let Some(current) = st.detail.data().map(|d| d.status) else {
                return;
            };
            let Some(selected) = st.selected_status else {
                return;
            };
            if selected == current {
                return;
            }
            let Some(token) = st.detail.begin_submit() else {
                return;
            };
            (token, st.transaction_id.clone(), selected)
        };

        let result = self.backend.update_transaction_status(&id, new_status).await;

        let mut st = self.state.lock().await;
        let st = &mut *st;
        match result {
            Ok(()) => {
                st.detail.finish_submit(token, Ok(()));
                if let Some(detail) = st.detail.data_mut() {
                    detail.status = new_status;
                }
            }
            Err(err) => {
                tracing::warn!("status update failed for {id}: {err}");
                st.detail.finish_submit(token, Err(err.message()));
                st.selected_status = st.detail.data().map(|d| d.status);
            }
        }
    }
}
