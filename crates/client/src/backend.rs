//! The backend port: every REST resource the view models consume.
//!
//! View models talk to this trait, never to `reqwest` directly, so tests can
//! inject a scripted fake. The real implementation is [`crate::rest::RestBackend`].

use async_trait::async_trait;
use thiserror::Error;

use peerrent_account::{
    BuyerSummary, LinkedAccount, NewPaymentMethod, ProfileUpdate, SellerSummary, UserProfile,
};
use peerrent_core::{AccountId, DisputeId, ListingId, TransactionId};
use peerrent_market::{
    AdminDispute, Dispute, DisputeResolution, ImageUpload, ListingDraft, ListingStatus,
    ListingSummary, NewDispute, NewTransaction, Transaction, TransactionDetail, TransactionStatus,
};

/// Transport-level failure talking to the API.
///
/// Never fatal: every variant is caught by the owning view model and turned
/// into section-scoped UI state.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, dropped).
    #[error("network error: {0}")]
    Network(String),

    /// A non-2xx response, with whatever message the body carried.
    #[error("API error ({0}): {1}")]
    Status(u16, String),

    /// A 2xx response whose body did not match the contract.
    #[error("unexpected payload: {0}")]
    Payload(String),
}

impl ApiError {
    /// The inline message a section should display.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status(_, msg) if !msg.is_empty() => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status(404, _))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// REST resources consumed by the client core.
///
/// All endpoints assume an authenticated cookie session established out of
/// band; none of these calls carry credentials themselves.
#[async_trait]
pub trait Backend: Send + Sync {
    // -- account --------------------------------------------------------

    async fn fetch_profile(&self) -> ApiResult<UserProfile>;
    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<()>;
    async fn change_password(&self, current: &str, new: &str) -> ApiResult<()>;
    async fn payment_methods(&self) -> ApiResult<Vec<LinkedAccount>>;
    async fn add_payment_method(&self, method: &NewPaymentMethod) -> ApiResult<()>;
    async fn delete_payment_method(&self, id: &AccountId) -> ApiResult<()>;
    async fn buyer_summary(&self) -> ApiResult<BuyerSummary>;
    async fn seller_summary(&self) -> ApiResult<SellerSummary>;

    // -- transactions ---------------------------------------------------

    async fn transactions(&self) -> ApiResult<Vec<Transaction>>;
    async fn transaction_detail(&self, id: &TransactionId) -> ApiResult<TransactionDetail>;
    async fn update_transaction_status(
        &self,
        id: &TransactionId,
        status: TransactionStatus,
    ) -> ApiResult<()>;
    async fn create_transaction(&self, transaction: &NewTransaction) -> ApiResult<Transaction>;

    // -- listings -------------------------------------------------------

    async fn search_listings(&self) -> ApiResult<Vec<ListingSummary>>;
    async fn create_listing(
        &self,
        draft: &ListingDraft,
        images: &[ImageUpload],
    ) -> ApiResult<ListingId>;
    async fn update_listing_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> ApiResult<()>;

    // -- disputes -------------------------------------------------------

    async fn file_dispute(&self, dispute: &NewDispute) -> ApiResult<Dispute>;
    async fn admin_disputes(&self) -> ApiResult<Vec<AdminDispute>>;
    async fn resolve_dispute(&self, id: &DisputeId) -> ApiResult<DisputeResolution>;
}
