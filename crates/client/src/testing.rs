//! Scripted in-memory backend for view-model tests.
//!
//! Each endpoint has a queue of scripted results; when the queue is empty the
//! call falls back to a canned fixture. Every call is recorded so tests can
//! assert what went over the wire (and, just as often, what did not).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;

use peerrent_account::{
    payment::NewPaymentDetails, BuyerSummary, LinkedAccount, NewPaymentMethod, PaymentDetails,
    ProfileUpdate, Roles, SellerSummary, UserProfile,
};
use peerrent_core::{AccountId, DisputeId, ListingId, TransactionId, UserId};
use peerrent_market::{
    AdminDispute, Dispute, DisputeResolution, DisputeStatus, ImageUpload, ListingDraft,
    ListingStatus, ListingSummary, NewDispute, NewTransaction, Transaction, TransactionDetail,
    TransactionStatus,
};

use crate::backend::{ApiError, ApiResult, Backend};

/// Queue of scripted results for one endpoint.
pub struct Scripted<T>(Mutex<VecDeque<ApiResult<T>>>);

impl<T: Clone> Scripted<T> {
    fn new() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }

    pub fn push(&self, result: ApiResult<T>) {
        self.0.lock().unwrap().push_back(result);
    }

    fn next_or(&self, default: impl FnOnce() -> T) -> ApiResult<T> {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(default()))
    }
}

pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    pub profile: Scripted<UserProfile>,
    pub profile_update: Scripted<()>,
    pub password_change: Scripted<()>,
    pub payments: Scripted<Vec<LinkedAccount>>,
    pub payment_add: Scripted<()>,
    pub payment_delete: Scripted<()>,
    pub buyer: Scripted<BuyerSummary>,
    pub seller: Scripted<SellerSummary>,
    pub transaction_list: Scripted<Vec<Transaction>>,
    pub detail: Scripted<TransactionDetail>,
    pub status_update: Scripted<()>,
    pub transaction_create: Scripted<Transaction>,
    pub listings: Scripted<Vec<ListingSummary>>,
    pub listing_create: Scripted<ListingId>,
    pub listing_status: Scripted<()>,
    pub dispute_file: Scripted<Dispute>,
    pub disputes: Scripted<Vec<AdminDispute>>,
    pub dispute_resolve: Scripted<DisputeResolution>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            profile: Scripted::new(),
            profile_update: Scripted::new(),
            password_change: Scripted::new(),
            payments: Scripted::new(),
            payment_add: Scripted::new(),
            payment_delete: Scripted::new(),
            buyer: Scripted::new(),
            seller: Scripted::new(),
            transaction_list: Scripted::new(),
            detail: Scripted::new(),
            status_update: Scripted::new(),
            transaction_create: Scripted::new(),
            listings: Scripted::new(),
            listing_create: Scripted::new(),
            listing_status: Scripted::new(),
            dispute_file: Scripted::new(),
            disputes: Scripted::new(),
            dispute_resolve: Scripted::new(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status(500, "Internal server error".to_string())
}

pub fn sample_profile() -> UserProfile {
    UserProfile {
        user_id: UserId::new("u-17"),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone_number: "+1 555 0100".to_string(),
        address: "12 Analytical Way".to_string(),
        t_created: NaiveDateTime::parse_from_str("2024-03-01T12:00:00", "%Y-%m-%dT%H:%M:%S")
            .unwrap(),
        t_last_act: None,
        acc_status: Some("active".to_string()),
        roles: Roles {
            is_buyer: true,
            is_seller: true,
            is_admin: false,
        },
    }
}

pub fn sample_payment_methods() -> Vec<LinkedAccount> {
    vec![LinkedAccount {
        account_id: AccountId::new("acc-9"),
        details: PaymentDetails::CreditCard {
            cc_num: "****4242".to_string(),
            exp_date: "03/27".to_string(),
        },
        billing_address: "12 Analytical Way".to_string(),
    }]
}

pub fn sample_new_payment_method() -> NewPaymentMethod {
    NewPaymentMethod {
        details: NewPaymentDetails::BankAccount {
            bank_acc_num: "000123456789".to_string(),
            routing_num: "110000000".to_string(),
        },
        billing_address: "12 Analytical Way".to_string(),
    }
}

pub fn sample_buyer_summary() -> BuyerSummary {
    serde_json::from_value(serde_json::json!({
        "summary": {"total_transactions": 1, "total_spent": 2000.00, "total_fees": 100.00},
        "status_summary": {"completed": 1},
        "transactions": [{
            "transaction_id": "txn-1",
            "date": "2024-11-02",
            "listing_title": "Modern Apartment in Downtown",
            "price": 2000.00,
            "service_fee": 100.00,
            "total_amount": 2100.00,
            "status": "completed"
        }]
    }))
    .unwrap()
}

pub fn sample_seller_summary() -> SellerSummary {
    serde_json::from_value(serde_json::json!({
        "summary": {
            "total_sales": 2000.00,
            "net_earnings": 1900.00,
            "total_fees": 100.00,
            "total_transactions": 1
        },
        "status_summary": {"completed": 1},
        "sales_by_listing": [],
        "transactions": []
    }))
    .unwrap()
}

pub fn sample_transaction() -> Transaction {
    Transaction {
        transaction_id: TransactionId::new("txn-1"),
        buyer_id: UserId::new("u-17"),
        seller_id: UserId::new("u-3"),
        listing_id: ListingId::new("lst-7"),
        t_date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
        agreed_price: dec!(2000.00),
        serv_fee: dec!(100.00),
        status: TransactionStatus::Pending,
    }
}

pub fn sample_detail() -> TransactionDetail {
    TransactionDetail {
        transaction_id: TransactionId::new("txn-1"),
        status: TransactionStatus::Pending,
        date: "2024-11-02".to_string(),
        agreed_price: dec!(2000.00),
        service_fee: dec!(100.00),
        total_amount: dec!(2100.00),
        payment_method: Some("Credit Card ending in 4242".to_string()),
        buyer_name: Some("Ada Lovelace".to_string()),
        buyer_email: Some("ada@example.com".to_string()),
        notes: None,
    }
}

pub fn sample_listing_summary() -> ListingSummary {
    serde_json::from_value(serde_json::json!({
        "listing_id": "lst-7",
        "title": "Modern Apartment in Downtown",
        "description": "Beautiful 2-bedroom apartment",
        "price": 2500.00,
        "t_created": "2024-03-01T12:00:00",
        "status": "active"
    }))
    .unwrap()
}

pub fn sample_dispute() -> Dispute {
    Dispute {
        dispute_id: DisputeId::new("dsp-1"),
        transaction_id: TransactionId::new("txn-1"),
        admin_id: None,
        description: "Item not as described".to_string(),
        status: DisputeStatus::Unsolved,
        resolution_date: None,
    }
}

pub fn sample_admin_disputes() -> Vec<AdminDispute> {
    serde_json::from_value(serde_json::json!([{
        "dispute_id": "dsp-1",
        "transaction_id": "txn-1",
        "filed_by": "ada@example.com",
        "amount": 2100.00,
        "status": "unsolved",
        "transaction_status": "completed",
        "description": "Item not as described"
    }]))
    .unwrap()
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        self.record("fetch_profile");
        self.profile.next_or(sample_profile)
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> ApiResult<()> {
        self.record("update_profile");
        self.profile_update.next_or(|| ())
    }

    async fn change_password(&self, _current: &str, _new: &str) -> ApiResult<()> {
        self.record("change_password");
        self.password_change.next_or(|| ())
    }

    async fn payment_methods(&self) -> ApiResult<Vec<LinkedAccount>> {
        self.record("payment_methods");
        self.payments.next_or(sample_payment_methods)
    }

    async fn add_payment_method(&self, _method: &NewPaymentMethod) -> ApiResult<()> {
        self.record("add_payment_method");
        self.payment_add.next_or(|| ())
    }

    async fn delete_payment_method(&self, id: &AccountId) -> ApiResult<()> {
        self.record(format!("delete_payment_method {id}"));
        self.payment_delete.next_or(|| ())
    }

    async fn buyer_summary(&self) -> ApiResult<BuyerSummary> {
        self.record("buyer_summary");
        self.buyer.next_or(sample_buyer_summary)
    }

    async fn seller_summary(&self) -> ApiResult<SellerSummary> {
        self.record("seller_summary");
        self.seller.next_or(sample_seller_summary)
    }

    async fn transactions(&self) -> ApiResult<Vec<Transaction>> {
        self.record("transactions");
        self.transaction_list.next_or(|| vec![sample_transaction()])
    }

    async fn transaction_detail(&self, id: &TransactionId) -> ApiResult<TransactionDetail> {
        self.record(format!("transaction_detail {id}"));
        self.detail.next_or(sample_detail)
    }

    async fn update_transaction_status(
        &self,
        id: &TransactionId,
        status: TransactionStatus,
    ) -> ApiResult<()> {
        self.record(format!("update_transaction_status {id} {status}"));
        self.status_update.next_or(|| ())
    }

    async fn create_transaction(&self, _transaction: &NewTransaction) -> ApiResult<Transaction> {
        self.record("create_transaction");
        self.transaction_create.next_or(sample_transaction)
    }

    async fn search_listings(&self) -> ApiResult<Vec<ListingSummary>> {
        self.record("search_listings");
        self.listings.next_or(|| vec![sample_listing_summary()])
    }

    async fn create_listing(
        &self,
        _draft: &ListingDraft,
        images: &[ImageUpload],
    ) -> ApiResult<ListingId> {
        self.record(format!("create_listing images={}", images.len()));
        self.listing_create.next_or(|| ListingId::new("lst-7"))
    }

    async fn update_listing_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> ApiResult<()> {
        self.record(format!("update_listing_status {id} {}", status.as_str()));
        self.listing_status.next_or(|| ())
    }

    async fn file_dispute(&self, _dispute: &NewDispute) -> ApiResult<Dispute> {
        self.record("file_dispute");
        self.dispute_file.next_or(sample_dispute)
    }

    async fn admin_disputes(&self) -> ApiResult<Vec<AdminDispute>> {
        self.record("admin_disputes");
        self.disputes.next_or(sample_admin_disputes)
    }

    async fn resolve_dispute(&self, id: &DisputeId) -> ApiResult<DisputeResolution> {
        self.record(format!("resolve_dispute {id}"));
        self.dispute_resolve.next_or(|| DisputeResolution {
            resolution_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        })
    }
}
