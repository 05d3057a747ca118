//! Transactions between a buyer and a seller over a listing.

use chrono::NaiveDate;
use core::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use peerrent_core::{DomainError, ListingId, TransactionId, UserId};

use crate::fees::service_fee;

/// Transaction status as selectable on the detail page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
    Refunded,
}

impl TransactionStatus {
    /// Every status, in the order the status selector offers them.
    pub const ALL: [TransactionStatus; 5] = [
        TransactionStatus::Pending,
        TransactionStatus::Processing,
        TransactionStatus::Completed,
        TransactionStatus::Cancelled,
        TransactionStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "processing" => Ok(TransactionStatus::Processing),
            "completed" => Ok(TransactionStatus::Completed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            "refunded" => Ok(TransactionStatus::Refunded),
            other => Err(DomainError::validation(format!(
                "unknown transaction status: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction record.
///
/// Only `status` is mutable after creation, and only through the explicit
/// status update operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub listing_id: ListingId,
    pub t_date: NaiveDate,
    pub agreed_price: Decimal,
    pub serv_fee: Decimal,
    pub status: TransactionStatus,
}

impl Transaction {
    /// What the buyer pays: agreed price plus service fee.
    pub fn total(&self) -> Decimal {
        self.agreed_price + self.serv_fee
    }
}

/// Body of `POST /api/transaction`.
///
/// Constructed only through [`NewTransaction::new`], which derives the fee
/// from the price; callers cannot supply their own fee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub listing_id: ListingId,
    pub agreed_price: Decimal,
    pub serv_fee: Decimal,
    pub t_date: NaiveDate,
    pub status: TransactionStatus,
}

impl NewTransaction {
    pub fn new(listing_id: ListingId, agreed_price: Decimal, t_date: NaiveDate) -> Self {
        Self {
            listing_id,
            serv_fee: service_fee(agreed_price),
            agreed_price,
            t_date,
            status: TransactionStatus::Pending,
        }
    }

    pub fn total(&self) -> Decimal {
        self.agreed_price + self.serv_fee
    }
}

/// Read model of `GET /api/account/transaction/{id}`.
///
/// Richer than the list row: the detail page also shows the counterparty and
/// the payment method used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
    /// Server-formatted display date.
    pub date: String,
    pub agreed_price: Decimal,
    pub service_fee: Decimal,
    pub total_amount: Decimal,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub buyer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
