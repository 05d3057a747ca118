//! Buyer and seller dashboard summaries.
//!
//! Read-only aggregates served by `GET /api/account/buyer_list` and
//! `GET /api/account/seller_list`. Derived entirely from the backend; never
//! mutated locally.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use peerrent_core::{ListingId, TransactionId};
use peerrent_market::TransactionStatus;

/// Count of transactions per status, as rendered by the dashboard tiles.
pub type StatusSummary = BTreeMap<TransactionStatus, u64>;

/// Aggregate totals of the buyer dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerTotals {
    pub total_transactions: u64,
    pub total_spent: Decimal,
    pub total_fees: Decimal,
}

/// One row of the buyer's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerTransactionRow {
    pub transaction_id: TransactionId,
    /// Server-formatted display date.
    pub date: String,
    pub listing_title: String,
    pub price: Decimal,
    pub service_fee: Decimal,
    pub total_amount: Decimal,
    pub status: TransactionStatus,
}

/// Buyer dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerSummary {
    #[serde(rename = "summary")]
    pub totals: BuyerTotals,
    pub status_summary: StatusSummary,
    pub transactions: Vec<BuyerTransactionRow>,
}

/// Aggregate totals of the seller dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerTotals {
    pub total_sales: Decimal,
    pub net_earnings: Decimal,
    pub total_fees: Decimal,
    pub total_transactions: u64,
}

/// Per-listing sales rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSales {
    pub listing_id: ListingId,
    pub listing_title: String,
    pub total_sales: u64,
    pub total_amount: Decimal,
}

/// One row of the seller's transaction history.
///
/// The seller side reports `net_amount` (price minus fees) where the buyer
/// side reports `total_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerTransactionRow {
    pub transaction_id: TransactionId,
    pub date: String,
    pub price: Decimal,
    pub service_fee: Decimal,
    pub net_amount: Decimal,
    pub status: TransactionStatus,
}

/// Seller dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerSummary {
    #[serde(rename = "summary")]
    pub totals: SellerTotals,
    pub status_summary: StatusSummary,
    pub sales_by_listing: Vec<ListingSales>,
    pub transactions: Vec<SellerTransactionRow>,
}
