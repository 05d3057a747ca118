//! Linked payment methods.
//!
//! The backend stores one row per linked account with a variant payload keyed
//! by `account_type`. Both wire shapes are modelled as tagged enums so every
//! consumption site matches exhaustively; an unknown tag fails
//! deserialization at the API boundary instead of leaking an untyped map.

use serde::{Deserialize, Serialize};

use peerrent_core::{AccountId, DomainError, DomainResult};

/// Variant payload of a linked account as served by
/// `GET /api/account/payment-methods`.
///
/// The read side nests the variant fields under `details` and masks the
/// sensitive digits server-side (`****1234`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "account_type", content = "details", rename_all = "snake_case")]
pub enum PaymentDetails {
    CreditCard { cc_num: String, exp_date: String },
    BankAccount { bank_acc_num: String, routing_num: String },
}

/// A linked payment account.
///
/// Never mutated in place: a "change" is a delete followed by an add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub account_id: AccountId,
    #[serde(flatten)]
    pub details: PaymentDetails,
    pub billing_address: String,
}

impl LinkedAccount {
    /// Short human label used by list rows ("Credit Card", "Bank Account").
    pub fn kind_label(&self) -> &'static str {
        match &self.details {
            PaymentDetails::CreditCard { .. } => "Credit Card",
            PaymentDetails::BankAccount { .. } => "Bank Account",
        }
    }
}

/// Body of `POST /api/account/payment-methods`.
///
/// Unlike the read side, the create endpoint takes the variant fields at the
/// top level alongside `account_type` and `billing_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPaymentMethod {
    #[serde(flatten)]
    pub details: NewPaymentDetails,
    pub billing_address: String,
}

/// Variant fields of a payment method being added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "account_type", rename_all = "snake_case")]
pub enum NewPaymentDetails {
    CreditCard { cc_num: String, exp_date: String },
    BankAccount { bank_acc_num: String, routing_num: String },
}

impl NewPaymentMethod {
    /// Billing address and the selected variant's fields are all required.
    pub fn validate(&self) -> DomainResult<()> {
        if self.billing_address.trim().is_empty() {
            return Err(DomainError::validation("billing address is required"));
        }

        match &self.details {
            NewPaymentDetails::CreditCard { cc_num, exp_date } => {
                if cc_num.trim().is_empty() {
                    return Err(DomainError::validation("card number is required"));
                }
                if exp_date.trim().is_empty() {
                    return Err(DomainError::validation("expiry date is required"));
                }
            }
            NewPaymentDetails::BankAccount {
                bank_acc_num,
                routing_num,
            } => {
                if bank_acc_num.trim().is_empty() {
                    return Err(DomainError::validation("account number is required"));
                }
                if routing_num.trim().is_empty() {
                    return Err(DomainError::validation("routing number is required"));
                }
            }
        }

        Ok(())
    }
}
