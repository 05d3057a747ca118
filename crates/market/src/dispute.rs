//! Disputes filed against transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use peerrent_core::{DisputeId, DomainError, DomainResult, TransactionId, UserId};

use crate::transaction::TransactionStatus;

/// Dispute status. Transitions only forward: unsolved -> solved, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeStatus {
    Unsolved,
    Solved,
}

/// A dispute as returned by `POST /api/dispute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    pub dispute_id: DisputeId,
    pub transaction_id: TransactionId,
    #[serde(default)]
    pub admin_id: Option<UserId>,
    pub description: String,
    pub status: DisputeStatus,
    #[serde(default)]
    pub resolution_date: Option<NaiveDate>,
}

/// Body of `POST /api/dispute`. Always filed as `unsolved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDispute {
    pub transaction_id: TransactionId,
    pub description: String,
    pub status: DisputeStatus,
}

impl NewDispute {
    pub fn new(transaction_id: TransactionId, description: impl Into<String>) -> Self {
        Self {
            transaction_id,
            description: description.into(),
            status: DisputeStatus::Unsolved,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        Ok(())
    }
}

/// One row of the admin dispute queue (`GET /api/admin/disputes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminDispute {
    pub dispute_id: DisputeId,
    pub transaction_id: TransactionId,
    pub filed_by: String,
    pub amount: Decimal,
    pub status: DisputeStatus,
    pub transaction_status: TransactionStatus,
    pub description: String,
    #[serde(default)]
    pub resolution_date: Option<NaiveDate>,
}

/// Response of `PUT /api/admin/disputes/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeResolution {
    pub resolution_date: NaiveDate,
}

impl AdminDispute {
    /// Apply a resolution. Legal only while the dispute is still unsolved;
    /// there is no way back once solved.
    pub fn resolve(&mut self, resolution: &DisputeResolution) -> DomainResult<()> {
        if self.status == DisputeStatus::Solved {
            return Err(DomainError::conflict("dispute is already resolved"));
        }
        self.status = DisputeStatus::Solved;
        self.resolution_date = Some(resolution.resolution_date);
        Ok(())
    }
}
