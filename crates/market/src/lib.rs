//! `peerrent-market` — marketplace entities and rules.
//!
//! Listings, transactions, and disputes, plus the pricing policy that ties
//! them together (the flat 5% service fee). Pure domain logic: no network,
//! no UI state.

pub mod dispute;
pub mod fees;
pub mod listing;
pub mod transaction;

pub use dispute::{AdminDispute, Dispute, DisputeResolution, DisputeStatus, NewDispute};
pub use fees::{service_fee, total_with_fee, SERVICE_FEE_RATE};
pub use listing::{
    ImageUpload, ListingDraft, ListingFormErrors, ListingStatus, ListingSummary, Location,
    MAX_LISTING_IMAGES,
};
pub use transaction::{NewTransaction, Transaction, TransactionDetail, TransactionStatus};
