//! `peerrent-client`
//!
//! **Responsibility:** headless view models for the PeerRent web client.
//!
//! This crate provides:
//! - A per-section load/edit/submit state machine with rollback snapshots
//! - The account page view model (profile, payment, security, dashboards)
//! - Listing, transaction, and dispute page view models
//! - The [`backend::Backend`] port and its `reqwest` implementation
//!
//! The client is a **thin shell** around the PeerRent API: every mutation
//! validates locally, submits, and re-fetches; the server always wins.

pub mod account;
pub mod backend;
pub mod disputes;
pub mod listing_form;
pub mod notice;
pub mod rest;
pub mod search;
pub mod section;
pub mod transaction;

#[cfg(test)]
pub(crate) mod testing;

pub use account::{AccountState, AccountTab, AccountViewModel};
pub use backend::{ApiError, ApiResult, Backend};
pub use disputes::{AdminDisputesViewModel, DisputeFilter, DisputeViewModel};
pub use listing_form::{ListingFormViewModel, NoopObjectUrls, ObjectUrls};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use rest::RestBackend;
pub use search::{ListingSearchViewModel, PriceBand, SortKey};
pub use section::{Phase, Section};
pub use transaction::{TransactionComposer, TransactionDetailViewModel};
