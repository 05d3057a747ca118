//! `peerrent-account` — account-side entities and local validation rules.
//!
//! Everything the logged-in user's account screens work with: the profile and
//! its role flags, password changes, linked payment methods, and the buyer and
//! seller dashboard summaries. All validation here runs before any request is
//! sent; the wire shapes mirror the backend contract exactly.

pub mod password;
pub mod payment;
pub mod profile;
pub mod summary;

pub use password::PasswordChange;
pub use payment::{LinkedAccount, NewPaymentMethod, PaymentDetails};
pub use profile::{ProfileUpdate, Roles, UserProfile};
pub use summary::{BuyerSummary, SellerSummary};
