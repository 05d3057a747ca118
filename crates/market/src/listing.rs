//! Listings: search summaries and the creation draft with its validation.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use peerrent_core::{parse_amount, DomainResult, ListingId, UserId};

/// Most images accepted on a single listing.
pub const MAX_LISTING_IMAGES: usize = 5;

/// Listing lifecycle status (matches the backend's check constraint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Pending,
    Closed,
    Completed,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Pending => "pending",
            ListingStatus::Closed => "closed",
            ListingStatus::Completed => "completed",
        }
    }
}

/// A listing as returned by `GET /api/listing/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub listing_id: ListingId,
    #[serde(default)]
    pub seller_id: Option<UserId>,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub t_created: NaiveDateTime,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    #[serde(default)]
    pub list_image: Option<String>,
    #[serde(default)]
    pub meta_tag: Option<String>,
}

/// Street address of a listing, sent as a JSON object in the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// An image attached to the create form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Field-level errors of the listing form, keyed the way the form renders
/// them (one slot per field, `None` meaning valid).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFormErrors {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub images: Option<String>,
    pub submit: Option<String>,
}

impl ListingFormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip.is_none()
            && self.images.is_none()
            && self.submit.is_none()
    }
}

/// The listing creation draft. Price arrives as text (form input) and is
/// parsed during validation; tags are a comma-separated line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub meta_tag: String,
    pub location: Location,
}

impl ListingDraft {
    /// Validate every required field, collecting one error per field.
    ///
    /// Runs before any upload is attempted; a draft with any populated error
    /// slot must never reach the network.
    pub fn validate(&self) -> ListingFormErrors {
        let mut errors = ListingFormErrors::default();

        if self.title.trim().is_empty() {
            errors.title = Some("Title is required".to_string());
        }
        if self.parsed_price().is_err() {
            errors.price = Some("Valid price is required".to_string());
        }
        if self.description.trim().is_empty() {
            errors.description = Some("Description is required".to_string());
        }
        if self.location.address.trim().is_empty() {
            errors.address = Some("Address is required".to_string());
        }
        if self.location.city.trim().is_empty() {
            errors.city = Some("City is required".to_string());
        }
        if self.location.state.trim().is_empty() {
            errors.state = Some("State is required".to_string());
        }
        if self.location.zip.trim().is_empty() {
            errors.zip = Some("ZIP is required".to_string());
        }

        errors
    }

    /// The price field parsed as money.
    pub fn parsed_price(&self) -> DomainResult<Decimal> {
        parse_amount(&self.price)
    }

    /// Comma-separated tag line split into trimmed, non-empty tags.
    pub fn tags(&self) -> Vec<String> {
        self.meta_tag
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}
