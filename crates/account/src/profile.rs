//! User profile: identity fields, role flags, and the profile edit form.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use peerrent_core::{DomainError, DomainResult, UserId};

/// Role flags attached to a profile.
///
/// Navigation options are computed solely from these flags: the seller and
/// buyer dashboards are visible iff the corresponding flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub is_buyer: bool,
    pub is_seller: bool,
    #[serde(default)]
    pub is_admin: bool,
}

/// The logged-in user's profile as served by `GET /api/account/profile`.
///
/// Immutable on the client except through an explicit save
/// ([`ProfileUpdate`]); the latest fetched snapshot is the rollback target
/// while an edit is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    /// Timestamps are naive on the wire (server local time, no offset).
    pub t_created: NaiveDateTime,
    #[serde(default)]
    pub t_last_act: Option<NaiveDateTime>,
    #[serde(default)]
    pub acc_status: Option<String>,
    pub roles: Roles,
}

/// Body of `PUT /api/account/profile`.
///
/// The update endpoint takes camelCase keys, unlike the snake_case read side.
/// Partial updates are not supported: every field must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ProfileUpdate {
    /// All fields are required; there are no partial-field updates.
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{label} is required")));
            }
        }
        Ok(())
    }
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(profile: &UserProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone_number.clone(),
            address: profile.address.clone(),
        }
    }
}
