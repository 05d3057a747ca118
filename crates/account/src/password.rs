//! Password change form and its local validation.

use peerrent_core::{DomainError, DomainResult};

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// The security panel's three-field form.
///
/// Validation runs entirely client-side; no request is issued until it
/// passes. Only `current_password` and `new_password` ever reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> DomainResult<()> {
        if self.current_password.is_empty()
            || self.new_password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(DomainError::validation("All fields are required"));
        }

        if self.new_password != self.confirm_password {
            return Err(DomainError::validation("New passwords do not match"));
        }

        if self.new_password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "New password must be at least 8 characters long",
            ));
        }

        Ok(())
    }

    /// Clear all fields (done after a successful change).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
