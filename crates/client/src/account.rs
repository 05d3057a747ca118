//! The account page view model.
//!
//! Five independent sections (profile, payment, security, seller dashboard,
//! buyer dashboard) over one shared state machine. Sections load in parallel
//! and fail in isolation; mutations validate locally, submit, then re-fetch,
//! so the server always wins over optimistic local state.
//!
//! State lives behind a `tokio::sync::Mutex` and the lock is never held
//! across an await: each operation transitions under the lock, performs the
//! request, then re-locks to apply the outcome through its epoch token.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};

use peerrent_account::{
    BuyerSummary, LinkedAccount, NewPaymentMethod, PasswordChange, ProfileUpdate, SellerSummary,
    UserProfile,
};
use peerrent_core::AccountId;

use crate::backend::Backend;
use crate::notice::{NoticeBoard, NoticeKind};
use crate::section::{Phase, Section};

/// Sidebar entries; dashboards appear only with the matching role flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTab {
    Profile,
    Payment,
    Security,
    Seller,
    Buyer,
}

/// Mutable state of the account page.
#[derive(Debug)]
pub struct AccountState {
    pub profile: Section<UserProfile>,
    pub profile_form: ProfileUpdate,
    pub security: Section<()>,
    pub password_form: PasswordChange,
    pub password_updated: bool,
    pub payment: Section<Vec<LinkedAccount>>,
    pub buyer: Section<BuyerSummary>,
    pub seller: Section<SellerSummary>,
    pub notices: NoticeBoard,
}

impl AccountState {
    fn new() -> Self {
        Self {
            profile: Section::new(),
            profile_form: ProfileUpdate::default(),
            // Nothing to fetch for the security panel.
            security: Section::loaded(()),
            password_form: PasswordChange::default(),
            password_updated: false,
            payment: Section::new(),
            buyer: Section::new(),
            seller: Section::new(),
            notices: NoticeBoard::new(),
        }
    }

    /// Navigation entries derived solely from the loaded role flags.
    pub fn visible_tabs(&self) -> Vec<AccountTab> {
        let Some(profile) = self.profile.data() else {
            return Vec::new();
        };

        let mut tabs = vec![AccountTab::Profile, AccountTab::Payment, AccountTab::Security];
        if profile.roles.is_seller {
            tabs.push(AccountTab::Seller);
        }
        if profile.roles.is_buyer {
            tabs.push(AccountTab::Buyer);
        }
        tabs
    }
}

/// View model mediating the account page against the backend.
pub struct AccountViewModel<B> {
    backend: Arc<B>,
    state: Arc<Mutex<AccountState>>,
}

impl<B> Clone for AccountViewModel<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            state: self.state.clone(),
        }
    }
}

impl<B: Backend> AccountViewModel<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(AccountState::new())),
        }
    }

    pub async fn state(&self) -> MutexGuard<'_, AccountState> {
        self.state.lock().await
    }

    // -- profile --------------------------------------------------------

    pub async fn load_profile(&self) {
        let Some(token) = self.state.lock().await.profile.begin_load() else {
            return;
        };

        let result = self.backend.fetch_profile().await;

        let mut st = self.state.lock().await;
        let applied = st
            .profile
            .finish_load(token, result.map_err(|e| e.message()));
        if applied {
            // Re-derive the edit form from whatever the server confirmed.
            if let Some(form) = st.profile.data().map(ProfileUpdate::from) {
                st.profile_form = form;
            }
        }
    }

    pub async fn begin_edit_profile(&self) {
        self.state.lock().await.profile.begin_edit();
    }

    pub async fn cancel_edit_profile(&self) {
        let mut st = self.state.lock().await;
        if st.profile.cancel_edit() {
            let form = st.profile.data().map(ProfileUpdate::from);
            if let Some(form) = form {
                st.profile_form = form;
            }
        }
    }

    pub async fn set_profile_form(&self, form: ProfileUpdate) {
        let mut st = self.state.lock().await;
        st.profile_form = form;
        st.profile.clear_error();
    }

    /// Submit the profile form. No partial updates: validation requires every
    /// field, and nothing is sent until it passes.
    pub async fn update_profile(&self) {
        let (token, form) = {
            let mut st = self.state.lock().await;
            if st.profile.phase() != Phase::Editing {
                return;
            }
            if let Err(err) = st.profile_form.validate() {
                st.profile.set_error(err.to_string());
                return;
            }
            let Some(token) = st.profile.begin_submit() else {
                return;
            };
            (token, st.profile_form.clone())
        };

        let result = self.backend.update_profile(&form).await;
        let now = Utc::now();

        {
            let mut st = self.state.lock().await;
            match result {
                Ok(()) => {
                    st.profile.finish_submit(token, Ok(()));
                    st.notices
                        .push(NoticeKind::Success, "Profile updated successfully", now);
                }
                Err(err) => {
                    tracing::warn!("profile update failed: {err}");
                    st.profile.finish_submit(token, Err(err.message()));
                    st.notices
                        .push(NoticeKind::Error, "Failed to update profile", now);
                    return;
                }
            }
        }

        // Source of truth wins: re-fetch, issued only after the mutation
        // resolved.
        self.load_profile().await;
    }

    // -- security -------------------------------------------------------

    pub async fn begin_edit_security(&self) {
        let mut st = self.state.lock().await;
        st.password_updated = false;
        st.security.begin_edit();
    }

    pub async fn cancel_edit_security(&self) {
        let mut st = self.state.lock().await;
        if st.security.cancel_edit() {
            st.password_form.reset();
        }
    }

    pub async fn set_password_form(&self, form: PasswordChange) {
        let mut st = self.state.lock().await;
        st.password_form = form;
        st.security.clear_error();
    }

    /// Validate and submit the password change. Validation failures never
    /// issue a request; server rejections keep the fields for correction.
    pub async fn change_password(&self) {
        let (token, form) = {
            let mut st = self.state.lock().await;
            if st.security.phase() != Phase::Editing {
                return;
            }
            if let Err(err) = st.password_form.validate() {
                st.security.set_error(err.to_string());
                return;
            }
            let Some(token) = st.security.begin_submit() else {
                return;
            };
            (token, st.password_form.clone())
        };

        let result = self
            .backend
            .change_password(&form.current_password, &form.new_password)
            .await;

        let mut st = self.state.lock().await;
        match result {
            Ok(()) => {
                st.security.finish_submit(token, Ok(()));
                st.password_form.reset();
                st.password_updated = true;
            }
            Err(err) => {
                tracing::warn!("password change rejected: {err}");
                st.security.finish_submit(token, Err(err.message()));
            }
        }
    }

    // -- payment methods ------------------------------------------------

    pub async fn load_payment_methods(&self) {
        let Some(token) = self.state.lock().await.payment.begin_load() else {
            return;
        };

        let result = self.backend.payment_methods().await;

        self.state
            .lock()
            .await
            .payment
            .finish_load(token, result.map_err(|e| e.message()));
    }

    pub async fn begin_add_payment(&self) {
        self.state.lock().await.payment.begin_edit();
    }

    pub async fn cancel_add_payment(&self) {
        self.state.lock().await.payment.cancel_edit();
    }

    /// Add a payment method, then re-fetch the list. Adds and deletes are
    /// serialized per session by the section's submit guard.
    pub async fn add_payment_method(&self, method: NewPaymentMethod) {
        let token = {
            let mut st = self.state.lock().await;
            if st.payment.phase() != Phase::Editing {
                return;
            }
            if let Err(err) = method.validate() {
                st.payment.set_error(err.to_string());
                return;
            }
            let Some(token) = st.payment.begin_submit() else {
                return;
            };
            token
        };

        let result = self.backend.add_payment_method(&method).await;

        {
            let mut st = self.state.lock().await;
            match result {
                Ok(()) => {
                    st.payment.finish_submit(token, Ok(()));
                }
                Err(err) => {
                    st.payment.finish_submit(token, Err(err.message()));
                    return;
                }
            }
        }

        self.load_payment_methods().await;
    }

    /// Delete a linked payment method by id. The id must reference a row in
    /// the currently loaded list.
    pub async fn delete_payment_method(&self, id: AccountId) {
        let token = {
            let mut st = self.state.lock().await;
            let known = st
                .payment
                .data()
                .is_some_and(|list| list.iter().any(|a| a.account_id == id));
            if !known {
                st.payment.set_error("Payment method not found");
                return;
            }
            let Some(token) = st.payment.begin_submit() else {
                return;
            };
            token
        };

        let result = self.backend.delete_payment_method(&id).await;

        {
            let mut st = self.state.lock().await;
            match result {
                Ok(()) => {
                    st.payment.finish_submit(token, Ok(()));
                }
                Err(err) => {
                    // The list is left exactly as it was.
                    st.payment.finish_submit(token, Err(err.message()));
                    return;
                }
            }
        }

        self.load_payment_methods().await;
    }

    // -- dashboards -----------------------------------------------------

    pub async fn load_buyer_summary(&self) {
        let Some(token) = ({
            let mut st = self.state.lock().await;
            if !st.profile.data().is_some_and(|p| p.roles.is_buyer) {
                st.buyer.set_error("Buyer dashboard requires the buyer role");
                None
            } else {
                st.buyer.begin_load()
            }
        }) else {
            return;
        };

        let result = self.backend.buyer_summary().await;

        self.state
            .lock()
            .await
            .buyer
            .finish_load(token, result.map_err(|e| e.message()));
    }

    pub async fn load_seller_summary(&self) {
        let Some(token) = ({
            let mut st = self.state.lock().await;
            if !st.profile.data().is_some_and(|p| p.roles.is_seller) {
                st.seller
                    .set_error("Seller dashboard requires the seller role");
                None
            } else {
                st.seller.begin_load()
            }
        }) else {
            return;
        };

        let result = self.backend.seller_summary().await;

        self.state
            .lock()
            .await
            .seller
            .finish_load(token, result.map_err(|e| e.message()));
    }
}
