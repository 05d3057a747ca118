//! The listing creation form.
//!
//! Field validation runs before any upload is attempted, the image set is
//! capped, and preview URLs are scoped resources: allocated through the
//! injected [`ObjectUrls`] port and revoked whenever they are superseded or
//! the form is torn down, so the host never leaks browser-level handles.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use peerrent_core::ListingId;
use peerrent_market::{ImageUpload, ListingDraft, ListingFormErrors, Location, MAX_LISTING_IMAGES};

use crate::backend::Backend;
use crate::section::Section;

/// Host port for image preview handles (object URLs in a browser shell).
pub trait ObjectUrls: Send + Sync {
    fn create_url(&self, image: &ImageUpload) -> String;
    fn revoke_url(&self, url: &str);
}

/// For hosts without a preview surface.
pub struct NoopObjectUrls;

impl ObjectUrls for NoopObjectUrls {
    fn create_url(&self, image: &ImageUpload) -> String {
        format!("preview:{}", image.file_name)
    }

    fn revoke_url(&self, _url: &str) {}
}

/// Mutable state of the listing form.
pub struct ListingFormState {
    pub draft: ListingDraft,
    pub images: Vec<ImageUpload>,
    pub previews: Vec<String>,
    pub errors: ListingFormErrors,
    pub submission: Section<ListingId>,
    urls: Arc<dyn ObjectUrls>,
}

impl ListingFormState {
    fn revoke_previews(&mut self) {
        for url in self.previews.drain(..) {
            self.urls.revoke_url(&url);
        }
    }
}

impl Drop for ListingFormState {
    fn drop(&mut self) {
        // Teardown backstop: whatever is still allocated gets released.
        self.revoke_previews();
    }
}

/// View model for creating a listing.
pub struct ListingFormViewModel<B> {
    backend: Arc<B>,
    state: Arc<Mutex<ListingFormState>>,
}

impl<B: Backend> ListingFormViewModel<B> {
    pub fn new(backend: Arc<B>, urls: Arc<dyn ObjectUrls>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(ListingFormState {
                draft: ListingDraft::default(),
                images: Vec::new(),
                previews: Vec::new(),
                errors: ListingFormErrors::default(),
                submission: Section::new(),
                urls,
            })),
        }
    }

    pub async fn state(&self) -> MutexGuard<'_, ListingFormState> {
        self.state.lock().await
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        let mut st = self.state.lock().await;
        st.draft.title = title.into();
        st.errors.title = None;
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        let mut st = self.state.lock().await;
        st.draft.description = description.into();
        st.errors.description = None;
    }

    pub async fn set_price(&self, price: impl Into<String>) {
        let mut st = self.state.lock().await;
        st.draft.price = price.into();
        st.errors.price = None;
    }

    pub async fn set_meta_tag(&self, meta_tag: impl Into<String>) {
        self.state.lock().await.draft.meta_tag = meta_tag.into();
    }

    pub async fn set_location(&self, location: Location) {
        let mut st = self.state.lock().await;
        st.draft.location = location;
        st.errors.address = None;
        st.errors.city = None;
        st.errors.state = None;
        st.errors.zip = None;
    }

    /// Replace the attached images.
    ///
    /// More than [`MAX_LISTING_IMAGES`] files is a field-level error and the
    /// previously accepted set (and its previews) stays untouched. An
    /// accepted set revokes every superseded preview before allocating the
    /// new ones.
    pub async fn attach_images(&self, files: Vec<ImageUpload>) {
        let mut st = self.state.lock().await;
        let st = &mut *st;
        if files.len() > MAX_LISTING_IMAGES {
            st.errors.images = Some("Maximum 5 images allowed".to_string());
            return;
        }

        st.revoke_previews();
        st.previews = files.iter().map(|f| st.urls.create_url(f)).collect();
        st.images = files;
        st.errors.images = None;
    }

    /// Explicit teardown: release previews without waiting for drop.
    pub async fn teardown(&self) {
        self.state.lock().await.revoke_previews();
    }

    /// Validate and submit. A draft with any field error never reaches the
    /// network; on success the created listing id is exposed and the preview
    /// handles are released.
    pub async fn submit(&self) {
        let (token, draft, images) = {
            let mut st = self.state.lock().await;
            st.errors = st.draft.validate();
            if !st.errors.is_empty() {
                return;
            }
            let Some(token) = st.submission.begin_submit() else {
                return;
            };
            (token, st.draft.clone(), st.images.clone())
        };

        let result = self.backend.create_listing(&draft, &images).await;

        let mut st = self.state.lock().await;
        match result {
            Ok(listing_id) => {
                tracing::debug!("listing created: {listing_id}");
                st.submission.set_data(listing_id);
                st.submission.finish_submit(token, Ok(()));
                st.revoke_previews();
            }
            Err(err) => {
                st.errors.submit = Some(err.message());
                st.submission.finish_submit(token, Err(err.message()));
            }
        }
    }
}
