//! `reqwest` implementation of the [`Backend`] port.
//!
//! Thin request/response plumbing: build the request, check the status, map
//! the body. Session auth rides the client's cookie store; no timeouts beyond
//! reqwest's defaults and no automatic retries.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use peerrent_account::{
    BuyerSummary, LinkedAccount, NewPaymentMethod, ProfileUpdate, SellerSummary, UserProfile,
};
use peerrent_core::{AccountId, DisputeId, ListingId, TransactionId};
use peerrent_market::{
    AdminDispute, Dispute, DisputeResolution, ImageUpload, ListingDraft, ListingStatus,
    ListingSummary, NewDispute, NewTransaction, Transaction, TransactionDetail, TransactionStatus,
};

use crate::backend::{ApiError, ApiResult, Backend};

/// REST client against the PeerRent API.
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
}

impl RestBackend {
    /// Create a client for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Payload(e.to_string()))
    }

    async fn send_ok(&self, req: reqwest::RequestBuilder) -> ApiResult<()> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ApiResult<T> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Payload(e.to_string()))
    }
}

/// Map a non-2xx response into `ApiError::Status`, extracting the `error`
/// (or `message`) field the API puts in its JSON envelope.
async fn check_status(resp: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);

    tracing::warn!("request failed with {}: {}", status, message);
    Err(ApiError::Status(status.as_u16(), message))
}

#[derive(Debug, Deserialize)]
struct CreatedListing {
    listing_id: ListingId,
}

#[derive(Debug, Deserialize)]
struct AdminDisputeList {
    disputes: Vec<AdminDispute>,
}

#[async_trait]
impl Backend for RestBackend {
    async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        self.get_json("/api/account/profile").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<()> {
        self.send_ok(self.http.put(self.url("/api/account/profile")).json(update))
            .await
    }

    async fn change_password(&self, current: &str, new: &str) -> ApiResult<()> {
        let body = serde_json::json!({
            "current_password": current,
            "new_password": new,
        });
        self.send_ok(self.http.put(self.url("/api/account/password")).json(&body))
            .await
    }

    async fn payment_methods(&self) -> ApiResult<Vec<LinkedAccount>> {
        self.get_json("/api/account/payment-methods").await
    }

    async fn add_payment_method(&self, method: &NewPaymentMethod) -> ApiResult<()> {
        self.send_ok(
            self.http
                .post(self.url("/api/account/payment-methods"))
                .json(method),
        )
        .await
    }

    async fn delete_payment_method(&self, id: &AccountId) -> ApiResult<()> {
        let path = format!("/api/account/payment-methods/{id}");
        self.send_ok(self.http.delete(self.url(&path))).await
    }

    async fn buyer_summary(&self) -> ApiResult<BuyerSummary> {
        self.get_json("/api/account/buyer_list").await
    }

    async fn seller_summary(&self) -> ApiResult<SellerSummary> {
        self.get_json("/api/account/seller_list").await
    }

    async fn transactions(&self) -> ApiResult<Vec<Transaction>> {
        self.get_json("/api/transactions").await
    }

    async fn transaction_detail(&self, id: &TransactionId) -> ApiResult<TransactionDetail> {
        let path = format!("/api/account/transaction/{id}");
        self.get_json(&path).await
    }

    async fn update_transaction_status(
        &self,
        id: &TransactionId,
        status: TransactionStatus,
    ) -> ApiResult<()> {
        let body = serde_json::json!({
            "transaction_id": id,
            "status": status,
        });
        self.send_ok(
            self.http
                .put(self.url("/api/account/transaction/status"))
                .json(&body),
        )
        .await
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> ApiResult<Transaction> {
        self.send_json(self.http.post(self.url("/api/transaction")).json(transaction))
            .await
    }

    async fn search_listings(&self) -> ApiResult<Vec<ListingSummary>> {
        self.get_json("/api/listing/search").await
    }

    async fn create_listing(
        &self,
        draft: &ListingDraft,
        images: &[ImageUpload],
    ) -> ApiResult<ListingId> {
        let tags =
            serde_json::to_string(&draft.tags()).map_err(|e| ApiError::Payload(e.to_string()))?;
        let location = serde_json::to_string(&draft.location)
            .map_err(|e| ApiError::Payload(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .text("title", draft.title.clone())
            .text("description", draft.description.clone())
            .text("price", draft.price.clone())
            .text("meta_tags", tags)
            .text("location", location)
            .text("status", ListingStatus::Active.as_str());

        for image in images {
            let part = reqwest::multipart::Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)
                .map_err(|e| ApiError::Payload(e.to_string()))?;
            form = form.part("images", part);
        }

        let created: CreatedListing = self
            .send_json(self.http.post(self.url("/api/listings/create")).multipart(form))
            .await?;
        Ok(created.listing_id)
    }

    async fn update_listing_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> ApiResult<()> {
        let body = serde_json::json!({
            "listing_id": id,
            "status": status,
        });
        self.send_ok(self.http.patch(self.url("/api/listings/status")).json(&body))
            .await
    }

    async fn file_dispute(&self, dispute: &NewDispute) -> ApiResult<Dispute> {
        self.send_json(self.http.post(self.url("/api/dispute")).json(dispute))
            .await
    }

    async fn admin_disputes(&self) -> ApiResult<Vec<AdminDispute>> {
        let list: AdminDisputeList = self.get_json("/api/admin/disputes").await?;
        Ok(list.disputes)
    }

    async fn resolve_dispute(&self, id: &DisputeId) -> ApiResult<DisputeResolution> {
        let path = format!("/api/admin/disputes/{id}/status");
        let body = serde_json::json!({ "status": "solved" });
        self.send_json(self.http.put(self.url(&path)).json(&body))
            .await
    }
}
