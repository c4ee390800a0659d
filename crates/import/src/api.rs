//! The remote persistence boundary.
//!
//! The importer never creates transactions row by row; the whole batch goes
//! through one bulk-create call so the server can keep all-or-nothing
//! semantics. Reads (accounts, categories, transaction history) seed the
//! session and the classifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use florin_core::{Account, AccountId, Category, NormalizedTransaction};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// The bulk-create collaborator. One call, one logical persistence operation.
#[async_trait]
pub trait TransactionSink {
    async fn create_batch(
        &self,
        account_id: AccountId,
        transactions: &[NormalizedTransaction],
    ) -> Result<u64, ApiError>;
}

#[derive(Debug, Serialize)]
struct CommitPayload<'a> {
    account_id: i64,
    transactions: &'a [NormalizedTransaction],
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    inserted_count: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// A previously persisted transaction, as far as the importer cares: enough
/// to teach the classifier which descriptions landed in which category.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub notes: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    user_id: i64,
}

impl ApiClient {
    pub fn new(base_url: &str, user_id: i64) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
        }
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get_json("/accounts").await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json("/categories").await
    }

    pub async fn list_transactions(&self) -> Result<Vec<TransactionRecord>, ApiError> {
        self.get_json("/transactions").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("x-user-id", self.user_id.to_string())
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Maps non-2xx responses to [`ApiError::Rejected`], pulling the message
    /// out of the server's `{"detail": ...}` error body when present.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.detail)
            .unwrap_or_else(|_| status.to_string());
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TransactionSink for ApiClient {
    async fn create_batch(
        &self,
        account_id: AccountId,
        transactions: &[NormalizedTransaction],
    ) -> Result<u64, ApiError> {
        tracing::debug!(
            count = transactions.len(),
            account = %account_id,
            "posting import batch"
        );
        let payload = CommitPayload {
            account_id: account_id.0,
            transactions,
        };
        let response = self
            .http
            .post(format!("{}/transactions/import/commit", self.base_url))
            .header("x-user-id", self.user_id.to_string())
            .json(&payload)
            .send()
            .await?;
        let body: CommitResponse = Self::decode(response).await?;
        Ok(body.inserted_count)
    }
}
