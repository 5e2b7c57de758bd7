// =============================================================================
// HTTP CLIENT MODULE
// =============================================================================
// ProductApi implementation that talks to the product REST API over HTTP.
//
// LEARNING NOTES:
// - reqwest::Client keeps a connection pool; clone it instead of rebuilding
// - Non-success responses are turned into typed ApiError values so the
//   catalog can show a message without knowing about status codes
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::catalog::ProductApi;
use crate::error::ApiError;
use crate::models::{ErrorResponse, Product, ProductDraft, ProductStatus, StatusUpdate};

/// Prefix shared by every product route.
const PRODUCTS_PATH: &str = "/api/v1/products";

#[derive(Clone)]
pub struct HttpProductApi {
    inner: Arc<HttpProductApiInner>,
}

struct HttpProductApiInner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductApi {
    /// Create a client for the API at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpProductApiInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{PRODUCTS_PATH}{path}", self.inner.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        handle_response(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }
}

impl std::fmt::Debug for HttpProductApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProductApi")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    if response.status().is_success() {
        return response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
    }

    Err(parse_error(response).await)
}

/// Map a non-success response to an ApiError, keeping the server's message.
async fn parse_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::Rejected(message),
        other => ApiError::Status {
            status: other.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("").await
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ApiError> {
        self.send_json(reqwest::Method::POST, "", &draft).await
    }

    async fn update_product(&self, id: Uuid, draft: ProductDraft) -> Result<Product, ApiError> {
        self.send_json(reqwest::Method::PUT, &format!("/{id}"), &draft)
            .await
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/{id}")))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(parse_error(response).await)
    }

    async fn set_product_status(
        &self,
        id: Uuid,
        status: ProductStatus,
    ) -> Result<Product, ApiError> {
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/{id}/status"),
            &StatusUpdate { status },
        )
        .await
    }
}
