//! The client-side product collection and the API it is fed from.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Product, ProductDraft, ProductStatus};

/// The product REST API as seen from the dashboard.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Full collection fetch.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ApiError>;

    async fn update_product(&self, id: Uuid, draft: ProductDraft) -> Result<Product, ApiError>;

    async fn delete_product(&self, id: Uuid) -> Result<(), ApiError>;

    async fn set_product_status(
        &self,
        id: Uuid,
        status: ProductStatus,
    ) -> Result<Product, ApiError>;
}

/// Sole owner of the unfiltered product collection.
///
/// Mutations go through the API first. The local collection is only replaced
/// once the API has confirmed the change and the follow-up fetch succeeded, so
/// a failed call leaves it exactly as it was.
pub struct ProductStore<A> {
    api: A,
    products: Vec<Product>,
}

impl<A: ProductApi> ProductStore<A> {
    /// An empty store; call [`refresh`](Self::refresh) to seed it.
    pub fn new(api: A) -> Self {
        Self {
            api,
            products: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The current collection, in the order the API delivered it.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Re-fetch the whole collection.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let products = self.api.list_products().await?;
        tracing::debug!(count = products.len(), "product collection refreshed");
        self.products = products;
        Ok(())
    }

    pub async fn create(&mut self, draft: ProductDraft) -> Result<Product, ApiError> {
        let created = self.api.create_product(draft).await?;
        tracing::info!(id = %created.id, name = %created.name, "product created");
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update(&mut self, id: Uuid, draft: ProductDraft) -> Result<Product, ApiError> {
        let updated = self.api.update_product(id, draft).await?;
        tracing::info!(id = %id, "product updated");
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), ApiError> {
        self.api.delete_product(id).await?;
        tracing::info!(id = %id, "product deleted");
        self.refresh().await
    }

    pub async fn set_status(
        &mut self,
        id: Uuid,
        status: ProductStatus,
    ) -> Result<Product, ApiError> {
        let updated = self.api.set_product_status(id, status).await?;
        tracing::info!(id = %id, status = ?status, "product status changed");
        self.refresh().await?;
        Ok(updated)
    }
}
