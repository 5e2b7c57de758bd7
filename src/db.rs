// =============================================================================
// DATABASE MODULE
// =============================================================================
// In-memory product storage backing the mock REST server.
//
// LEARNING NOTES:
// - The collection lives behind a tokio RwLock: many readers, one writer
// - `Database` is cheap to clone (Arc inside), so it can sit in AppState
// - It also implements the ProductApi collaborator trait, which lets the
//   catalog view run against the mock backend without any HTTP in between
// =============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::ProductApi;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{CurrencyType, Product, ProductDraft, ProductStatus, FOOD_TAG, TOY_TAG};

// -----------------------------------------------------------------------------
// DATABASE WRAPPER
// -----------------------------------------------------------------------------
#[derive(Clone, Default)]
pub struct Database {
    /// Products in insertion order
    products: Arc<RwLock<Vec<Product>>>,
}

impl Database {
    /// Create an empty in-memory store
    pub fn in_memory() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // SEED DATA
    // -------------------------------------------------------------------------
    /// Seed demo products if the store is empty. Returns how many were added.
    pub async fn seed_sample_data(&self) -> AppResult<usize> {
        let mut products = self.products.write().await;
        if !products.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        for draft in sample_drafts() {
            validate_draft(&draft)?;
            products.push(Product::from_draft(Uuid::new_v4(), draft, now));
        }

        Ok(products.len())
    }

    // -------------------------------------------------------------------------
    // READ OPERATIONS
    // -------------------------------------------------------------------------

    /// Every product, in insertion order
    pub async fn list_products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    pub async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub async fn count(&self) -> usize {
        self.products.read().await.len()
    }

    // -------------------------------------------------------------------------
    // WRITE OPERATIONS
    // -------------------------------------------------------------------------

    pub async fn create_product(&self, draft: ProductDraft) -> AppResult<Product> {
        validate_draft(&draft)?;

        let product = Product::from_draft(Uuid::new_v4(), draft, Utc::now());
        self.products.write().await.push(product.clone());

        Ok(product)
    }

    pub async fn update_product(&self, id: Uuid, draft: ProductDraft) -> AppResult<Product> {
        validate_draft(&draft)?;

        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        product.apply_draft(draft, Utc::now());
        Ok(product.clone())
    }

    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        // `remove` keeps the relative order of the remaining products
        products.remove(index);
        Ok(())
    }

    pub async fn set_product_status(&self, id: Uuid, status: ProductStatus) -> AppResult<Product> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        product.status = status;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Product not found: {}", id))
}

/// Server-side sanity checks on a create/update payload.
fn validate_draft(draft: &ProductDraft) -> AppResult<()> {
    if draft.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(AppError::BadRequest(format!(
            "price must be a non-negative number, got {}",
            draft.price
        )));
    }
    if draft.quantity < 0 {
        return Err(AppError::BadRequest(format!(
            "quantity must not be negative, got {}",
            draft.quantity
        )));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// COLLABORATOR IMPLEMENTATION
// -----------------------------------------------------------------------------
#[async_trait]
impl ProductApi for Database {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Ok(Database::list_products(self).await)
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ApiError> {
        Ok(Database::create_product(self, draft).await?)
    }

    async fn update_product(&self, id: Uuid, draft: ProductDraft) -> Result<Product, ApiError> {
        Ok(Database::update_product(self, id, draft).await?)
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), ApiError> {
        Ok(Database::delete_product(self, id).await?)
    }

    async fn set_product_status(
        &self,
        id: Uuid,
        status: ProductStatus,
    ) -> Result<Product, ApiError> {
        Ok(Database::set_product_status(self, id, status).await?)
    }
}

// -----------------------------------------------------------------------------
// DEMO CATALOG
// -----------------------------------------------------------------------------
// 23 products: 16 listed with stock, 7 either unlisted or sold out.
pub(crate) fn sample_drafts() -> Vec<ProductDraft> {
    use CurrencyType::{Diamond, Gold};

    let listed = [
        ("Baby Dragon", "dragon", Diamond, 120.0, 3, "A hatchling that breathes warm air"),
        ("Fire Phoenix", "phoenix", Diamond, 250.0, 1, "Rises from its own ashes"),
        ("Snow Unicorn", "unicorn", Diamond, 180.0, 2, "Leaves frost on every step"),
        ("Tabby Kitten", "cat", Gold, 40.0, 12, "Loves yarn and naps"),
        ("Golden Retriever Pup", "dog", Gold, 55.0, 8, "Fetches anything"),
        ("Lop Rabbit", "rabbit", Gold, 30.0, 15, "Floppy ears, big appetite"),
        ("Dragon Fruit Treat", FOOD_TAG, Gold, 5.0, 200, "Favourite snack of young dragons"),
        ("Premium Kibble", FOOD_TAG, Gold, 3.0, 500, "Balanced daily food"),
        ("Carrot Bundle", FOOD_TAG, Gold, 2.0, 300, "Crunchy and fresh"),
        ("Squeaky Bone", TOY_TAG, Gold, 4.0, 120, "Makes a satisfying squeak"),
        ("Feather Wand", TOY_TAG, Gold, 6.0, 80, "Irresistible to cats"),
        ("Laser Pointer", TOY_TAG, Diamond, 12.0, 40, "Endless chasing fun"),
        ("Cosy Pet Bed", "furniture", Gold, 25.0, 30, "Soft bed for small pets"),
        ("Dragon Saddle", "gear", Diamond, 90.0, 5, "Ride your dragon in style"),
        ("Grooming Kit", "gear", Gold, 15.0, 60, "Brushes and clippers"),
        ("Name Tag", "accessory", Gold, 1.0, 999, "Engraved with your pet's name"),
    ];

    let unavailable = [
        ("Shadow Dragon", "dragon", Diamond, 400.0, 0, ProductStatus::Active),
        ("Ancient Phoenix Egg", "phoenix", Diamond, 600.0, 2, ProductStatus::Inactive),
        ("Catnip Cookies", FOOD_TAG, Gold, 4.0, 0, ProductStatus::Active),
        ("Rope Toy", TOY_TAG, Gold, 3.0, 25, ProductStatus::Inactive),
        ("Winter Coat", "accessory", Gold, 20.0, 0, ProductStatus::Inactive),
        ("Puppy Starter Pack", "dog", Gold, 70.0, 0, ProductStatus::Active),
        ("Hay Bale", FOOD_TAG, Gold, 2.5, 10, ProductStatus::Inactive),
    ];

    let mut drafts: Vec<ProductDraft> = listed
        .into_iter()
        .map(|(name, tag, currency, price, quantity, description)| {
            ProductDraft::new(name, tag, currency, price, quantity).with_description(description)
        })
        .collect();

    drafts.extend(
        unavailable
            .into_iter()
            .map(|(name, tag, currency, price, quantity, status)| {
                ProductDraft::new(name, tag, currency, price, quantity).with_status(status)
            }),
    );

    drafts
}
