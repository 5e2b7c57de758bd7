// =============================================================================
// MODELS MODULE
// =============================================================================
// This module defines the data structures shared by the catalog view engine,
// the HTTP client and the mock REST server.
//
// LEARNING NOTES:
// - Derive macros automatically implement common traits
// - Serde handles JSON serialization/deserialization
// - `rename_all = "camelCase"` keeps the Rust field names idiomatic while the
//   wire format matches what the dashboard expects (currencyType, imageUrl...)
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// TYPE TAGS
// =============================================================================
// A product's `type` is a free-form tag. A handful of tags carry meaning for
// the catalog facets.

/// Type tags that identify a pet species. Products carrying one of these
/// belong to the pet grouping.
pub const PET_SPECIES: &[&str] = &["dog", "cat", "dragon", "phoenix", "unicorn", "rabbit"];

/// Fixed type tag for food items.
pub const FOOD_TAG: &str = "food";

/// Fixed type tag for toy items.
pub const TOY_TAG: &str = "toy";

/// Returns true when `tag` names a known pet species.
pub fn is_pet_species(tag: &str) -> bool {
    PET_SPECIES.contains(&tag)
}

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// In-game currency a product is priced in.
///
/// Values the dashboard doesn't know about decode to `Unknown` rather than
/// failing the whole collection fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyType {
    Gold,
    Diamond,
    #[serde(other)]
    Unknown,
}

impl CurrencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyType::Gold => "gold",
            CurrencyType::Diamond => "diamond",
            CurrencyType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CurrencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a product is listed in the shop. Independent of quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    /// Numeric rank used when sorting by status (inactive before active).
    pub fn rank(&self) -> f64 {
        match self {
            ProductStatus::Inactive => 0.0,
            ProductStatus::Active => 1.0,
        }
    }
}

/// The two parent groupings of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductGroup {
    Pet,
    Item,
}

// =============================================================================
// PRODUCT
// =============================================================================
// Represents a single catalog record (a pet or an item sold in the shop).
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, stable identifier assigned by the backend
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Free-form category tag (pet species, "food", "toy", ...)
    #[serde(rename = "type")]
    pub product_type: String,

    pub currency_type: CurrencyType,

    /// Non-negative price in `currency_type`
    pub price: f64,

    /// Units in stock, 0 meaning out of stock
    pub quantity: i32,

    pub status: ProductStatus,

    /// Raw image reference. May be a direct image or a document sharing link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Link into the item grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<Uuid>,

    /// Link into the pet grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a product from a draft, stamping id and timestamps.
    pub fn from_draft(id: Uuid, draft: ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            product_type: draft.product_type,
            currency_type: draft.currency_type,
            price: draft.price,
            quantity: draft.quantity,
            status: draft.status,
            image_url: draft.image_url,
            description: draft.description,
            shop_id: draft.shop_id,
            pet_id: draft.pet_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every editable field from `draft`, keeping id and creation time.
    pub fn apply_draft(&mut self, draft: ProductDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.product_type = draft.product_type;
        self.currency_type = draft.currency_type;
        self.price = draft.price;
        self.quantity = draft.quantity;
        self.status = draft.status;
        self.image_url = draft.image_url;
        self.description = draft.description;
        self.shop_id = draft.shop_id;
        self.pet_id = draft.pet_id;
        self.updated_at = now;
    }

    /// The grouping this product belongs to, decided by its type tag alone.
    pub fn group(&self) -> ProductGroup {
        if is_pet_species(&self.product_type) {
            ProductGroup::Pet
        } else {
            ProductGroup::Item
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

// =============================================================================
// API REQUEST/RESPONSE STRUCTURES
// =============================================================================

// -----------------------------------------------------------------------------
// PRODUCT DRAFT
// -----------------------------------------------------------------------------
/// Request body for creating or replacing a product
///
/// # Example JSON
/// ```json
/// {
///   "name": "Baby Dragon",
///   "type": "dragon",
///   "currencyType": "diamond",
///   "price": 120,
///   "quantity": 3
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,

    #[serde(rename = "type")]
    pub product_type: String,

    pub currency_type: CurrencyType,
    pub price: f64,
    pub quantity: i32,

    /// New products are listed unless stated otherwise
    #[serde(default)]
    pub status: ProductStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<Uuid>,
}

impl ProductDraft {
    /// Minimal draft; optional fields start empty.
    pub fn new(
        name: impl Into<String>,
        product_type: impl Into<String>,
        currency_type: CurrencyType,
        price: f64,
        quantity: i32,
    ) -> Self {
        Self {
            name: name.into(),
            product_type: product_type.into(),
            currency_type,
            price,
            quantity,
            status: ProductStatus::Active,
            image_url: None,
            description: None,
            shop_id: None,
            pet_id: None,
        }
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_pet_id(mut self, pet_id: Uuid) -> Self {
        self.pet_id = Some(pet_id);
        self
    }
}

// -----------------------------------------------------------------------------
// STATUS UPDATE
// -----------------------------------------------------------------------------
/// Request body for toggling a product's status
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ProductStatus,
}

// =============================================================================
// HEALTH CHECK RESPONSE
// =============================================================================

/// Simple health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Number of products currently held by the mock backend
    pub products: usize,
}

// =============================================================================
// ERROR RESPONSES
// =============================================================================

/// API error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
