//! Product fixtures shared by the catalog unit tests.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::db::sample_drafts;
use crate::models::{CurrencyType, Product, ProductDraft, ProductStatus};

pub(crate) struct ProductBuilder {
    draft: ProductDraft,
}

pub(crate) fn product(name: &str, tag: &str) -> ProductBuilder {
    ProductBuilder {
        draft: ProductDraft::new(name, tag, CurrencyType::Gold, 1.0, 1),
    }
}

impl ProductBuilder {
    pub(crate) fn price(mut self, price: f64) -> Self {
        self.draft.price = price;
        self
    }

    pub(crate) fn quantity(mut self, quantity: i32) -> Self {
        self.draft.quantity = quantity;
        self
    }

    pub(crate) fn status(mut self, status: ProductStatus) -> Self {
        self.draft.status = status;
        self
    }

    pub(crate) fn description(mut self, description: &str) -> Self {
        self.draft.description = Some(description.to_string());
        self
    }

    pub(crate) fn image(mut self, image_url: &str) -> Self {
        self.draft.image_url = Some(image_url.to_string());
        self
    }

    pub(crate) fn pet_linked(mut self) -> Self {
        self.draft = self.draft.with_pet_id(Uuid::new_v4());
        self
    }

    pub(crate) fn build(self) -> Product {
        Product::from_draft(Uuid::new_v4(), self.draft, Utc::now())
    }
}

/// The 23-product demo catalog, with strictly increasing creation times.
pub(crate) fn sample_catalog() -> Vec<Product> {
    let epoch = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    sample_drafts()
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            Product::from_draft(Uuid::new_v4(), draft, epoch + Duration::minutes(i as i64))
        })
        .collect()
}
