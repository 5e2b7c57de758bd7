//! Filter facets for the product list.
//!
//! [`FilterState`] is a plain value object; the pipeline reads it, nothing in
//! it is mutated behind the caller's back.

use serde::{Deserialize, Serialize};

use crate::models::{is_pet_species, CurrencyType, Product, FOOD_TAG, TOY_TAG};

/// Status facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    /// Inactive products, or active ones with nothing left in stock.
    OutOfStock,
}

impl StatusFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => product.is_active(),
            // Status is authoritative; zero quantity is the secondary signal.
            StatusFilter::OutOfStock => !(product.is_active() && product.quantity > 0),
        }
    }
}

/// Grouping facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupFilter {
    #[default]
    All,
    Pet,
    Food,
    Toy,
    Other,
}

impl GroupFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let tag = product.product_type.as_str();
        match self {
            GroupFilter::All => true,
            GroupFilter::Pet => is_pet_species(tag) || product.pet_id.is_some(),
            GroupFilter::Food => tag == FOOD_TAG,
            GroupFilter::Toy => tag == TOY_TAG,
            GroupFilter::Other => !is_pet_species(tag) && tag != FOOD_TAG && tag != TOY_TAG,
        }
    }
}

/// Every facet of the product list in one snapshot.
///
/// Decoding goes through the same setters as the controls, so a stored
/// sub-type outside the pet grouping is dropped on the way in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "FilterStateFields")]
pub struct FilterState {
    /// Committed search term (never the raw keystrokes).
    pub search: String,
    pub status: StatusFilter,
    /// `None` means "all currencies".
    pub currency: Option<CurrencyType>,
    grouping: GroupFilter,
    /// Pet species; only meaningful while `grouping` is [`GroupFilter::Pet`].
    sub_type: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct FilterStateFields {
    search: String,
    status: StatusFilter,
    currency: Option<CurrencyType>,
    grouping: GroupFilter,
    sub_type: Option<String>,
}

impl From<FilterStateFields> for FilterState {
    fn from(fields: FilterStateFields) -> Self {
        let mut state = FilterState {
            search: fields.search,
            status: fields.status,
            currency: fields.currency,
            ..FilterState::default()
        };
        state.set_grouping(fields.grouping);
        state.set_sub_type(fields.sub_type);
        state
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grouping(&self) -> GroupFilter {
        self.grouping
    }

    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }

    /// Change the grouping. Leaving the pet grouping drops the sub-type.
    pub fn set_grouping(&mut self, grouping: GroupFilter) {
        if grouping != GroupFilter::Pet {
            self.sub_type = None;
        }
        self.grouping = grouping;
    }

    /// Select a pet species. Ignored unless the grouping is pet; an empty
    /// value clears the selection.
    pub fn set_sub_type(&mut self, sub_type: Option<String>) {
        if self.grouping != GroupFilter::Pet {
            self.sub_type = None;
            return;
        }
        self.sub_type = sub_type.filter(|s| !s.trim().is_empty());
    }

    /// The search term as the pipeline sees it, or `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// True when `product` passes every active facet.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_with_term(product, self.search_term().as_deref())
    }

    /// Same as [`matches`](Self::matches) with an already lowercased search term.
    pub(crate) fn matches_with_term(&self, product: &Product, term: Option<&str>) -> bool {
        if let Some(term) = term {
            if !matches_search(product, term) {
                return false;
            }
        }

        if !self.status.matches(product) {
            return false;
        }

        if let Some(currency) = self.currency {
            if product.currency_type != currency {
                return false;
            }
        }

        if !self.grouping.matches(product) {
            return false;
        }

        if self.grouping == GroupFilter::Pet {
            if let Some(sub_type) = self.sub_type.as_deref() {
                if product.product_type != sub_type {
                    return false;
                }
            }
        }

        true
    }
}

fn matches_search(product: &Product, lowered_term: &str) -> bool {
    product.name.to_lowercase().contains(lowered_term)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(lowered_term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::product;
    use crate::models::ProductStatus;

    #[test]
    fn test_out_of_stock_uses_status_first() {
        let inactive_with_stock = product("Rope", TOY_TAG)
            .status(ProductStatus::Inactive)
            .quantity(5)
            .build();
        let active_empty = product("Bone", TOY_TAG).quantity(0).build();
        let active_stocked = product("Ball", TOY_TAG).quantity(3).build();

        assert!(StatusFilter::OutOfStock.matches(&inactive_with_stock));
        assert!(StatusFilter::OutOfStock.matches(&active_empty));
        assert!(!StatusFilter::OutOfStock.matches(&active_stocked));

        assert!(!StatusFilter::Active.matches(&inactive_with_stock));
        assert!(StatusFilter::Active.matches(&active_empty));
    }

    #[test]
    fn test_grouping_facets() {
        let dragon = product("Baby Dragon", "dragon").build();
        let linked = product("Pet Collar", "accessory").pet_linked().build();
        let food = product("Kibble", FOOD_TAG).build();
        let toy = product("Ball", TOY_TAG).build();
        let gear = product("Saddle", "gear").build();

        assert!(GroupFilter::Pet.matches(&dragon));
        assert!(GroupFilter::Pet.matches(&linked));
        assert!(!GroupFilter::Pet.matches(&food));

        assert!(GroupFilter::Food.matches(&food));
        assert!(GroupFilter::Toy.matches(&toy));

        assert!(GroupFilter::Other.matches(&gear));
        assert!(GroupFilter::Other.matches(&linked));
        assert!(!GroupFilter::Other.matches(&dragon));
        assert!(!GroupFilter::Other.matches(&toy));
    }

    #[test]
    fn test_sub_type_reset_when_leaving_pet_grouping() {
        let mut filter = FilterState::new();
        filter.set_grouping(GroupFilter::Pet);
        filter.set_sub_type(Some("dragon".to_string()));
        assert_eq!(filter.sub_type(), Some("dragon"));

        filter.set_grouping(GroupFilter::Toy);
        assert_eq!(filter.sub_type(), None);

        // selecting a species outside the pet grouping is ignored
        filter.set_sub_type(Some("cat".to_string()));
        assert_eq!(filter.sub_type(), None);
    }

    #[test]
    fn test_decoding_applies_the_sub_type_rule() {
        let stale: FilterState = serde_json::from_value(serde_json::json!({
            "grouping": "food",
            "sub_type": "dragon"
        }))
        .expect("decode filter");
        assert_eq!(stale.grouping(), GroupFilter::Food);
        assert_eq!(stale.sub_type(), None);

        let mut pets = FilterState::new();
        pets.status = StatusFilter::OutOfStock;
        pets.set_grouping(GroupFilter::Pet);
        pets.set_sub_type(Some("cat".to_string()));
        let encoded = serde_json::to_value(&pets).expect("encode filter");
        let decoded: FilterState = serde_json::from_value(encoded).expect("decode filter");
        assert_eq!(decoded, pets);
    }

    #[test]
    fn test_search_matches_name_or_description_case_insensitively() {
        let mut filter = FilterState::new();
        filter.search = "  DRAG ".to_string();

        let by_name = product("Baby Dragon", "dragon").build();
        let by_description = product("Fruit Treat", FOOD_TAG)
            .description("Favourite snack of young dragons")
            .build();
        let neither = product("Ball", TOY_TAG).build();

        assert!(filter.matches(&by_name));
        assert!(filter.matches(&by_description));
        assert!(!filter.matches(&neither));
    }

    #[test]
    fn test_whitespace_search_is_disabled() {
        let mut filter = FilterState::new();
        filter.search = "   ".to_string();
        assert_eq!(filter.search_term(), None);
        assert!(filter.matches(&product("Ball", TOY_TAG).build()));
    }
}
