//! Single-key sort configuration for the product list.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Product;

/// Product fields the list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Name,
    Type,
    CurrencyType,
    Price,
    Quantity,
    Status,
    Description,
    CreatedAt,
}

impl SortKey {
    /// Column name as used by the dashboard, e.g. `currencyType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Type => "type",
            SortKey::CurrencyType => "currencyType",
            SortKey::Price => "price",
            SortKey::Quantity => "quantity",
            SortKey::Status => "status",
            SortKey::Description => "description",
            SortKey::CreatedAt => "createdAt",
        }
    }

    /// Parse a column name. Unknown names yield `None`, which the pipeline
    /// treats as "unsorted".
    pub fn parse(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SortKey::Price | SortKey::Quantity | SortKey::Status | SortKey::CreatedAt
        )
    }

    /// Compare two products on this key, ascending.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self.value_of(a) {
            SortValue::Number(x) => {
                let y = self.value_of(b).as_number();
                x.total_cmp(&y)
            }
            SortValue::Text(x) => {
                let y = self.value_of(b).into_text();
                x.cmp(&y)
            }
        }
    }

    fn value_of(&self, product: &Product) -> SortValue {
        match self {
            SortKey::Price => SortValue::number(product.price),
            SortKey::Quantity => SortValue::number(f64::from(product.quantity)),
            SortKey::Status => SortValue::number(product.status.rank()),
            SortKey::CreatedAt => {
                SortValue::number(product.created_at.timestamp_millis() as f64)
            }
            SortKey::Id => SortValue::text(&product.id.to_string()),
            SortKey::Name => SortValue::text(&product.name),
            SortKey::Type => SortValue::text(&product.product_type),
            SortKey::CurrencyType => SortValue::text(product.currency_type.as_str()),
            SortKey::Description => {
                SortValue::text(product.description.as_deref().unwrap_or_default())
            }
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "type" => Ok(SortKey::Type),
            "currencyType" | "currency_type" => Ok(SortKey::CurrencyType),
            "price" => Ok(SortKey::Price),
            "quantity" => Ok(SortKey::Quantity),
            "status" => Ok(SortKey::Status),
            "description" => Ok(SortKey::Description),
            "createdAt" | "created_at" => Ok(SortKey::CreatedAt),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    // NaN and infinities sort as 0
    fn number(value: f64) -> Self {
        SortValue::Number(if value.is_finite() { value } else { 0.0 })
    }

    fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }

    fn as_number(&self) -> f64 {
        match self {
            SortValue::Number(n) => *n,
            SortValue::Text(_) => 0.0,
        }
    }

    fn into_text(self) -> String {
        match self {
            SortValue::Text(s) => s,
            SortValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// At most one active sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Column header click: the active key flips direction, a new key starts
    /// ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Comparator for the configured key and direction, or `None` when the
    /// list keeps collection order.
    pub fn comparator(&self) -> Option<impl Fn(&Product, &Product) -> Ordering> {
        let key = self.key?;
        let direction = self.direction;
        Some(move |a: &Product, b: &Product| {
            let ordering = key.compare(a, b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        })
    }
}
