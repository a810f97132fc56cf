use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Product Entity
// ============================================================================
//
// `unit_price` is the CURRENT catalog price and changes over time. Nothing
// outside the catalog shell may hold onto a Product past the moment it was
// looked up; the order core copies the price out immediately.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
}

/// Caller-supplied fields for create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
}

/// External representation of a catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            unit_price: product.unit_price,
            image_url: product.image_url.clone(),
        }
    }
}
