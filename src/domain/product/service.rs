use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::store::ProductStore;

use super::errors::ProductError;
use super::model::{Product, ProductInput, ProductResponse};

// ============================================================================
// Product Service - Catalog Shell
// ============================================================================

pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: ProductInput) -> Result<ProductResponse, ProductError> {
        validate_price(input.unit_price)?;

        let product = Product {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            unit_price: input.unit_price,
            image_url: input.image_url,
        };

        self.store.insert(product.clone()).await?;

        tracing::info!(
            product_id = %product.id,
            name = %product.name,
            unit_price = %product.unit_price,
            "Product created"
        );

        Ok(ProductResponse::from(&product))
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductResponse, ProductError> {
        let product = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        Ok(ProductResponse::from(&product))
    }

    pub async fn list(&self) -> Result<Vec<ProductResponse>, ProductError> {
        let products = self.store.find_all().await?;
        Ok(products.iter().map(ProductResponse::from).collect())
    }

    pub async fn update(&self, id: Uuid, input: ProductInput) -> Result<ProductResponse, ProductError> {
        validate_price(input.unit_price)?;

        let product = Product {
            id,
            name: input.name,
            description: input.description,
            unit_price: input.unit_price,
            image_url: input.image_url,
        };

        if !self.store.update(product.clone()).await? {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, unit_price = %product.unit_price, "Product updated");
        Ok(ProductResponse::from(&product))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ProductError> {
        if !self.store.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    pub async fn search_by_name(&self, keyword: &str) -> Result<Vec<ProductResponse>, ProductError> {
        let products = self.store.search_by_name(keyword).await?;
        Ok(products.iter().map(ProductResponse::from).collect())
    }

    /// Inclusive bounds; an inverted range simply matches nothing.
    pub async fn filter_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<ProductResponse>, ProductError> {
        let products = self.store.find_by_price_between(min, max).await?;
        Ok(products.iter().map(ProductResponse::from).collect())
    }
}

fn validate_price(price: Decimal) -> Result<(), ProductError> {
    if price < Decimal::ZERO {
        return Err(ProductError::NegativePrice(price));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProductStore;
    use rust_decimal_macros::dec;

    fn service() -> ProductService {
        ProductService::new(Arc::new(MemoryProductStore::new()))
    }

    fn input(name: &str, price: Decimal) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: format!("{name} description"),
            unit_price: price,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let created = service.create(input("Keyboard", dec!(49.90))).await.unwrap();

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "Keyboard");
        assert_eq!(fetched.unit_price, dec!(49.90));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let service = service();
        let err = service.create(input("Broken", dec!(-1.00))).await.unwrap_err();
        assert!(matches!(err, ProductError::NegativePrice(_)));
    }

    #[tokio::test]
    async fn test_zero_price_is_allowed() {
        let service = service();
        let created = service.create(input("Freebie", Decimal::ZERO)).await.unwrap();
        assert_eq!(created.unit_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let service = service();
        let err = service
            .update(Uuid::new_v4(), input("Ghost", dec!(1.00)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_price() {
        let service = service();
        let created = service.create(input("Monitor", dec!(150.00))).await.unwrap();

        let updated = service
            .update(created.id, input("Monitor", dec!(135.00)))
            .await
            .unwrap();
        assert_eq!(updated.unit_price, dec!(135.00));

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.unit_price, dec!(135.00));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let created = service.create(input("Webcam", dec!(25.00))).await.unwrap();

        service.delete(created.id).await.unwrap();

        let err = service.get(created.id).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(id) if id == created.id));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let service = service();
        service.create(input("USB Hub", dec!(12.00))).await.unwrap();
        service.create(input("usb cable", dec!(4.00))).await.unwrap();
        service.create(input("Dock", dec!(80.00))).await.unwrap();

        let hits = service.search_by_name("USB").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_price_range_filter_is_inclusive() {
        let service = service();
        service.create(input("A", dec!(10.00))).await.unwrap();
        service.create(input("B", dec!(20.00))).await.unwrap();
        service.create(input("C", dec!(30.00))).await.unwrap();

        let hits = service
            .filter_by_price_range(dec!(10.00), dec!(20.00))
            .await
            .unwrap();
        let names: Vec<_> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
