use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::products::ProductEntity;

/// Catalog access on the commerce backend.
#[async_trait]
#[automock]
pub trait ProductRepository {
    async fn find_by_id(&self, product_id: Uuid) -> Result<Option<ProductEntity>>;

    /// Constituent products of a bundle; empty for non-bundle products.
    async fn bundled_products(&self, product_id: Uuid) -> Result<Vec<ProductEntity>>;

    /// Decrements stock and returns the new level. Only called for products
    /// that manage stock.
    async fn reduce_stock(&self, product_id: Uuid, quantity: u32) -> Result<i64>;
}
