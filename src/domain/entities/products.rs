use uuid::Uuid;

use crate::domain::value_objects::enums::product_types::ProductType;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductEntity {
    pub id: Uuid,
    pub name: String,
    pub product_type: ProductType,
    /// Catalog price in minor units; the plan row price overrides it for
    /// fascicle lines.
    pub regular_price_minor: i64,
    pub tax_class: String,
    pub manages_stock: bool,
    pub stock_quantity: Option<i64>,
}

impl ProductEntity {
    pub fn is_subscription(&self) -> bool {
        self.product_type.is_subscription()
    }

    pub fn is_bundle(&self) -> bool {
        self.product_type == ProductType::Bundle
    }
}
