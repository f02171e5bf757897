use uuid::Uuid;

use crate::domain::value_objects::{
    enums::order_statuses::OrderStatus, plan_state::PlanStamp,
};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineEntity {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub variation_id: Option<Uuid>,
    pub name: String,
    pub quantity: u32,
    pub subtotal_minor: i64,
    pub total_minor: i64,
    pub tax_class: String,
    /// True for the zero-priced shipped-product lines of a fascicle order
    /// (the week price lives on the subscription line).
    pub is_fascicle_item: bool,
    pub stamp: Option<PlanStamp>,
}

impl OrderLineEntity {
    pub fn unit_price_minor(&self) -> i64 {
        let quantity = self.quantity.max(1) as i64;
        self.total_minor / quantity
    }
}

/// A line to be written to the commerce backend. Ids are assigned there.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub product_id: Option<Uuid>,
    pub name: String,
    pub quantity: u32,
    pub subtotal_minor: i64,
    pub total_minor: i64,
    pub tax_class: String,
    pub is_fascicle_item: bool,
    pub stamp: Option<PlanStamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderEntity {
    pub id: Uuid,
    pub status: OrderStatus,
    /// Set when the order is a renewal invoice for a subscription.
    pub renews_subscription_id: Option<Uuid>,
    pub lines: Vec<OrderLineEntity>,
    pub stock_reduced: bool,
}

impl OrderEntity {
    pub fn is_paid(&self) -> bool {
        self.status.is_paid()
    }

    pub fn is_renewal(&self) -> bool {
        self.renews_subscription_id.is_some()
    }

    pub fn has_fascicle_lines(&self) -> bool {
        self.lines
            .iter()
            .any(|line| line.is_fascicle_item || line.stamp.is_some())
    }

    pub fn contains_product(&self, product_id: Uuid) -> bool {
        self.lines
            .iter()
            .any(|line| line.product_id == Some(product_id) || line.variation_id == Some(product_id))
    }
}
