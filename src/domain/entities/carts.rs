use uuid::Uuid;

use crate::domain::value_objects::plan_state::PlanStamp;

/// A line in the customer's cart, before any order exists. The stamp is
/// attached when a planned subscription product enters the cart and is
/// promoted to the order line at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemEntity {
    pub product_id: Uuid,
    pub variation_id: Option<Uuid>,
    pub quantity: u32,
    pub stamp: Option<PlanStamp>,
}
