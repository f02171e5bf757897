use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    entities::orders::OrderLineEntity,
    value_objects::enums::subscription_statuses::SubscriptionStatus,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub parent_order_id: Option<Uuid>,
    pub status: SubscriptionStatus,
    /// The recurring billing lines; for fascicle subscriptions these are
    /// rewritten to the next week's product and price on each advance.
    pub lines: Vec<OrderLineEntity>,
    pub billing_interval_days: u32,
    pub start_date: DateTime<Utc>,
    pub next_payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
