use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    repositories::orders::LineUpdate,
    value_objects::{
        enums::{order_links::OrderLink, subscription_statuses::SubscriptionStatus},
        plan_state::PlanState,
        plans::Plan,
    },
};

/// Subscription persistence on the commerce backend, including the typed
/// fascicle state. State writes are per-field so the engine controls write
/// ordering within a transition (the per-order processed flag must be the
/// last write).
#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    async fn find_for_order(&self, order_id: Uuid, link: OrderLink)
        -> Result<Vec<SubscriptionEntity>>;

    /// One consistent read of the whole fascicle state. Absent or malformed
    /// fields decode to their defaults (index 0, empty plan, flags unset).
    async fn read_plan_state(&self, subscription_id: Uuid) -> Result<PlanState>;

    async fn write_active_index(&self, subscription_id: Uuid, index: u32) -> Result<()>;

    async fn write_plan_snapshot(&self, subscription_id: Uuid, plan: &Plan) -> Result<()>;

    async fn mark_first_update_done(&self, subscription_id: Uuid) -> Result<()>;

    /// One-way per-order idempotency flag; never cleared.
    async fn mark_order_processed(&self, subscription_id: Uuid, order_id: Uuid) -> Result<()>;

    async fn set_plan_completed(&self, subscription_id: Uuid, completed: bool) -> Result<()>;

    async fn set_custom_renewal_days(&self, subscription_id: Uuid, days: u32) -> Result<()>;

    async fn update_line(
        &self,
        subscription_id: Uuid,
        line_id: Uuid,
        update: LineUpdate,
    ) -> Result<()>;

    async fn recalculate_totals(&self, subscription_id: Uuid) -> Result<()>;

    async fn update_status(
        &self,
        subscription_id: Uuid,
        status: SubscriptionStatus,
        reason: &str,
    ) -> Result<()>;

    async fn set_billing_schedule(
        &self,
        subscription_id: Uuid,
        interval_days: u32,
        next_payment: DateTime<Utc>,
    ) -> Result<()>;

    async fn add_note(&self, subscription_id: Uuid, note: &str) -> Result<()>;
}
