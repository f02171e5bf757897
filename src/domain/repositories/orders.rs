use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::orders::{NewOrderLine, OrderEntity};

/// Field updates for an existing order or subscription line. `None` leaves
/// the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineUpdate {
    pub product_id: Option<Uuid>,
    pub name: Option<String>,
    pub subtotal_minor: Option<i64>,
    pub total_minor: Option<i64>,
}

/// Order persistence on the commerce backend. Lines cover product items
/// only; shipping and fee rows are the platform's concern.
#[async_trait]
#[automock]
pub trait OrderRepository {
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderEntity>>;

    async fn add_line(&self, order_id: Uuid, line: NewOrderLine) -> Result<()>;

    /// Replaces every product line of the order with the given set.
    async fn replace_lines(&self, order_id: Uuid, lines: Vec<NewOrderLine>) -> Result<()>;

    async fn update_line(&self, order_id: Uuid, line_id: Uuid, update: LineUpdate) -> Result<()>;

    async fn recalculate_totals(&self, order_id: Uuid) -> Result<()>;

    async fn add_note(&self, order_id: Uuid, note: &str) -> Result<()>;

    /// Per-order idempotency flag for manual stock deduction.
    async fn mark_stock_reduced(&self, order_id: Uuid) -> Result<()>;
}
