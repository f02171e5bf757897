use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

/// A product reference as the plan editor stored it. References may point at
/// products that no longer resolve; those rows are dropped, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRef {
    Resolved(Uuid),
    Unresolved(String),
}

/// One raw row from the plan editor, before validation. Any field may be
/// missing or unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRowRecord {
    pub product_refs: Vec<ProductRef>,
    pub price_minor: Option<i64>,
    pub note: Option<String>,
}

/// The external plan-editor data source ("Field Source").
#[async_trait]
#[automock]
pub trait PlanSourceRepository {
    /// Ordered raw plan rows configured for a subscribable product. Empty
    /// when the product carries no plan.
    async fn plan_rows(&self, product_id: Uuid) -> Result<Vec<PlanRowRecord>>;

    /// Optional product-level override of the billing period, in days.
    async fn renewal_days(&self, product_id: Uuid) -> Result<Option<u32>>;
}
