use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::plan_source::{PlanRowRecord, PlanSourceRepository, ProductRef},
    value_objects::plans::{Plan, WeekEntry},
};

/// Reads the weekly plan for a product from the plan editor and normalizes
/// it. Rows with no resolvable product or no price are dropped silently — a
/// malformed row must not invalidate the whole plan. Results are cached per
/// product for the life of the store instance (one request).
pub struct PlanStore<F>
where
    F: PlanSourceRepository + Send + Sync + 'static,
{
    source: Arc<F>,
    cache: Mutex<HashMap<Uuid, Plan>>,
}

impl<F> PlanStore<F>
where
    F: PlanSourceRepository + Send + Sync + 'static,
{
    pub fn new(source: Arc<F>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_plan(&self, product_id: Uuid) -> Result<Plan> {
        let mut cache = self.cache.lock().await;
        if let Some(plan) = cache.get(&product_id) {
            return Ok(plan.clone());
        }

        let rows = self.source.plan_rows(product_id).await?;
        let row_count = rows.len();
        let entries: Vec<WeekEntry> = rows.into_iter().filter_map(normalize_row).collect();

        if entries.len() < row_count {
            warn!(
                %product_id,
                dropped = row_count - entries.len(),
                kept = entries.len(),
                "plan_store: dropped invalid plan rows"
            );
        }
        debug!(%product_id, weeks = entries.len(), "plan_store: plan loaded");

        let plan = Plan::new(entries);
        cache.insert(product_id, plan.clone());
        Ok(plan)
    }

    pub async fn has_plan(&self, product_id: Uuid) -> Result<bool> {
        Ok(!self.get_plan(product_id).await?.is_empty())
    }

    /// Optional per-product billing interval override, in days.
    pub async fn renewal_days(&self, product_id: Uuid) -> Result<Option<u32>> {
        self.source.renewal_days(product_id).await
    }
}

fn normalize_row(row: PlanRowRecord) -> Option<WeekEntry> {
    let product_ids: Vec<Uuid> = row
        .product_refs
        .iter()
        .filter_map(|product_ref| match product_ref {
            ProductRef::Resolved(id) => Some(*id),
            ProductRef::Unresolved(_) => None,
        })
        .collect();

    if product_ids.is_empty() {
        return None;
    }

    // Zero is a valid price; absence is not.
    let price_minor = row.price_minor?.max(0);

    Some(WeekEntry {
        product_ids,
        price_minor,
        note: sanitize_note(row.note.as_deref().unwrap_or_default()),
    })
}

fn sanitize_note(note: &str) -> String {
    note.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
