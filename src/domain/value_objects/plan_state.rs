use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::plans::Plan;

/// The plan data stamped onto a cart line or order line: the snapshot plus
/// the index it was captured at. This is what `copy_state` moves between
/// records — flags and idempotency history never travel with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStamp {
    pub plan: Plan,
    pub active_index: u32,
}

impl PlanStamp {
    pub fn new(plan: Plan) -> Self {
        Self {
            plan,
            active_index: 0,
        }
    }
}

/// Per-subscription fascicle state. This is the authoritative copy once the
/// subscription exists; order-line stamps are written from it, never read
/// back (except the one-time promotion at subscription creation).
///
/// Serialized only at the persistence boundary; engine code works with this
/// struct, never with raw metadata strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanState {
    pub plan: Plan,
    pub active_index: u32,
    pub first_update_done: bool,
    /// Set when the last week's renewal has completed and the subscription
    /// awaits payment confirmation before being cancelled.
    pub plan_completed: bool,
    pub processed_order_ids: HashSet<Uuid>,
    pub custom_renewal_days: Option<u32>,
}

impl PlanState {
    /// Builds the subscription's state from the order-line stamp promoted at
    /// subscription creation. Idempotency history starts fresh.
    pub fn from_stamp(stamp: &PlanStamp) -> Self {
        Self {
            plan: stamp.plan.clone(),
            active_index: stamp.active_index,
            ..Self::default()
        }
    }

    pub fn has_plan(&self) -> bool {
        !self.plan.is_empty()
    }

    /// The stored index clamped to a valid row position, for row lookup.
    pub fn clamped_index(&self) -> u32 {
        match self.plan.last_index() {
            Some(last) => self.active_index.min(last),
            None => 0,
        }
    }

    pub fn is_order_processed(&self, order_id: Uuid) -> bool {
        self.processed_order_ids.contains(&order_id)
    }

    /// The stamp written onto renewal-order lines for record keeping.
    pub fn stamp(&self) -> PlanStamp {
        PlanStamp {
            plan: self.plan.clone(),
            active_index: self.active_index,
        }
    }
}
