use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{
        carts::CartItemEntity,
        orders::{NewOrderLine, OrderEntity},
        products::ProductEntity,
        subscriptions::SubscriptionEntity,
    },
    repositories::{
        orders::{LineUpdate, OrderRepository},
        plan_source::PlanSourceRepository,
        products::ProductRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::{
        enums::{order_links::OrderLink, order_statuses::OrderStatus,
            subscription_statuses::SubscriptionStatus},
        plan_state::{PlanState, PlanStamp},
        plans::{Plan, WeekEntry},
    },
};
use crate::usecases::plan_store::PlanStore;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// What a lifecycle entrypoint did. "No plan", "no row", "already processed"
/// and "entity missing" are ordinary outcomes, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// The subscription or order carries no fascicle plan; nothing to do.
    NotFascicle,
    /// A precondition was not met (entity missing, wrong status, ...).
    Skipped,
    /// The event was already applied; duplicate delivery suppressed.
    AlreadyProcessed,
    Activated,
    Advanced { from: u32, to: u32 },
    /// Last week confirmed; cancellation deferred until payment confirmation.
    AwaitingFinalPayment,
    Cancelled,
    RenewalOrderPrepared { week: u32 },
    StockReduced { products: usize },
    ScheduleApplied { days: u32 },
    StateCopied,
}

/// Read-only progress view for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionProgress {
    pub has_plan: bool,
    pub total_weeks: u32,
    pub current_week: u32,
    pub weeks_remaining: u32,
    pub progress_percentage: f64,
    pub is_complete: bool,
}

/// The renewal state machine for fascicle subscriptions.
///
/// Per subscription the states are
/// `AWAITING_FIRST_ACTIVATION -> ACTIVE(week=i) -> ... -> ACTIVE(week=N-1)
/// -> PENDING_CANCELLATION -> CANCELLED`. `active_index` is the last
/// confirmed week; the recurring billing line is kept one week ahead of it.
/// The per-order processed flag is the single source of truth for "already
/// advanced because of this order" and is the last write of every
/// transition, so a re-delivered event after a partial write converges.
pub struct RenewalEngine<F, P, O, S>
where
    F: PlanSourceRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    plan_store: Arc<PlanStore<F>>,
    product_repo: Arc<P>,
    order_repo: Arc<O>,
    subscription_repo: Arc<S>,
}

impl<F, P, O, S> RenewalEngine<F, P, O, S>
where
    F: PlanSourceRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(
        plan_store: Arc<PlanStore<F>>,
        product_repo: Arc<P>,
        order_repo: Arc<O>,
        subscription_repo: Arc<S>,
    ) -> Self {
        Self {
            plan_store,
            product_repo,
            order_repo,
            subscription_repo,
        }
    }

    /// Attaches the product's plan (index 0) to a cart line. Returns whether
    /// a plan was attached.
    pub async fn attach_plan_to_cart_item(
        &self,
        item: &mut CartItemEntity,
    ) -> EngineResult<bool> {
        let product_id = item.variation_id.unwrap_or(item.product_id);
        let product = match self.product_repo.find_by_id(product_id).await? {
            Some(product) => product,
            None => return Ok(false),
        };
        if !product.is_subscription() {
            return Ok(false);
        }

        let plan = self.plan_store.get_plan(product.id).await?;
        if plan.is_empty() {
            return Ok(false);
        }

        debug!(%product_id, weeks = plan.len(), "renewal_engine: plan attached to cart line");
        item.stamp = Some(PlanStamp::new(plan));
        Ok(true)
    }

    /// Promotes the plan stamp carried by the parent order's lines onto the
    /// newly created subscription. The subscription's copy is authoritative
    /// from here on; its idempotency history starts empty.
    pub async fn promote_stamp_to_subscription(
        &self,
        subscription_id: Uuid,
        order_id: Uuid,
    ) -> EngineResult<EngineOutcome> {
        let order = match self.order_repo.find_by_id(order_id).await? {
            Some(order) => order,
            None => return Ok(EngineOutcome::Skipped),
        };

        let stamp = match order.lines.iter().find_map(|line| line.stamp.as_ref()) {
            Some(stamp) => stamp,
            None => return Ok(EngineOutcome::NotFascicle),
        };

        self.subscription_repo
            .write_plan_snapshot(subscription_id, &stamp.plan)
            .await?;
        self.subscription_repo
            .write_active_index(subscription_id, stamp.active_index)
            .await?;

        info!(
            %subscription_id,
            %order_id,
            weeks = stamp.plan.len(),
            active_index = stamp.active_index,
            "renewal_engine: plan promoted to subscription"
        );
        Ok(EngineOutcome::StateCopied)
    }

    /// Applies the product-level custom renewal interval, if configured, to
    /// a newly created subscription.
    pub async fn apply_custom_renewal_schedule(
        &self,
        subscription_id: Uuid,
    ) -> EngineResult<EngineOutcome> {
        let subscription = match self.subscription_repo.find_by_id(subscription_id).await? {
            Some(subscription) => subscription,
            None => return Ok(EngineOutcome::Skipped),
        };

        for line in &subscription.lines {
            let product_id = match line.product_id {
                Some(product_id) => product_id,
                None => continue,
            };
            if !self.plan_store.has_plan(product_id).await? {
                continue;
            }

            let days = match self.plan_store.renewal_days(product_id).await? {
                Some(days) if days > 0 => days,
                _ => continue,
            };

            self.subscription_repo
                .set_custom_renewal_days(subscription_id, days)
                .await?;
            let next_payment = subscription.start_date + Duration::days(days as i64);
            self.subscription_repo
                .set_billing_schedule(subscription_id, days, next_payment)
                .await?;
            self.subscription_repo
                .add_note(
                    subscription_id,
                    &format!("Custom renewal interval applied: every {} days.", days),
                )
                .await?;

            info!(%subscription_id, days, "renewal_engine: custom renewal schedule applied");
            return Ok(EngineOutcome::ScheduleApplied { days });
        }

        Ok(EngineOutcome::NotFascicle)
    }

    /// Transition 1: first activation. Materializes week 0 into the parent
    /// order and stages week 1 onto the recurring billing line, so the next
    /// invoice reflects week 1 while `active_index` stays at 0.
    pub async fn on_subscription_activated(
        &self,
        subscription_id: Uuid,
    ) -> EngineResult<EngineOutcome> {
        let subscription = match self.subscription_repo.find_by_id(subscription_id).await? {
            Some(subscription) => subscription,
            None => return Ok(EngineOutcome::Skipped),
        };
        let state = self.subscription_repo.read_plan_state(subscription_id).await?;
        if !state.has_plan() {
            return Ok(EngineOutcome::NotFascicle);
        }
        if state.first_update_done {
            return Ok(EngineOutcome::AlreadyProcessed);
        }
        if state.active_index != 0 {
            return Ok(EngineOutcome::Skipped);
        }

        self.materialize_first_week(&subscription, &state.plan).await?;

        let total_weeks = state.plan.len();
        match state.plan.row(1) {
            Some(next_row) => {
                self.update_recurring_line(&subscription, next_row).await?;
                self.subscription_repo
                    .add_note(
                        subscription_id,
                        &format!(
                            "Prepared for next renewal (week 2/{}): {}",
                            total_weeks,
                            format_price_minor(next_row.price_minor)
                        ),
                    )
                    .await?;
            }
            None => {
                // Single-week plan: nothing to stage, the first renewal will
                // find no next row and move to pending cancellation.
                self.subscription_repo
                    .add_note(
                        subscription_id,
                        "Single-week plan. The subscription will be cancelled after the next renewal.",
                    )
                    .await?;
            }
        }

        self.subscription_repo
            .mark_first_update_done(subscription_id)
            .await?;

        info!(%subscription_id, total_weeks, "renewal_engine: subscription activated");
        Ok(EngineOutcome::Activated)
    }

    /// Activation entry for the parent order's payment-complete signal.
    pub async fn activate_for_parent_order(
        &self,
        order_id: Uuid,
    ) -> EngineResult<Vec<EngineOutcome>> {
        let subscriptions = self
            .subscription_repo
            .find_for_order(order_id, OrderLink::Parent)
            .await?;

        let mut outcomes = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            outcomes.push(self.on_subscription_activated(subscription.id).await?);
        }
        Ok(outcomes)
    }

    /// Transition 2 entry: a renewal order reached a paid status. This is
    /// the authoritative advance point for weeks >= 1.
    pub async fn on_order_status_changed(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> EngineResult<Vec<EngineOutcome>> {
        if !new_status.is_paid() {
            return Ok(vec![]);
        }
        let order = match self.order_repo.find_by_id(order_id).await? {
            Some(order) => order,
            None => return Ok(vec![EngineOutcome::Skipped]),
        };
        if !order.is_renewal() {
            return Ok(vec![]);
        }

        let subscriptions = self
            .subscription_repo
            .find_for_order(order_id, OrderLink::Renewal)
            .await?;

        let mut outcomes = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            outcomes.push(self.process_renewal_completion(&subscription, order_id).await?);
        }
        Ok(outcomes)
    }

    /// Transition 2 body. Advances `active_index` exactly once per renewal
    /// order; the processed flag is written last so a partially applied
    /// transition converges on re-delivery.
    pub async fn process_renewal_completion(
        &self,
        subscription: &SubscriptionEntity,
        order_id: Uuid,
    ) -> EngineResult<EngineOutcome> {
        let state = self.subscription_repo.read_plan_state(subscription.id).await?;
        if !state.has_plan() {
            return Ok(EngineOutcome::NotFascicle);
        }
        if state.is_order_processed(order_id) {
            debug!(
                subscription_id = %subscription.id,
                %order_id,
                "renewal_engine: renewal order already processed"
            );
            return Ok(EngineOutcome::AlreadyProcessed);
        }

        let current = state.active_index;
        let next = current + 1;
        let total_weeks = state.plan.len();

        match state.plan.row(next as i64) {
            Some(next_row) => {
                self.update_recurring_line(subscription, next_row).await?;
                self.subscription_repo
                    .write_active_index(subscription.id, next)
                    .await?;

                let note = format!(
                    "Week {}/{} confirmed. Preparing week {} ({}).",
                    current + 1,
                    total_weeks,
                    next + 1,
                    format_price_minor(next_row.price_minor)
                );
                self.subscription_repo.add_note(subscription.id, &note).await?;
                self.order_repo.add_note(order_id, &note).await?;

                self.subscription_repo
                    .mark_order_processed(subscription.id, order_id)
                    .await?;

                info!(
                    subscription_id = %subscription.id,
                    %order_id,
                    from = current,
                    to = next,
                    "renewal_engine: advanced to next week"
                );
                Ok(EngineOutcome::Advanced { from: current, to: next })
            }
            None => {
                let note = format!(
                    "Last week confirmed: {}/{}. Awaiting payment confirmation to cancel the subscription.",
                    current + 1,
                    total_weeks
                );
                self.subscription_repo.add_note(subscription.id, &note).await?;
                self.order_repo.add_note(order_id, &note).await?;

                self.subscription_repo
                    .set_plan_completed(subscription.id, true)
                    .await?;
                self.subscription_repo
                    .mark_order_processed(subscription.id, order_id)
                    .await?;

                info!(
                    subscription_id = %subscription.id,
                    %order_id,
                    "renewal_engine: plan completed, cancellation pending"
                );
                Ok(EngineOutcome::AwaitingFinalPayment)
            }
        }
    }

    /// Transition 3: a paid order belonging to a subscription in pending
    /// cancellation cancels it. Safe to call from any paid signal and from
    /// the deferred task; the completion flag guards duplicates.
    pub async fn process_pending_cancellation(
        &self,
        order_id: Uuid,
    ) -> EngineResult<Vec<EngineOutcome>> {
        let order = match self.order_repo.find_by_id(order_id).await? {
            Some(order) => order,
            None => return Ok(vec![EngineOutcome::Skipped]),
        };
        if !order.is_paid() {
            return Ok(vec![]);
        }

        let subscriptions = self
            .subscription_repo
            .find_for_order(order_id, OrderLink::Any)
            .await?;

        let mut outcomes = Vec::new();
        for subscription in subscriptions {
            let state = self.subscription_repo.read_plan_state(subscription.id).await?;
            if !state.has_plan() || !state.plan_completed {
                continue;
            }

            self.subscription_repo
                .set_plan_completed(subscription.id, false)
                .await?;
            self.subscription_repo
                .update_status(
                    subscription.id,
                    SubscriptionStatus::Cancelled,
                    "Fascicle plan completed and payment confirmed.",
                )
                .await?;
            self.subscription_repo
                .add_note(
                    subscription.id,
                    "Subscription cancelled after the last fascicle's payment was confirmed.",
                )
                .await?;

            info!(
                subscription_id = %subscription.id,
                %order_id,
                "renewal_engine: subscription cancelled after final payment"
            );
            outcomes.push(EngineOutcome::Cancelled);
        }
        Ok(outcomes)
    }

    /// Transition 4: a renewal order is being built. Its product lines are
    /// replaced by one subscription-priced line carrying the full week price
    /// plus zero-priced lines for every shipped product, bundles expanded.
    pub async fn on_renewal_order_created(
        &self,
        order_id: Uuid,
        subscription_id: Uuid,
    ) -> EngineResult<EngineOutcome> {
        let subscription = match self.subscription_repo.find_by_id(subscription_id).await? {
            Some(subscription) => subscription,
            None => return Ok(EngineOutcome::Skipped),
        };
        if self.order_repo.find_by_id(order_id).await?.is_none() {
            return Ok(EngineOutcome::Skipped);
        }

        let state = self.subscription_repo.read_plan_state(subscription_id).await?;
        if !state.has_plan() {
            return Ok(EngineOutcome::NotFascicle);
        }

        let week = state.clamped_index();
        let row = match state.plan.row(week as i64) {
            Some(row) => row.clone(),
            None => return Ok(EngineOutcome::Skipped),
        };

        let mut lines = vec![self.build_subscription_line(&subscription, &row, &state)];
        let mut shipped_names = Vec::new();

        for product_id in &row.product_ids {
            let product = match self.product_repo.find_by_id(*product_id).await? {
                Some(product) => product,
                None => {
                    warn!(
                        %subscription_id,
                        %product_id,
                        "renewal_engine: fascicle product missing, line skipped"
                    );
                    continue;
                }
            };

            if product.is_bundle() {
                for constituent in self.product_repo.bundled_products(product.id).await? {
                    shipped_names.push(constituent.name.clone());
                    lines.push(zero_priced_line(&constituent, &state));
                }
            } else {
                shipped_names.push(product.name.clone());
                lines.push(zero_priced_line(&product, &state));
            }
        }

        self.order_repo.replace_lines(order_id, lines).await?;
        self.order_repo.recalculate_totals(order_id).await?;
        self.order_repo
            .add_note(
                order_id,
                &format!(
                    "Fascicle week {}/{}: {} — {}",
                    week + 1,
                    state.plan.len(),
                    shipped_names.join(", "),
                    format_price_minor(row.price_minor)
                ),
            )
            .await?;

        info!(%order_id, %subscription_id, week, "renewal_engine: renewal order populated");
        Ok(EngineOutcome::RenewalOrderPrepared { week })
    }

    /// Transition 5: the scheduled payment signal fires before the renewal
    /// order is charged. At the last week this marks the pending
    /// cancellation so the subscriber is never billed an (N+1)-th week.
    pub async fn on_scheduled_payment(
        &self,
        subscription_id: Uuid,
    ) -> EngineResult<EngineOutcome> {
        if self.subscription_repo.find_by_id(subscription_id).await?.is_none() {
            return Ok(EngineOutcome::Skipped);
        }
        let state = self.subscription_repo.read_plan_state(subscription_id).await?;
        if !state.has_plan() {
            return Ok(EngineOutcome::NotFascicle);
        }

        let last_index = state.plan.last_index().unwrap_or(0);
        if state.active_index < last_index {
            return Ok(EngineOutcome::Skipped);
        }
        if state.plan_completed {
            return Ok(EngineOutcome::AlreadyProcessed);
        }

        self.subscription_repo
            .set_plan_completed(subscription_id, true)
            .await?;
        self.subscription_repo
            .add_note(
                subscription_id,
                "Fascicle plan completed. The subscription will be cancelled once this renewal's payment is confirmed.",
            )
            .await?;

        info!(%subscription_id, "renewal_engine: last week reached, cancellation pending");
        Ok(EngineOutcome::AwaitingFinalPayment)
    }

    /// Manual stock deduction at payment confirmation, idempotent per order.
    /// Automatic platform deduction is suppressed for fascicle orders via
    /// [`Self::should_auto_reduce_stock`].
    pub async fn reduce_fascicle_stock(&self, order_id: Uuid) -> EngineResult<EngineOutcome> {
        let order = match self.order_repo.find_by_id(order_id).await? {
            Some(order) => order,
            None => return Ok(EngineOutcome::Skipped),
        };
        if order.stock_reduced {
            return Ok(EngineOutcome::AlreadyProcessed);
        }

        let mut reduced = Vec::new();
        for line in &order.lines {
            // Only shipped fascicle lines carry stock. The subscription-priced
            // line is stamped too but nothing ships for it.
            if !line.is_fascicle_item {
                continue;
            }
            let product_id = match line.product_id {
                Some(product_id) => product_id,
                None => continue,
            };
            let product = match self.product_repo.find_by_id(product_id).await? {
                Some(product) => product,
                None => continue,
            };
            if !product.manages_stock {
                continue;
            }

            let new_stock = self
                .product_repo
                .reduce_stock(product.id, line.quantity.max(1))
                .await?;
            reduced.push(format!("{} (-{} -> {})", product.name, line.quantity.max(1), new_stock));
        }

        if reduced.is_empty() {
            return Ok(EngineOutcome::Skipped);
        }

        self.order_repo.mark_stock_reduced(order_id).await?;
        self.order_repo
            .add_note(
                order_id,
                &format!("Stock reduced for fascicle products: {}", reduced.join(", ")),
            )
            .await?;

        info!(%order_id, products = reduced.len(), "renewal_engine: stock reduced");
        Ok(EngineOutcome::StockReduced { products: reduced.len() })
    }

    /// Whether the platform may run its automatic stock deduction for this
    /// order. False as soon as fascicle lines are present; their stock is
    /// deducted manually at payment confirmation.
    pub fn should_auto_reduce_stock(&self, order: &OrderEntity) -> bool {
        !order.has_fascicle_lines()
    }

    /// User-initiated renewal, early renewal and resubscription are blocked
    /// for planned subscriptions: the sequence is system-driven only, a
    /// user-triggered renewal would desynchronize the staged billing line.
    pub async fn is_user_renewal_allowed(&self, subscription_id: Uuid) -> EngineResult<bool> {
        let state = self.subscription_repo.read_plan_state(subscription_id).await?;
        Ok(!state.has_plan())
    }

    pub async fn subscription_progress(
        &self,
        subscription_id: Uuid,
    ) -> EngineResult<SubscriptionProgress> {
        let state = self.subscription_repo.read_plan_state(subscription_id).await?;
        Ok(progress_from_state(&state))
    }

    /// Adds week 0's products to the parent order as zero-priced fascicle
    /// lines. Idempotent by product identity: products already on the order
    /// are not added again.
    async fn materialize_first_week(
        &self,
        subscription: &SubscriptionEntity,
        plan: &Plan,
    ) -> EngineResult<()> {
        let first_row = match plan.row(0) {
            Some(row) => row.clone(),
            None => return Ok(()),
        };
        let parent_order_id = match subscription.parent_order_id {
            Some(order_id) => order_id,
            None => return Ok(()),
        };
        let order = match self.order_repo.find_by_id(parent_order_id).await? {
            Some(order) => order,
            None => return Ok(()),
        };

        let state_stamp = PlanStamp {
            plan: plan.clone(),
            active_index: 0,
        };

        let mut added = Vec::new();
        for product_id in &first_row.product_ids {
            if order.contains_product(*product_id) {
                continue;
            }
            let product = match self.product_repo.find_by_id(*product_id).await? {
                Some(product) => product,
                None => continue,
            };

            // The week price rides on the first fascicle line; companion
            // products ship at zero.
            let line_price = if added.is_empty() {
                first_row.price_minor
            } else {
                0
            };
            self.order_repo
                .add_line(
                    parent_order_id,
                    NewOrderLine {
                        product_id: Some(product.id),
                        name: product.name.clone(),
                        quantity: 1,
                        subtotal_minor: line_price,
                        total_minor: line_price,
                        tax_class: product.tax_class.clone(),
                        is_fascicle_item: true,
                        stamp: Some(state_stamp.clone()),
                    },
                )
                .await?;
            added.push(product.name);
        }

        if added.is_empty() {
            return Ok(());
        }

        // The checkout price still standing on the subscription line would
        // charge the week twice now that the fascicle line carries it.
        for line in &order.lines {
            let product_id = match line.product_id {
                Some(product_id) => product_id,
                None => continue,
            };
            let product = match self.product_repo.find_by_id(product_id).await? {
                Some(product) => product,
                None => continue,
            };
            if !product.is_subscription() {
                continue;
            }
            self.order_repo
                .update_line(
                    parent_order_id,
                    line.id,
                    LineUpdate {
                        subtotal_minor: Some(0),
                        total_minor: Some(0),
                        ..LineUpdate::default()
                    },
                )
                .await?;
        }

        self.order_repo.recalculate_totals(parent_order_id).await?;
        self.subscription_repo
            .add_note(
                subscription.id,
                &format!(
                    "First fascicle added to the order: {} — {}",
                    added.join(", "),
                    format_price_minor(first_row.price_minor)
                ),
            )
            .await?;
        Ok(())
    }

    /// Rewrites the subscription's recurring lines to the given week's first
    /// product and price. A missing product skips the line rewrite but does
    /// not stop the caller; a stalled index would be worse than a stale
    /// line.
    async fn update_recurring_line(
        &self,
        subscription: &SubscriptionEntity,
        row: &WeekEntry,
    ) -> EngineResult<()> {
        let product_id = match row.product_ids.first() {
            Some(product_id) => *product_id,
            None => return Ok(()),
        };
        let product = match self.product_repo.find_by_id(product_id).await? {
            Some(product) => product,
            None => {
                warn!(
                    subscription_id = %subscription.id,
                    %product_id,
                    "renewal_engine: next week's product missing, billing line kept"
                );
                return Ok(());
            }
        };

        for line in &subscription.lines {
            let quantity = line.quantity.max(1) as i64;
            self.subscription_repo
                .update_line(
                    subscription.id,
                    line.id,
                    LineUpdate {
                        product_id: Some(product.id),
                        name: Some(product.name.clone()),
                        subtotal_minor: Some(row.price_minor * quantity),
                        total_minor: Some(row.price_minor * quantity),
                    },
                )
                .await?;
        }
        self.subscription_repo
            .recalculate_totals(subscription.id)
            .await?;
        Ok(())
    }

    fn build_subscription_line(
        &self,
        subscription: &SubscriptionEntity,
        row: &WeekEntry,
        state: &PlanState,
    ) -> NewOrderLine {
        // The subscription-priced line reuses the recurring line's product
        // and name so the invoice stays recognizable.
        let template = subscription.lines.first();
        NewOrderLine {
            product_id: template.and_then(|line| line.product_id),
            name: template
                .map(|line| line.name.clone())
                .unwrap_or_else(|| "Subscription".to_string()),
            quantity: 1,
            subtotal_minor: row.price_minor,
            total_minor: row.price_minor,
            tax_class: template
                .map(|line| line.tax_class.clone())
                .unwrap_or_default(),
            is_fascicle_item: false,
            stamp: Some(state.stamp()),
        }
    }
}

fn zero_priced_line(product: &ProductEntity, state: &PlanState) -> NewOrderLine {
    NewOrderLine {
        product_id: Some(product.id),
        name: product.name.clone(),
        quantity: 1,
        subtotal_minor: 0,
        total_minor: 0,
        tax_class: product.tax_class.clone(),
        is_fascicle_item: true,
        stamp: Some(state.stamp()),
    }
}

fn progress_from_state(state: &PlanState) -> SubscriptionProgress {
    if !state.has_plan() {
        return SubscriptionProgress {
            has_plan: false,
            total_weeks: 0,
            current_week: 0,
            weeks_remaining: 0,
            progress_percentage: 0.0,
            is_complete: false,
        };
    }

    let total_weeks = state.plan.len() as u32;
    let current_week = state.active_index + 1;
    let weeks_remaining = total_weeks.saturating_sub(current_week);
    let progress = (current_week as f64 / total_weeks as f64) * 100.0;

    SubscriptionProgress {
        has_plan: true,
        total_weeks,
        current_week,
        weeks_remaining,
        progress_percentage: (progress * 100.0).round() / 100.0,
        is_complete: current_week >= total_weeks,
    }
}

fn format_price_minor(price_minor: i64) -> String {
    format!("{}.{:02}", price_minor / 100, (price_minor % 100).abs())
}
