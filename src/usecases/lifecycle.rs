use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::domain::repositories::{
    orders::OrderRepository, plan_source::PlanSourceRepository, products::ProductRepository,
    subscriptions::SubscriptionRepository,
};
use crate::domain::value_objects::enums::order_statuses::OrderStatus;
use crate::usecases::cancellation::CancellationScheduler;
use crate::usecases::renewal_engine::{EngineOutcome, EngineResult, RenewalEngine};

/// The commerce platform's lifecycle signals, normalized to typed events.
/// Each event runs the engine's entrypoints exactly once, in a defined
/// order, so overlapping platform hooks cannot double-apply a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleEvent {
    /// A subscription was created from a checkout order; its plan stamp and
    /// custom schedule must be promoted.
    SubscriptionCreated {
        subscription_id: Uuid,
        order_id: Uuid,
    },
    SubscriptionActivated {
        subscription_id: Uuid,
    },
    RenewalOrderCreated {
        order_id: Uuid,
        subscription_id: Uuid,
    },
    OrderStatusChanged {
        order_id: Uuid,
        new_status: OrderStatus,
    },
    PaymentCompleted {
        order_id: Uuid,
    },
    ScheduledPayment {
        subscription_id: Uuid,
    },
}

pub struct LifecycleDispatcher<F, P, O, S>
where
    F: PlanSourceRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    engine: Arc<RenewalEngine<F, P, O, S>>,
    scheduler: CancellationScheduler<F, P, O, S>,
}

impl<F, P, O, S> LifecycleDispatcher<F, P, O, S>
where
    F: PlanSourceRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(
        engine: Arc<RenewalEngine<F, P, O, S>>,
        scheduler: CancellationScheduler<F, P, O, S>,
    ) -> Self {
        Self { engine, scheduler }
    }

    pub async fn dispatch(&self, event: LifecycleEvent) -> EngineResult<Vec<EngineOutcome>> {
        debug!(?event, "lifecycle: dispatching");
        match event {
            LifecycleEvent::SubscriptionCreated {
                subscription_id,
                order_id,
            } => {
                let mut outcomes = vec![
                    self.engine
                        .promote_stamp_to_subscription(subscription_id, order_id)
                        .await?,
                ];
                outcomes.push(
                    self.engine
                        .apply_custom_renewal_schedule(subscription_id)
                        .await?,
                );
                Ok(outcomes)
            }
            LifecycleEvent::SubscriptionActivated { subscription_id } => {
                Ok(vec![self.engine.on_subscription_activated(subscription_id).await?])
            }
            LifecycleEvent::RenewalOrderCreated {
                order_id,
                subscription_id,
            } => Ok(vec![
                self.engine
                    .on_renewal_order_created(order_id, subscription_id)
                    .await?,
            ]),
            LifecycleEvent::OrderStatusChanged {
                order_id,
                new_status,
            } => {
                // The advance runs first so a final-week completion sets the
                // pending flag before the cancellation check reads it.
                let mut outcomes = self
                    .engine
                    .on_order_status_changed(order_id, new_status)
                    .await?;
                if outcomes.contains(&EngineOutcome::AwaitingFinalPayment) {
                    self.scheduler.schedule(order_id);
                }
                outcomes.extend(self.engine.process_pending_cancellation(order_id).await?);
                Ok(outcomes)
            }
            LifecycleEvent::PaymentCompleted { order_id } => {
                let mut outcomes = vec![self.engine.reduce_fascicle_stock(order_id).await?];
                outcomes.extend(self.engine.activate_for_parent_order(order_id).await?);
                outcomes.extend(self.engine.process_pending_cancellation(order_id).await?);
                Ok(outcomes)
            }
            LifecycleEvent::ScheduledPayment { subscription_id } => {
                Ok(vec![self.engine.on_scheduled_payment(subscription_id).await?])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::orders::OrderEntity,
        repositories::{
            orders::MockOrderRepository, plan_source::MockPlanSourceRepository,
            products::MockProductRepository, subscriptions::MockSubscriptionRepository,
        },
        value_objects::enums::order_links::OrderLink,
    };
    use crate::usecases::plan_store::PlanStore;
    use mockall::predicate::eq;
    use std::time::Duration;

    fn dispatcher(
        products: MockProductRepository,
        orders: MockOrderRepository,
        subscriptions: MockSubscriptionRepository,
    ) -> LifecycleDispatcher<
        MockPlanSourceRepository,
        MockProductRepository,
        MockOrderRepository,
        MockSubscriptionRepository,
    > {
        let engine = Arc::new(RenewalEngine::new(
            Arc::new(PlanStore::new(Arc::new(MockPlanSourceRepository::new()))),
            Arc::new(products),
            Arc::new(orders),
            Arc::new(subscriptions),
        ));
        let scheduler = CancellationScheduler::new(Arc::clone(&engine), Duration::from_secs(1));
        LifecycleDispatcher::new(engine, scheduler)
    }

    #[tokio::test]
    async fn unpaid_status_change_touches_nothing() {
        let mut orders = MockOrderRepository::new();
        // Only the cancellation check loads the order; it is gone already.
        orders
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let dispatcher = dispatcher(
            MockProductRepository::new(),
            orders,
            MockSubscriptionRepository::new(),
        );

        let outcomes = dispatcher
            .dispatch(LifecycleEvent::OrderStatusChanged {
                order_id: Uuid::new_v4(),
                new_status: OrderStatus::Pending,
            })
            .await
            .unwrap();

        assert_eq!(outcomes, vec![EngineOutcome::Skipped]);
    }

    #[tokio::test]
    async fn paid_non_renewal_order_runs_only_the_cancellation_check() {
        let order_id = Uuid::new_v4();
        let order = OrderEntity {
            id: order_id,
            status: OrderStatus::Completed,
            renews_subscription_id: None,
            lines: vec![],
            stock_reduced: false,
        };

        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().with(eq(order_id)).returning(move |_| {
            let order = order.clone();
            Box::pin(async move { Ok(Some(order)) })
        });

        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_find_for_order()
            .with(eq(order_id), eq(OrderLink::Any))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(vec![]) }));

        let dispatcher = dispatcher(
            MockProductRepository::new(),
            orders,
            subscriptions,
        );

        let outcomes = dispatcher
            .dispatch(LifecycleEvent::OrderStatusChanged {
                order_id,
                new_status: OrderStatus::Completed,
            })
            .await
            .unwrap();

        assert!(outcomes.is_empty());
    }
}
