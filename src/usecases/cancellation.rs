use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::repositories::{
    orders::OrderRepository, plan_source::PlanSourceRepository, products::ProductRepository,
    subscriptions::SubscriptionRepository,
};
use crate::usecases::renewal_engine::{EngineOutcome, RenewalEngine};

/// Deferred cancellation after the final renewal. The delay lets the payment
/// pipeline settle; the task re-reads the persisted state, so a cancellation
/// that already happened (or a state that changed meanwhile) is a no-op.
pub struct CancellationScheduler<F, P, O, S>
where
    F: PlanSourceRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    engine: Arc<RenewalEngine<F, P, O, S>>,
    delay: Duration,
}

impl<F, P, O, S> CancellationScheduler<F, P, O, S>
where
    F: PlanSourceRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(engine: Arc<RenewalEngine<F, P, O, S>>, delay: Duration) -> Self {
        Self { engine, delay }
    }

    /// Spawns the one-shot check for the given order. Scheduling twice is
    /// harmless: the completion flag guards the actual cancellation.
    pub fn schedule(&self, order_id: Uuid) -> JoinHandle<()> {
        let engine = Arc::clone(&self.engine);
        let delay = self.delay;

        info!(%order_id, delay_seconds = delay.as_secs(), "cancellation: check scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            match engine.process_pending_cancellation(order_id).await {
                Ok(outcomes) if outcomes.contains(&EngineOutcome::Cancelled) => {
                    info!(%order_id, "cancellation: subscription cancelled by deferred check");
                }
                Ok(_) => {
                    debug!(%order_id, "cancellation: nothing to cancel");
                }
                Err(error) => {
                    error!(%order_id, "cancellation: deferred check failed: {}", error);
                }
            }
        })
    }
}
