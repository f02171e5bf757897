pub mod cancellation;
pub mod lifecycle;
pub mod plan_store;
pub mod price_override;
pub mod renewal_engine;
