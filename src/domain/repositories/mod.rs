pub mod orders;
pub mod plan_source;
pub mod products;
pub mod subscriptions;
