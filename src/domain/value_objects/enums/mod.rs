pub mod order_links;
pub mod order_statuses;
pub mod product_types;
pub mod subscription_statuses;
