pub mod enums;
pub mod plan_state;
pub mod plans;
