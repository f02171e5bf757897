use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProductType {
    #[default]
    Simple,
    Subscription,
    VariableSubscription,
    Bundle,
}

impl Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let product_type = match self {
            ProductType::Simple => "simple",
            ProductType::Subscription => "subscription",
            ProductType::VariableSubscription => "variable_subscription",
            ProductType::Bundle => "bundle",
        };
        write!(f, "{}", product_type)
    }
}

impl ProductType {
    pub fn from_str(value: &str) -> Self {
        match value {
            "subscription" => ProductType::Subscription,
            "variable_subscription" => ProductType::VariableSubscription,
            "bundle" => ProductType::Bundle,
            _ => ProductType::Simple,
        }
    }

    pub fn is_subscription(&self) -> bool {
        matches!(
            self,
            ProductType::Subscription | ProductType::VariableSubscription
        )
    }
}
