use serde::{Deserialize, Serialize};

/// How an order relates to a subscription when looking subscriptions up for
/// an order: the original checkout order, a renewal invoice, or either.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderLink {
    Parent,
    Renewal,
    Any,
}
