use uuid::Uuid;

use crate::domain::entities::{carts::CartItemEntity, orders::OrderEntity};

/// Where the price is being resolved. Paying an existing order must charge
/// what that order already recorded, not what the plan says today.
#[derive(Debug, Clone, Copy)]
pub enum PriceContext<'a> {
    Cart,
    PayExistingOrder(&'a OrderEntity),
}

/// Checkout-time price resolution for fascicle lines. Pure over the
/// entities; the caller supplies the cart line and, when repaying, the
/// order being paid.
pub struct PriceOverride;

impl PriceOverride {
    /// Resolves the unit price for a cart line, in minor units. `None`
    /// means no override applies and the catalog price stands.
    pub fn resolve_unit_price(item: &CartItemEntity, context: &PriceContext<'_>) -> Option<i64> {
        if let PriceContext::PayExistingOrder(order) = context {
            if let Some(price) = Self::price_from_order(item, order) {
                return Some(price);
            }
        }
        Self::price_from_stamp(item)
    }

    /// When repaying, the recorded order line wins over the stamped plan.
    /// Identity match first; failing that, any stamped line with a non-zero
    /// total (the subscription-priced line of a renewal order).
    fn price_from_order(item: &CartItemEntity, order: &OrderEntity) -> Option<i64> {
        let identity_match = order.lines.iter().find(|line| match item.variation_id {
            Some(variation_id) => line.variation_id == Some(variation_id),
            None => line.product_id == Some(item.product_id),
        });
        if let Some(line) = identity_match {
            return Some(line.unit_price_minor());
        }

        order
            .lines
            .iter()
            .find(|line| line.stamp.is_some() && line.total_minor > 0)
            .map(|line| line.unit_price_minor())
    }

    fn price_from_stamp(item: &CartItemEntity) -> Option<i64> {
        let stamp = item.stamp.as_ref()?;
        stamp
            .plan
            .row(stamp.active_index as i64)
            .map(|row| row.price_minor)
    }

    /// Fascicle products are not purchasable standalone. An exception is
    /// made while paying an order the product already belongs to, or whose
    /// stamped plan ships it in some week.
    pub fn allow_purchase(product_id: Uuid, paying_order: Option<&OrderEntity>) -> bool {
        let order = match paying_order {
            Some(order) => order,
            None => return false,
        };
        if order.contains_product(product_id) {
            return true;
        }
        order.lines.iter().any(|line| {
            line.stamp.as_ref().is_some_and(|stamp| {
                stamp
                    .plan
                    .entries()
                    .iter()
                    .any(|row| row.product_ids.contains(&product_id))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::orders::OrderLineEntity,
        value_objects::{
            enums::order_statuses::OrderStatus,
            plan_state::PlanStamp,
            plans::{Plan, WeekEntry},
        },
    };

    fn plan_of(prices: &[i64]) -> Plan {
        Plan::new(
            prices
                .iter()
                .map(|price| WeekEntry {
                    product_ids: vec![Uuid::new_v4()],
                    price_minor: *price,
                    note: String::new(),
                })
                .collect(),
        )
    }

    fn cart_item(stamp: Option<PlanStamp>) -> CartItemEntity {
        CartItemEntity {
            product_id: Uuid::new_v4(),
            variation_id: None,
            quantity: 1,
            stamp,
        }
    }

    fn order_line(product_id: Uuid, quantity: u32, total_minor: i64) -> OrderLineEntity {
        OrderLineEntity {
            id: Uuid::new_v4(),
            product_id: Some(product_id),
            variation_id: None,
            name: "Line".to_string(),
            quantity,
            subtotal_minor: total_minor,
            total_minor,
            tax_class: String::new(),
            is_fascicle_item: false,
            stamp: None,
        }
    }

    fn order_with(lines: Vec<OrderLineEntity>) -> OrderEntity {
        OrderEntity {
            id: Uuid::new_v4(),
            status: OrderStatus::Pending,
            renews_subscription_id: None,
            lines,
            stock_reduced: false,
        }
    }

    #[test]
    fn cart_price_comes_from_the_stamped_row() {
        let mut stamp = PlanStamp::new(plan_of(&[1000, 1200, 1400]));
        stamp.active_index = 1;
        let item = cart_item(Some(stamp));

        assert_eq!(
            PriceOverride::resolve_unit_price(&item, &PriceContext::Cart),
            Some(1200)
        );
    }

    #[test]
    fn no_stamp_means_no_override() {
        let item = cart_item(None);
        assert_eq!(
            PriceOverride::resolve_unit_price(&item, &PriceContext::Cart),
            None
        );
    }

    #[test]
    fn stamp_index_past_the_plan_means_no_override() {
        let mut stamp = PlanStamp::new(plan_of(&[1000]));
        stamp.active_index = 5;
        let item = cart_item(Some(stamp));

        assert_eq!(
            PriceOverride::resolve_unit_price(&item, &PriceContext::Cart),
            None
        );
    }

    #[test]
    fn repaying_charges_what_the_order_recorded() {
        // The stamped plan says the current week costs 1400, but the order
        // being repaid was invoiced at week price 1200 for quantity 2.
        let mut stamp = PlanStamp::new(plan_of(&[1000, 1400]));
        stamp.active_index = 1;
        let mut item = cart_item(Some(stamp));

        let line = order_line(item.product_id, 2, 2400);
        item.quantity = 2;
        let order = order_with(vec![line]);

        assert_eq!(
            PriceOverride::resolve_unit_price(&item, &PriceContext::PayExistingOrder(&order)),
            Some(1200)
        );
    }

    #[test]
    fn repaying_prefers_variation_identity() {
        let variation_id = Uuid::new_v4();
        let mut item = cart_item(None);
        item.variation_id = Some(variation_id);

        let mut matching = order_line(Uuid::new_v4(), 1, 900);
        matching.variation_id = Some(variation_id);
        let other = order_line(item.product_id, 1, 5000);
        let order = order_with(vec![other, matching]);

        assert_eq!(
            PriceOverride::resolve_unit_price(&item, &PriceContext::PayExistingOrder(&order)),
            Some(900)
        );
    }

    #[test]
    fn repaying_falls_back_to_the_stamped_priced_line() {
        let mut priced = order_line(Uuid::new_v4(), 1, 1300);
        priced.stamp = Some(PlanStamp::new(plan_of(&[1300])));
        let zero = order_line(Uuid::new_v4(), 1, 0);
        let order = order_with(vec![zero, priced]);

        let item = cart_item(None);
        assert_eq!(
            PriceOverride::resolve_unit_price(&item, &PriceContext::PayExistingOrder(&order)),
            Some(1300)
        );
    }

    #[test]
    fn standalone_purchase_is_blocked() {
        assert!(!PriceOverride::allow_purchase(Uuid::new_v4(), None));
    }

    #[test]
    fn purchase_allowed_while_paying_a_containing_order() {
        let product_id = Uuid::new_v4();
        let order = order_with(vec![order_line(product_id, 1, 1000)]);
        assert!(PriceOverride::allow_purchase(product_id, Some(&order)));
        assert!(!PriceOverride::allow_purchase(Uuid::new_v4(), Some(&order)));
    }

    #[test]
    fn purchase_allowed_when_a_stamped_plan_ships_the_product() {
        let shipped = Uuid::new_v4();
        let plan = Plan::new(vec![WeekEntry {
            product_ids: vec![shipped],
            price_minor: 1000,
            note: String::new(),
        }]);
        let mut line = order_line(Uuid::new_v4(), 1, 1000);
        line.stamp = Some(PlanStamp::new(plan));
        let order = order_with(vec![line]);

        assert!(PriceOverride::allow_purchase(shipped, Some(&order)));
    }
}
