use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::builder::{validate_contents, OrderBuilder};
use super::events::{OrderCancelled, OrderEvent, OrderStatusChanged};
use super::state::{OrderState, Transition};
use super::value_objects::{CustomerInfo, OrderId, OrderItem, PaymentOutcome};

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================
//
// Key rules:
// 1. Items and customer are validated on construction (builder or
//    deserialize) and never change
// 2. State only moves through the transition table (or a command's restore)
// 3. Every mutation records an event; the owner drains and publishes them
//
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    // Identity
    id: OrderId,

    // Contents (fixed at build time)
    customer: CustomerInfo,
    items: Vec<OrderItem>,
    delivery_address: Option<String>,
    special_instructions: Option<String>,

    // Current State
    state: OrderState,
    payment: Option<PaymentOutcome>,

    // Audit Trail
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    #[serde(skip)]
    pending_events: Vec<OrderEvent>,
}

/// Wire shape of an order; only becomes an `Order` after validation
#[derive(Deserialize)]
struct OrderRecord {
    id: OrderId,
    customer: CustomerInfo,
    items: Vec<OrderItem>,
    delivery_address: Option<String>,
    special_instructions: Option<String>,
    state: OrderState,
    payment: Option<PaymentOutcome>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'de> Deserialize<'de> for Order {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = OrderRecord::deserialize(deserializer)?;
        validate_contents(&record.customer, &record.items).map_err(serde::de::Error::custom)?;

        Ok(Self {
            id: record.id,
            customer: record.customer,
            items: record.items,
            delivery_address: record.delivery_address,
            special_instructions: record.special_instructions,
            state: record.state,
            payment: record.payment,
            created_at: record.created_at,
            updated_at: record.updated_at,
            pending_events: Vec::new(),
        })
    }
}

impl Order {
    pub fn builder(customer_name: impl Into<String>, customer_phone: impl Into<String>) -> OrderBuilder {
        OrderBuilder::new(customer_name, customer_phone)
    }

    /// Only reachable through `OrderBuilder::build`, which has already validated
    pub(super) fn from_validated(
        customer: CustomerInfo,
        items: Vec<OrderItem>,
        delivery_address: Option<String>,
        special_instructions: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            customer,
            items,
            delivery_address,
            special_instructions,
            state: OrderState::Pending,
            payment: None,
            created_at: now,
            updated_at: now,
            pending_events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------------

    /// Move one step along the lifecycle; terminal states stay put
    pub fn advance(&mut self) -> Transition {
        let transition = self.state.advance();

        tracing::info!(
            order_id = %self.id,
            from = %transition.from,
            to = %transition.to,
            "{}",
            transition.narration
        );

        if !transition.is_noop() {
            self.set_state(transition.to);
        }

        transition
    }

    /// Returns true iff the order was cancelled by this call
    pub fn cancel(&mut self) -> bool {
        let from = self.state;
        match from.cancel() {
            Some(cancelled) => {
                self.set_state(cancelled);
                self.pending_events.push(OrderEvent::Cancelled(OrderCancelled { from }));
                tracing::info!(order_id = %self.id, from = %from, "Order cancelled");
                true
            }
            None => {
                tracing::info!(
                    order_id = %self.id,
                    state = %from,
                    "Cannot cancel order in current state"
                );
                false
            }
        }
    }

    /// Raw overwrite, bypassing the transition table. Used by command undo.
    pub(crate) fn restore_state(&mut self, state: OrderState) {
        if self.state != state {
            tracing::debug!(order_id = %self.id, from = %self.state, to = %state, "Restoring order state");
            self.set_state(state);
        }
    }

    pub fn set_payment_outcome(&mut self, outcome: PaymentOutcome) {
        self.updated_at = Utc::now();
        self.pending_events.push(OrderEvent::PaymentProcessed(outcome.clone()));
        self.payment = Some(outcome);
    }

    fn set_state(&mut self, to: OrderState) {
        let from = self.state;
        self.state = to;
        self.updated_at = Utc::now();
        self.pending_events
            .push(OrderEvent::StatusChanged(OrderStatusChanged { from, to }));
    }

    pub(crate) fn record_placed(&mut self) {
        self.pending_events.push(OrderEvent::Placed);
    }

    /// Drain events recorded since the last call
    pub fn take_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn status(&self) -> OrderState {
        self.state
    }

    pub fn can_cancel(&self) -> bool {
        self.state.can_cancel()
    }

    pub fn can_modify(&self) -> bool {
        self.state.can_modify()
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn delivery_address(&self) -> Option<&str> {
        self.delivery_address.as_deref()
    }

    pub fn special_instructions(&self) -> Option<&str> {
        self.special_instructions.as_deref()
    }

    pub fn payment(&self) -> Option<&PaymentOutcome> {
        self.payment.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn total_value(&self) -> Decimal {
        self.items.iter().map(OrderItem::total_price).sum()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}")?;
        writeln!(f, "ORDER SUMMARY ({})", self.id)?;
        writeln!(f, "Customer: {}", self.customer.name)?;
        writeln!(f, "Phone: {}", self.customer.phone)?;
        if let Some(email) = &self.customer.email {
            writeln!(f, "Email: {email}")?;
        }
        if let Some(address) = &self.delivery_address {
            writeln!(f, "Delivery Address: {address}")?;
        }
        writeln!(
            f,
            "Status: {} (Can cancel: {}, Can modify: {})",
            self.state,
            self.can_cancel(),
            self.can_modify()
        )?;
        writeln!(f, "Items:")?;
        for item in &self.items {
            writeln!(f, "  - {}: ${:.2}", item.description(), item.total_price())?;
        }
        writeln!(f, "Total: ${:.2}", self.total_value())?;
        if let Some(instructions) = &self.special_instructions {
            writeln!(f, "Special Instructions: {instructions}")?;
        }
        write!(f, "{rule}")
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Menu, MenuCatalog};

    fn create_test_order() -> Order {
        let menu = Menu::house_menu();
        Order::builder("Alice Smith", "+1-555-0001")
            .add_item(menu.find_item("Pizza", 1).unwrap(), 2)
            .add_item(menu.find_item("Beverages", 1).unwrap(), 1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_order_is_pending() {
        let order = create_test_order();
        assert_eq!(order.status(), OrderState::Pending);
        assert!(order.can_cancel());
        assert!(order.can_modify());
        assert!(order.payment().is_none());
    }

    #[test]
    fn test_total_value() {
        let order = create_test_order();
        assert_eq!(order.total_value(), Decimal::new(2897, 2));
    }

    #[test]
    fn test_total_value_is_order_independent() {
        let menu = Menu::house_menu();
        let pizza = menu.find_item("Pizza", 1).unwrap();
        let cola = menu.find_item("Beverages", 1).unwrap();
        let burger = menu.find_item("Burgers", 2).unwrap();

        let forward = Order::builder("Bob", "1")
            .add_item(pizza.clone(), 2)
            .add_item(cola.clone(), 3)
            .add_item(burger.clone(), 1)
            .build()
            .unwrap();
        let reversed = Order::builder("Bob", "1")
            .add_item(burger, 1)
            .add_item(cola, 3)
            .add_item(pizza, 2)
            .build()
            .unwrap();

        assert_eq!(forward.total_value(), reversed.total_value());
    }

    #[test]
    fn test_cancel_pending_then_cancel_again() {
        let mut order = create_test_order();

        assert!(order.cancel());
        assert_eq!(order.status(), OrderState::Cancelled);

        assert!(!order.cancel());
        assert_eq!(order.status(), OrderState::Cancelled);
    }

    #[test]
    fn test_cannot_cancel_while_preparing() {
        let mut order = create_test_order();
        order.advance();
        order.advance();
        assert_eq!(order.status(), OrderState::Preparing);

        assert!(!order.cancel());
        assert_eq!(order.status(), OrderState::Preparing);
    }

    #[test]
    fn test_advance_past_delivered_is_noop() {
        let mut order = create_test_order();
        for _ in 0..5 {
            order.advance();
        }
        assert_eq!(order.status(), OrderState::Delivered);
        order.take_events();

        let transition = order.advance();
        assert!(transition.is_noop());
        assert_eq!(order.status(), OrderState::Delivered);
        assert!(order.take_events().is_empty());
    }

    #[test]
    fn test_each_transition_records_status_changed() {
        let mut order = create_test_order();
        order.advance();
        order.advance();

        let events = order.take_events();
        assert_eq!(
            events,
            vec![
                OrderEvent::StatusChanged(OrderStatusChanged {
                    from: OrderState::Pending,
                    to: OrderState::Confirmed,
                }),
                OrderEvent::StatusChanged(OrderStatusChanged {
                    from: OrderState::Confirmed,
                    to: OrderState::Preparing,
                }),
            ]
        );
        assert!(order.take_events().is_empty());
    }

    #[test]
    fn test_cancel_records_status_and_cancel_events() {
        let mut order = create_test_order();
        order.advance();
        order.take_events();

        assert!(order.cancel());
        let events = order.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            OrderEvent::Cancelled(OrderCancelled {
                from: OrderState::Confirmed
            })
        ));
    }

    #[test]
    fn test_restore_state_bypasses_table() {
        let mut order = create_test_order();
        for _ in 0..3 {
            order.advance();
        }
        assert_eq!(order.status(), OrderState::Ready);

        order.restore_state(OrderState::Confirmed);
        assert_eq!(order.status(), OrderState::Confirmed);
    }

    #[test]
    fn test_restore_same_state_records_nothing() {
        let mut order = create_test_order();
        order.restore_state(OrderState::Pending);
        assert!(order.take_events().is_empty());
    }

    #[test]
    fn test_set_payment_outcome() {
        let mut order = create_test_order();
        let outcome = PaymentOutcome::approved("txn-1", "CreditCard", order.total_value());

        order.set_payment_outcome(outcome.clone());

        assert_eq!(order.payment(), Some(&outcome));
        assert_eq!(order.take_events(), vec![OrderEvent::PaymentProcessed(outcome)]);
    }

    #[test]
    fn test_deserialize_round_trip_keeps_identity_and_state() {
        let mut order = create_test_order();
        order.advance();

        let json = serde_json::to_value(&order).unwrap();
        let restored: Order = serde_json::from_value(json).unwrap();

        assert_eq!(restored.id(), order.id());
        assert_eq!(restored.status(), OrderState::Confirmed);
        assert_eq!(restored.total_value(), Decimal::new(2897, 2));
    }

    #[test]
    fn test_deserialize_rejects_invalid_contents() {
        let order = create_test_order();

        let mut no_items = serde_json::to_value(&order).unwrap();
        no_items["items"] = serde_json::json!([]);
        let err = serde_json::from_value::<Order>(no_items).unwrap_err();
        assert!(err.to_string().contains("at least one item"));

        let mut blank_name = serde_json::to_value(&order).unwrap();
        blank_name["customer"]["name"] = serde_json::json!("   ");
        let err = serde_json::from_value::<Order>(blank_name).unwrap_err();
        assert!(err.to_string().contains("Customer name is required"));
    }

    #[test]
    fn test_summary_lists_items_and_total() {
        let order = create_test_order();
        let summary = order.to_string();

        assert!(summary.contains("Customer: Alice Smith"));
        assert!(summary.contains("Margherita x2: $25.98"));
        assert!(summary.contains("Total: $28.97"));
        assert!(summary.contains("Status: PENDING (Can cancel: true, Can modify: true)"));
    }
}
