use serde::{Deserialize, Serialize};

use super::state::OrderState;
use super::value_objects::PaymentOutcome;

// ============================================================================
// Order Events - Facts recorded by the order aggregate
// ============================================================================

/// Order Event - Union type for all order events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    Placed,
    StatusChanged(OrderStatusChanged),
    Cancelled(OrderCancelled),
    PaymentProcessed(PaymentOutcome),
}

impl OrderEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Placed => "OrderPlaced",
            OrderEvent::StatusChanged(_) => "OrderStatusChanged",
            OrderEvent::Cancelled(_) => "OrderCancelled",
            OrderEvent::PaymentProcessed(_) => "PaymentProcessed",
        }
    }
}

// ============================================================================
// Individual Event Types
// ============================================================================

/// Order Status Changed - any move between states, including undo restores
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct OrderStatusChanged {
    pub from: OrderState,
    pub to: OrderState,
}

/// Order Cancelled - lifecycle ended before preparation
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct OrderCancelled {
    pub from: OrderState,
}
