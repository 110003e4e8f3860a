use super::state::OrderState;
use super::value_objects::OrderId;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

/// Raised while building an order; fatal to that build
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Order must contain at least one item")]
    EmptyItems,

    #[error("Customer name is required")]
    BlankCustomerName,

    #[error("Invalid quantity {quantity} for item '{item}'")]
    InvalidQuantity { item: String, quantity: u32 },
}

/// Why an order command refused to run. History is never advanced on these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Order already placed: {0}")]
    AlreadyPlaced(OrderId),

    #[error("Cannot cancel order in {0} state")]
    CannotCancel(OrderState),

    #[error("Payment declined for order {order_id}: {message}")]
    PaymentDeclined { order_id: OrderId, message: String },
}
