use super::aggregate::Order;
use super::state::OrderState;
use super::value_objects::OrderId;

// ============================================================================
// Order Commands - Represent user intent, reversibly
// ============================================================================
//
// Each variant carries what it needs to undo itself:
// - PlaceOrder holds the order whenever it is not registered
// - AdvanceOrder / CancelOrder hold the state captured at execute time
//
// ============================================================================

#[derive(Debug, Clone)]
pub enum OrderCommand {
    PlaceOrder {
        order_id: OrderId,
        order: Option<Order>,
    },
    AdvanceOrder {
        order_id: OrderId,
        snapshot: Option<OrderState>,
    },
    CancelOrder {
        order_id: OrderId,
        snapshot: Option<OrderState>,
    },
}

impl OrderCommand {
    pub fn place(order: Order) -> Self {
        OrderCommand::PlaceOrder {
            order_id: order.id(),
            order: Some(order),
        }
    }

    pub fn advance(order_id: OrderId) -> Self {
        OrderCommand::AdvanceOrder {
            order_id,
            snapshot: None,
        }
    }

    pub fn cancel(order_id: OrderId) -> Self {
        OrderCommand::CancelOrder {
            order_id,
            snapshot: None,
        }
    }

    pub fn order_id(&self) -> OrderId {
        match self {
            OrderCommand::PlaceOrder { order_id, .. }
            | OrderCommand::AdvanceOrder { order_id, .. }
            | OrderCommand::CancelOrder { order_id, .. } => *order_id,
        }
    }

    /// State captured by the last execute, if this command captures one
    pub fn snapshot(&self) -> Option<OrderState> {
        match self {
            OrderCommand::PlaceOrder { .. } => None,
            OrderCommand::AdvanceOrder { snapshot, .. }
            | OrderCommand::CancelOrder { snapshot, .. } => *snapshot,
        }
    }

    pub fn description(&self) -> String {
        match self {
            OrderCommand::PlaceOrder { order_id, .. } => format!("Place order {order_id}"),
            OrderCommand::AdvanceOrder { order_id, .. } => format!("Advance order {order_id}"),
            OrderCommand::CancelOrder { order_id, .. } => format!("Cancel order {order_id}"),
        }
    }
}
