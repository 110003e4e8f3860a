use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Order State Machine
// ============================================================================
//
// Seven states, one fixed transition table:
//
//   Pending -> Confirmed -> Preparing -> Ready -> InTransit -> Delivered
//      \           \
//       +-----------+--> Cancelled
//
// Delivered and Cancelled are terminal. Advancing a terminal order is a
// reported no-op, never an error.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    InTransit,
    Delivered,
    Cancelled,
}

/// Outcome of asking the state machine to advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderState,
    pub to: OrderState,
    pub narration: &'static str,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

impl OrderState {
    pub const ALL: [OrderState; 7] = [
        OrderState::Pending,
        OrderState::Confirmed,
        OrderState::Preparing,
        OrderState::Ready,
        OrderState::InTransit,
        OrderState::Delivered,
        OrderState::Cancelled,
    ];

    pub fn can_cancel(self) -> bool {
        matches!(self, OrderState::Pending | OrderState::Confirmed)
    }

    pub fn can_modify(self) -> bool {
        matches!(self, OrderState::Pending)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderState::Delivered | OrderState::Cancelled)
    }

    /// Next step in the lifecycle
    pub fn advance(self) -> Transition {
        let (to, narration) = match self {
            OrderState::Pending => (OrderState::Confirmed, "Order confirmed, moving to preparation"),
            OrderState::Confirmed => (OrderState::Preparing, "Kitchen started preparing the order"),
            OrderState::Preparing => (OrderState::Ready, "Order is ready for pickup/delivery"),
            OrderState::Ready => (OrderState::InTransit, "Order is out for delivery"),
            OrderState::InTransit => (OrderState::Delivered, "Order delivered successfully"),
            OrderState::Delivered => (
                OrderState::Delivered,
                "Order already delivered, no further action needed",
            ),
            OrderState::Cancelled => (
                OrderState::Cancelled,
                "Order was cancelled, no further processing possible",
            ),
        };

        Transition {
            from: self,
            to,
            narration,
        }
    }

    /// `Some(Cancelled)` when business rules allow it, `None` otherwise
    pub fn cancel(self) -> Option<OrderState> {
        self.can_cancel().then_some(OrderState::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderState::Pending => "PENDING",
            OrderState::Confirmed => "CONFIRMED",
            OrderState::Preparing => "PREPARING",
            OrderState::Ready => "READY",
            OrderState::InTransit => "IN_TRANSIT",
            OrderState::Delivered => "DELIVERED",
            OrderState::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transition_table() {
        let expected = [
            (OrderState::Pending, OrderState::Confirmed),
            (OrderState::Confirmed, OrderState::Preparing),
            (OrderState::Preparing, OrderState::Ready),
            (OrderState::Ready, OrderState::InTransit),
            (OrderState::InTransit, OrderState::Delivered),
            (OrderState::Delivered, OrderState::Delivered),
            (OrderState::Cancelled, OrderState::Cancelled),
        ];

        for (from, to) in expected {
            let transition = from.advance();
            assert_eq!(transition.from, from);
            assert_eq!(transition.to, to, "advance from {from}");
        }
    }

    #[test]
    fn test_capability_flags() {
        for state in OrderState::ALL {
            let cancel = matches!(state, OrderState::Pending | OrderState::Confirmed);
            let modify = state == OrderState::Pending;
            assert_eq!(state.can_cancel(), cancel, "can_cancel for {state}");
            assert_eq!(state.can_modify(), modify, "can_modify for {state}");
        }
    }

    #[test]
    fn test_terminal_states_are_noops() {
        for state in [OrderState::Delivered, OrderState::Cancelled] {
            assert!(state.is_terminal());
            assert!(state.advance().is_noop());
            assert_eq!(state.cancel(), None);
        }
    }

    #[test]
    fn test_cancel_only_before_preparation() {
        assert_eq!(OrderState::Pending.cancel(), Some(OrderState::Cancelled));
        assert_eq!(OrderState::Confirmed.cancel(), Some(OrderState::Cancelled));
        assert_eq!(OrderState::Preparing.cancel(), None);
        assert_eq!(OrderState::Ready.cancel(), None);
        assert_eq!(OrderState::InTransit.cancel(), None);
    }

    #[test]
    fn test_repeated_advance_reaches_delivered_and_stays() {
        let mut state = OrderState::Pending;
        for _ in 0..10 {
            state = state.advance().to;
        }
        assert_eq!(state, OrderState::Delivered);
    }

    #[test]
    fn test_state_serialization_uses_status_names() {
        let json = serde_json::to_string(&OrderState::InTransit).unwrap();
        assert_eq!(json, "\"IN_TRANSIT\"");

        for state in OrderState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }
}
