// ============================================================================
// Restaurant Orders
// ============================================================================
//
// Order lifecycle state machine with an undoable command history:
// - domain:          orders, states, commands, menu
// - command_history: generic execute/undo/redo invoker
// - services:        payment gateway and notification sinks
// - metrics:         prometheus analytics sink
// - restaurant:      per-tenant wiring of all of the above
//
// ============================================================================

pub mod command_history;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod restaurant;
pub mod services;

pub use command_history::{Command, CommandInvoker, RedoOutcome, UndoOutcome};
pub use config::{GatewayConfig, RestaurantConfig};
pub use domain::catalog::{Menu, MenuCatalog, MenuItem};
pub use domain::order::{CommandError, Order, OrderCommand, OrderId, OrderState, ValidationError};
pub use restaurant::{Restaurant, SharedRestaurant};
