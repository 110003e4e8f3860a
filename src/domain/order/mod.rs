// ============================================================================
// Order Domain - Business Logic for the Order Lifecycle
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderId, OrderItem, CustomerInfo, PaymentOutcome)
// - State machine (OrderState and its transition table)
// - Events (StatusChanged, Cancelled, PaymentProcessed, ...)
// - Errors (ValidationError, CommandError)
// - Aggregate + builder (Order, OrderBuilder)
// - Registry (live orders by id)
// - Commands + handler (reversible place/advance/cancel)
//
// The undo/redo machinery itself is generic and lives in command_history.
//
// ============================================================================

pub mod value_objects;
pub mod state;
pub mod events;
pub mod errors;
pub mod aggregate;
pub mod builder;
pub mod registry;
pub mod commands;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use state::*;
pub use events::*;
pub use errors::*;
pub use aggregate::*;
pub use builder::*;
pub use registry::*;
pub use commands::*;
pub use command_handler::*;
