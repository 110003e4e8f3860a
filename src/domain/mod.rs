// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// - order:   the order lifecycle, its commands and registry
// - catalog: menu and customer lookups used while building orders
//
// This layer is separate from the generic undo/redo infrastructure.
//
// ============================================================================

pub mod catalog;
pub mod order;
