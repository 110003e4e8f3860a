// ============================================================================
// Command History Infrastructure
// ============================================================================
//
// Generic, reusable undo/redo machinery.
// Domain-specific commands are in src/domain/
//
// ============================================================================

mod command;
mod invoker;

pub use command::Command;
pub use invoker::{
    AuditEntry, CommandInvoker, HistoryAction, RedoOutcome, UndoOutcome, DEFAULT_AUDIT_CAPACITY,
};
