// ============================================================================
// Reversible Command - Undo/Redo Core
// ============================================================================
//
// Key Principles:
// 1. A command is one mutation plus whatever it needs to reverse it
// 2. Prior state is captured inside `execute`, before mutating
// 3. Redo is `execute` again, so the contract stays at two operations
// 4. `describe` feeds the audit log only, never control flow
//
// This is the GENERIC trait; order commands live in src/domain/.
//
// ============================================================================

/// Generic reversible command driven by `CommandInvoker`
///
/// Type Parameters:
/// - `Context`: The state the command mutates (registry, collaborators)
/// - `Error`: Why the command refused to run
pub trait Command {
    type Context;
    type Error;

    /// Apply the mutation. On `Err` the invoker does not record the command.
    fn execute(&mut self, ctx: &mut Self::Context) -> Result<(), Self::Error>;

    /// Reverse a previous successful `execute`
    fn undo(&mut self, ctx: &mut Self::Context);

    /// Human-readable label for audit output
    fn describe(&self) -> String;
}
