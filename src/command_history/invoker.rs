use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::command::Command;

// ============================================================================
// Command Invoker - Linear Undo/Redo History
// ============================================================================
//
// history: [c0, c1, c2, c3]
//                   ^ position (last applied)
//
// - execute: drop everything after position, run, append on success
// - undo:    reverse history[position], step back
// - redo:    step forward, run execute again
//
// `applied` counts applied commands, i.e. position + 1.
// The audit trail is a ring: oldest entries are evicted past its capacity.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Undone(String),
    NothingToUndo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedoOutcome {
    Redone(String),
    NothingToRedo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HistoryAction {
    Execute,
    Undo,
    Redo,
}

/// One line of the audit trail
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub action: HistoryAction,
    pub description: String,
    pub succeeded: bool,
    pub timestamp: DateTime<Utc>,
}

pub const DEFAULT_AUDIT_CAPACITY: usize = 1024;

pub struct CommandInvoker<C: Command> {
    history: Vec<C>,
    applied: usize,
    audit: VecDeque<AuditEntry>,
    audit_capacity: usize,
}

impl<C: Command> Default for CommandInvoker<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Command> CommandInvoker<C> {
    pub fn new() -> Self {
        Self::with_audit_capacity(DEFAULT_AUDIT_CAPACITY)
    }

    /// Keep at most `capacity` audit entries
    pub fn with_audit_capacity(capacity: usize) -> Self {
        Self {
            history: Vec::new(),
            applied: 0,
            audit: VecDeque::with_capacity(capacity.min(DEFAULT_AUDIT_CAPACITY)),
            audit_capacity: capacity,
        }
    }

    /// Run a new command. Any undone tail is discarded first, even when the
    /// command then fails.
    pub fn execute(&mut self, mut command: C, ctx: &mut C::Context) -> Result<(), C::Error> {
        if self.history.len() > self.applied {
            tracing::debug!(
                discarded = self.history.len() - self.applied,
                "Discarding redo history"
            );
            self.history.truncate(self.applied);
        }

        let description = command.describe();
        let result = command.execute(ctx);
        self.record(HistoryAction::Execute, &description, result.is_ok());

        match result {
            Ok(()) => {
                tracing::info!(command = %description, position = self.applied, "Command executed");
                self.history.push(command);
                self.applied += 1;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(command = %description, "Command failed, history unchanged");
                Err(err)
            }
        }
    }

    pub fn undo(&mut self, ctx: &mut C::Context) -> UndoOutcome {
        if self.applied == 0 {
            tracing::debug!("Nothing to undo");
            return UndoOutcome::NothingToUndo;
        }

        self.applied -= 1;
        let command = &mut self.history[self.applied];
        command.undo(ctx);
        let description = command.describe();

        tracing::info!(command = %description, "Command undone");
        self.record(HistoryAction::Undo, &description, true);
        UndoOutcome::Undone(description)
    }

    /// Re-executes the next undone command. Side effects of `execute` (such as
    /// charging a payment) happen again. If it fails the cursor stays put.
    pub fn redo(&mut self, ctx: &mut C::Context) -> Result<RedoOutcome, C::Error> {
        if self.applied == self.history.len() {
            tracing::debug!("Nothing to redo");
            return Ok(RedoOutcome::NothingToRedo);
        }

        let command = &mut self.history[self.applied];
        let description = command.describe();
        let result = command.execute(ctx);
        self.record(HistoryAction::Redo, &description, result.is_ok());

        match result {
            Ok(()) => {
                self.applied += 1;
                tracing::info!(command = %description, "Command redone");
                Ok(RedoOutcome::Redone(description))
            }
            Err(err) => {
                tracing::warn!(command = %description, "Redo failed, command left undone");
                Err(err)
            }
        }
    }

    fn record(&mut self, action: HistoryAction, description: &str, succeeded: bool) {
        if self.audit_capacity == 0 {
            return;
        }
        if self.audit.len() == self.audit_capacity {
            self.audit.pop_front();
        }
        self.audit.push_back(AuditEntry {
            action,
            description: description.to_string(),
            succeeded,
            timestamp: Utc::now(),
        });
    }

    /// Index of the last applied command, `None` when nothing is applied
    pub fn position(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.history.len()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Descriptions of every command in history, applied or not
    pub fn descriptions(&self) -> Vec<String> {
        self.history.iter().map(|c| c.describe()).collect()
    }

    /// Oldest first
    pub fn audit_log(&self) -> &VecDeque<AuditEntry> {
        &self.audit
    }

    pub fn clear_audit(&mut self) {
        self.audit.clear();
    }

    /// Forget all history; the audit trail is kept (see `clear_audit`)
    pub fn clear(&mut self) {
        self.history.clear();
        self.applied = 0;
    }
}

// ============================================================================
// Tests
// ============================================================================
