use std::sync::Arc;

use crate::command_history::Command;
use crate::services::{Notifier, PaymentGateway};

use super::aggregate::Order;
use super::commands::OrderCommand;
use super::errors::CommandError;
use super::registry::OrderRegistry;

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Orchestrates: Command → Registry lookup → Aggregate → Events → Notifier
//
// ============================================================================

/// Everything an order command touches. One per restaurant.
pub struct OrderContext {
    pub registry: OrderRegistry,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Notifier,
}

impl OrderContext {
    pub fn new(gateway: Arc<dyn PaymentGateway>, notifier: Notifier) -> Self {
        Self {
            registry: OrderRegistry::new(),
            gateway,
            notifier,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }
}

/// Drain what the order recorded and hand it to the sinks
fn publish_events(notifier: &Notifier, order: &mut Order) {
    let events = order.take_events();
    if !events.is_empty() {
        notifier.publish(order, &events);
    }
}

impl Command for OrderCommand {
    type Context = OrderContext;
    type Error = CommandError;

    fn execute(&mut self, ctx: &mut OrderContext) -> Result<(), CommandError> {
        match self {
            OrderCommand::PlaceOrder { order_id, order } => {
                let Some(mut pending) = order.take() else {
                    // Executing again while registered changes nothing
                    return if ctx.registry.contains(order_id) {
                        tracing::debug!(order_id = %order_id, "Order already placed");
                        Ok(())
                    } else {
                        Err(CommandError::OrderNotFound(*order_id))
                    };
                };

                // A clone of a live order keeps its id; never charge or overwrite it
                if ctx.registry.contains(order_id) {
                    tracing::warn!(order_id = %order_id, "Order already placed, refusing duplicate");
                    *order = Some(pending);
                    return Err(CommandError::AlreadyPlaced(*order_id));
                }

                let outcome = ctx.gateway.charge(pending.total_value(), *order_id);
                let approved = outcome.success;
                let message = outcome.message.clone();
                pending.set_payment_outcome(outcome);

                if !approved {
                    publish_events(&ctx.notifier, &mut pending);
                    *order = Some(pending);
                    return Err(CommandError::PaymentDeclined {
                        order_id: *order_id,
                        message,
                    });
                }

                pending.record_placed();
                publish_events(&ctx.notifier, &mut pending);
                ctx.registry.insert(pending);
                Ok(())
            }

            OrderCommand::AdvanceOrder { order_id, snapshot } => {
                let target = ctx
                    .registry
                    .get_mut(order_id)
                    .ok_or(CommandError::OrderNotFound(*order_id))?;

                *snapshot = Some(target.status());
                target.advance();
                publish_events(&ctx.notifier, target);
                Ok(())
            }

            OrderCommand::CancelOrder { order_id, snapshot } => {
                let target = ctx
                    .registry
                    .get_mut(order_id)
                    .ok_or(CommandError::OrderNotFound(*order_id))?;

                if !target.can_cancel() {
                    return Err(CommandError::CannotCancel(target.status()));
                }

                *snapshot = Some(target.status());
                target.cancel();
                publish_events(&ctx.notifier, target);
                Ok(())
            }
        }
    }

    fn undo(&mut self, ctx: &mut OrderContext) {
        match self {
            OrderCommand::PlaceOrder { order_id, order } => {
                // Keep the removed order so redo can register it again
                if let Some(removed) = ctx.registry.remove(order_id) {
                    tracing::info!(order_id = %order_id, "Order removed from registry");
                    *order = Some(removed);
                }
            }

            OrderCommand::AdvanceOrder { order_id, snapshot }
            | OrderCommand::CancelOrder { order_id, snapshot } => {
                let Some(previous) = *snapshot else {
                    tracing::debug!(order_id = %order_id, "Nothing captured, undo skipped");
                    return;
                };

                match ctx.registry.get_mut(order_id) {
                    Some(target) => {
                        target.restore_state(previous);
                        publish_events(&ctx.notifier, target);
                    }
                    None => {
                        tracing::warn!(order_id = %order_id, "Order no longer registered, undo skipped");
                    }
                }
            }
        }
    }

    fn describe(&self) -> String {
        self.description()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
