use std::sync::Arc;

use anyhow::Result;

use crate::domain::order::{Order, OrderEvent, OrderState, PaymentOutcome};

// ============================================================================
// Notification Fan-out
// ============================================================================
//
// Sinks receive facts about orders and return nothing the core depends on.
// Each dispatch is isolated: a failing sink is logged and skipped, the other
// sinks still run, and the command that produced the fact still succeeds.
//
// ============================================================================

pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    fn on_order_placed(&self, order: &Order) -> Result<()>;

    fn on_status_changed(&self, order: &Order, from: OrderState, to: OrderState) -> Result<()>;

    fn on_order_cancelled(&self, order: &Order) -> Result<()>;

    fn on_payment_processed(&self, order: &Order, outcome: &PaymentOutcome) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct Notifier {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) {
        tracing::debug!(sink = sink.name(), "Notification sink subscribed");
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver each event to every sink
    pub fn publish(&self, order: &Order, events: &[OrderEvent]) {
        for event in events {
            for sink in &self.sinks {
                let result = match event {
                    OrderEvent::Placed => sink.on_order_placed(order),
                    OrderEvent::StatusChanged(e) => sink.on_status_changed(order, e.from, e.to),
                    OrderEvent::Cancelled(_) => sink.on_order_cancelled(order),
                    OrderEvent::PaymentProcessed(outcome) => sink.on_payment_processed(order, outcome),
                };

                if let Err(e) = result {
                    tracing::warn!(
                        sink = sink.name(),
                        order_id = %order.id(),
                        event_type = event.event_type(),
                        error = %e,
                        "Notification sink failed"
                    );
                }
            }
        }
    }
}

/// Customer-facing narration written to the log instead of email/SMS
#[derive(Debug, Default)]
pub struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn name(&self) -> &str {
        "logging"
    }

    fn on_order_placed(&self, order: &Order) -> Result<()> {
        tracing::info!(
            order_id = %order.id(),
            customer = %order.customer().name,
            total = %order.total_value(),
            "Order placed"
        );
        Ok(())
    }

    fn on_status_changed(&self, order: &Order, from: OrderState, to: OrderState) -> Result<()> {
        tracing::info!(order_id = %order.id(), %from, %to, "Order status changed to {to}");
        Ok(())
    }

    fn on_order_cancelled(&self, order: &Order) -> Result<()> {
        tracing::info!(order_id = %order.id(), customer = %order.customer().name, "Order cancelled");
        Ok(())
    }

    fn on_payment_processed(&self, order: &Order, outcome: &PaymentOutcome) -> Result<()> {
        if outcome.success {
            tracing::info!(
                order_id = %order.id(),
                transaction_id = %outcome.transaction_id,
                method = %outcome.method,
                amount = %outcome.amount,
                "Payment processed"
            );
        } else {
            tracing::warn!(
                order_id = %order.id(),
                method = %outcome.method,
                reason = %outcome.message,
                "Payment failed"
            );
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
