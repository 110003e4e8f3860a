use anyhow::Result;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::domain::order::{Order, OrderState, PaymentOutcome};
use crate::services::NotificationSink;

// ============================================================================
// Metrics Module - Prometheus counters for order analytics
// ============================================================================
//
// Subscribed as a notification sink, so it sees exactly the facts every other
// sink sees:
// - Orders placed
// - Status transitions (by from/to)
// - Cancellations (by the state they were cancelled from)
// - Payment attempts (approved/declined, by method)
//
// Exposition is text only; there is no HTTP endpoint.
// ============================================================================

pub struct MetricsSink {
    registry: Registry,

    pub orders_placed: IntCounter,
    pub status_transitions: IntCounterVec,
    pub orders_cancelled: IntCounter,
    pub payments: IntCounterVec,
}

impl MetricsSink {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let orders_placed = IntCounter::new("orders_placed_total", "Total orders placed")?;
        registry.register(Box::new(orders_placed.clone()))?;

        let status_transitions = IntCounterVec::new(
            Opts::new("order_status_transitions_total", "Order status transitions"),
            &["from_state", "to_state"],
        )?;
        registry.register(Box::new(status_transitions.clone()))?;

        let orders_cancelled = IntCounter::new("orders_cancelled_total", "Total orders cancelled")?;
        registry.register(Box::new(orders_cancelled.clone()))?;

        let payments = IntCounterVec::new(
            Opts::new("payments_total", "Payment attempts by outcome"),
            &["outcome", "method"],
        )?;
        registry.register(Box::new(payments.clone()))?;

        Ok(Self {
            registry,
            orders_placed,
            status_transitions,
            orders_cancelled,
            payments,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus text exposition format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl NotificationSink for MetricsSink {
    fn name(&self) -> &str {
        "metrics"
    }

    fn on_order_placed(&self, _order: &Order) -> Result<()> {
        self.orders_placed.inc();
        Ok(())
    }

    fn on_status_changed(&self, _order: &Order, from: OrderState, to: OrderState) -> Result<()> {
        self.status_transitions
            .with_label_values(&[from.as_str(), to.as_str()])
            .inc();
        Ok(())
    }

    fn on_order_cancelled(&self, _order: &Order) -> Result<()> {
        self.orders_cancelled.inc();
        Ok(())
    }

    fn on_payment_processed(&self, _order: &Order, outcome: &PaymentOutcome) -> Result<()> {
        let label = if outcome.success { "approved" } else { "declined" };
        self.payments
            .with_label_values(&[label, outcome.method.as_str()])
            .inc();
        Ok(())
    }
}
