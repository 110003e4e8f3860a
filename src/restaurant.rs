use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use crate::command_history::{CommandInvoker, RedoOutcome, UndoOutcome};
use crate::config::RestaurantConfig;
use crate::domain::catalog::Menu;
use crate::domain::order::{
    CommandError, Order, OrderBuilder, OrderCommand, OrderContext, OrderId, OrderRegistry,
};
use crate::metrics::MetricsSink;
use crate::services::{LoggingSink, NotificationSink, Notifier, PaymentGateway, SimulatedGateway};

// ============================================================================
// Restaurant - One registry + invoker pair per tenant
// ============================================================================
//
// Every order mutation goes through the invoker so it can be undone.
// Nothing here is process-global: create one Restaurant per tenant and pass
// it (or a SharedRestaurant) explicitly.
//
// ============================================================================

pub struct Restaurant {
    name: String,
    menu: Menu,
    context: OrderContext,
    invoker: CommandInvoker<OrderCommand>,
    metrics: Option<Arc<MetricsSink>>,
}

impl Restaurant {
    /// House menu, simulated gateway, logging sink and (optionally) metrics
    pub fn new(config: RestaurantConfig) -> Result<Self> {
        let gateway = Arc::new(SimulatedGateway::new(config.gateway.clone()));
        Self::with_gateway(config, gateway)
    }

    pub fn with_gateway(config: RestaurantConfig, gateway: Arc<dyn PaymentGateway>) -> Result<Self> {
        let mut notifier = Notifier::new();
        notifier.subscribe(Arc::new(LoggingSink));

        let metrics = if config.enable_metrics {
            let sink = Arc::new(MetricsSink::new()?);
            notifier.subscribe(sink.clone());
            Some(sink)
        } else {
            None
        };

        tracing::info!(restaurant = %config.name, sinks = notifier.sink_count(), "Restaurant opened");

        Ok(Self {
            name: config.name,
            menu: Menu::house_menu(),
            context: OrderContext::new(gateway, notifier),
            invoker: CommandInvoker::new(),
            metrics,
        })
    }

    pub fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) {
        self.context.notifier_mut().subscribe(sink);
    }

    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menu = menu;
        self
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn create_order_builder(
        &self,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
    ) -> OrderBuilder {
        Order::builder(customer_name, customer_phone)
    }

    /// Charges the order and registers it on approval.
    ///
    /// The order is consumed either way. To retry after `PaymentDeclined`
    /// with the same id, place a clone kept from before the first attempt;
    /// a declined order is never registered, so the clone is accepted.
    /// Placing a clone of an order that is already registered fails with
    /// `AlreadyPlaced`.
    pub fn place_order(&mut self, order: Order) -> Result<OrderId, CommandError> {
        let id = order.id();
        self.execute(OrderCommand::place(order))?;
        Ok(id)
    }

    pub fn advance_order(&mut self, id: OrderId) -> Result<(), CommandError> {
        self.execute(OrderCommand::advance(id))
    }

    pub fn cancel_order(&mut self, id: OrderId) -> Result<(), CommandError> {
        self.execute(OrderCommand::cancel(id))
    }

    pub fn execute(&mut self, command: OrderCommand) -> Result<(), CommandError> {
        self.invoker.execute(command, &mut self.context)
    }

    pub fn undo(&mut self) -> UndoOutcome {
        self.invoker.undo(&mut self.context)
    }

    pub fn redo(&mut self) -> Result<RedoOutcome, CommandError> {
        self.invoker.redo(&mut self.context)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.context.registry.get(id)
    }

    pub fn registry(&self) -> &OrderRegistry {
        &self.context.registry
    }

    pub fn history(&self) -> &CommandInvoker<OrderCommand> {
        &self.invoker
    }

    pub fn metrics(&self) -> Option<&MetricsSink> {
        self.metrics.as_deref()
    }
}

/// Mutex-guarded handle for concurrent hosts. Every operation, including
/// history truncation and order lookup, runs under the one lock.
#[derive(Clone)]
pub struct SharedRestaurant {
    inner: Arc<Mutex<Restaurant>>,
}

impl SharedRestaurant {
    pub fn new(restaurant: Restaurant) -> Self {
        Self {
            inner: Arc::new(Mutex::new(restaurant)),
        }
    }

    pub fn place_order(&self, order: Order) -> Result<OrderId, CommandError> {
        self.inner.lock().place_order(order)
    }

    pub fn advance_order(&self, id: OrderId) -> Result<(), CommandError> {
        self.inner.lock().advance_order(id)
    }

    pub fn cancel_order(&self, id: OrderId) -> Result<(), CommandError> {
        self.inner.lock().cancel_order(id)
    }

    pub fn undo(&self) -> UndoOutcome {
        self.inner.lock().undo()
    }

    pub fn redo(&self) -> Result<RedoOutcome, CommandError> {
        self.inner.lock().redo()
    }

    /// Run several steps atomically
    pub fn with<R>(&self, f: impl FnOnce(&mut Restaurant) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use rust_decimal::Decimal;

    use super::*;
    use crate::config::GatewayConfig;
    use crate::domain::catalog::MenuCatalog;
    use crate::domain::order::{OrderState, PaymentOutcome};
    use crate::services::notifications::tests::{FailingSink, RecordingSink};

    /// Approves everything and counts charges
    #[derive(Default)]
    struct CountingGateway {
        charges: AtomicU32,
    }

    impl PaymentGateway for CountingGateway {
        fn charge(&self, amount: Decimal, _order_id: OrderId) -> PaymentOutcome {
            let n = self.charges.fetch_add(1, Ordering::SeqCst) + 1;
            PaymentOutcome::approved(format!("TXN-{n}"), "CreditCard", amount)
        }
    }

    /// Declines the first charge, approves the rest
    #[derive(Default)]
    struct FlakyGateway {
        attempts: AtomicU32,
    }

    impl PaymentGateway for FlakyGateway {
        fn charge(&self, amount: Decimal, _order_id: OrderId) -> PaymentOutcome {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                PaymentOutcome::declined("CreditCard", amount, "Card issuer timeout")
            } else {
                PaymentOutcome::approved("TXN-retry", "CreditCard", amount)
            }
        }
    }

    fn quiet_config() -> RestaurantConfig {
        RestaurantConfig {
            enable_metrics: false,
            ..RestaurantConfig::default()
        }
    }

    fn create_test_order(restaurant: &Restaurant) -> Order {
        let menu = restaurant.menu();
        restaurant
            .create_order_builder("Alice Smith", "+1-555-0001")
            .add_customized_item(menu.find_item("Pizza", 1).unwrap(), 2, ["Extra cheese"])
            .add_item(menu.find_item("Beverages", 1).unwrap(), 1)
            .build()
            .unwrap()
    }

    fn status(restaurant: &Restaurant, id: OrderId) -> OrderState {
        restaurant.order(&id).unwrap().status()
    }

    #[test]
    fn test_total_value_scenario() {
        let restaurant = Restaurant::new(quiet_config()).unwrap();
        let order = create_test_order(&restaurant);
        assert_eq!(order.total_value(), Decimal::new(2897, 2));
    }

    #[test]
    fn test_place_advance_advance_then_cancel_is_refused() {
        let mut restaurant = Restaurant::new(quiet_config()).unwrap();
        let id = restaurant.place_order(create_test_order(&restaurant)).unwrap();

        restaurant.advance_order(id).unwrap();
        restaurant.advance_order(id).unwrap();
        assert_eq!(status(&restaurant, id), OrderState::Preparing);

        let result = restaurant.cancel_order(id);
        assert_eq!(result, Err(CommandError::CannotCancel(OrderState::Preparing)));
        assert_eq!(status(&restaurant, id), OrderState::Preparing);
        assert_eq!(restaurant.history().len(), 3);
    }

    #[test]
    fn test_failed_payment_is_not_registered_or_recorded() {
        let config = RestaurantConfig {
            gateway: GatewayConfig::declining(),
            ..quiet_config()
        };
        let mut restaurant = Restaurant::new(config).unwrap();
        let order = create_test_order(&restaurant);
        let id = order.id();

        let result = restaurant.place_order(order);

        assert!(matches!(result, Err(CommandError::PaymentDeclined { .. })));
        assert!(restaurant.order(&id).is_none());
        assert!(restaurant.history().is_empty());
        assert_eq!(restaurant.undo(), UndoOutcome::NothingToUndo);
    }

    #[test]
    fn test_retry_declined_order_with_kept_clone() {
        let gateway = Arc::new(FlakyGateway::default());
        let mut restaurant = Restaurant::with_gateway(quiet_config(), gateway).unwrap();
        let order = create_test_order(&restaurant);
        let id = order.id();

        let first = restaurant.place_order(order.clone());
        assert!(matches!(first, Err(CommandError::PaymentDeclined { .. })));

        assert_eq!(restaurant.place_order(order), Ok(id));
        assert_eq!(status(&restaurant, id), OrderState::Pending);
        assert_eq!(restaurant.history().len(), 1);
    }

    #[test]
    fn test_placing_clone_of_live_order_is_refused() {
        let gateway = Arc::new(CountingGateway::default());
        let mut restaurant = Restaurant::with_gateway(quiet_config(), gateway.clone()).unwrap();
        let order = create_test_order(&restaurant);
        let id = restaurant.place_order(order.clone()).unwrap();
        restaurant.advance_order(id).unwrap();
        restaurant.advance_order(id).unwrap();

        let result = restaurant.place_order(order);

        assert_eq!(result, Err(CommandError::AlreadyPlaced(id)));
        assert_eq!(gateway.charges.load(Ordering::SeqCst), 1);
        assert_eq!(status(&restaurant, id), OrderState::Preparing);
        assert_eq!(restaurant.history().len(), 3);

        restaurant.undo();
        assert_eq!(status(&restaurant, id), OrderState::Confirmed);
        restaurant.undo();
        assert_eq!(status(&restaurant, id), OrderState::Pending);
    }

    #[test]
    fn test_three_advances_undone_and_redone() {
        let mut restaurant = Restaurant::new(quiet_config()).unwrap();
        let id = restaurant.place_order(create_test_order(&restaurant)).unwrap();
        let recording = Arc::new(RecordingSink::default());
        restaurant.subscribe(recording.clone());

        let mut forward = Vec::new();
        for _ in 0..3 {
            restaurant.advance_order(id).unwrap();
            forward.push(status(&restaurant, id));
        }
        assert_eq!(
            forward,
            vec![OrderState::Confirmed, OrderState::Preparing, OrderState::Ready]
        );

        let mut backward = Vec::new();
        for _ in 0..3 {
            assert!(matches!(restaurant.undo(), UndoOutcome::Undone(_)));
            backward.push(status(&restaurant, id));
        }
        assert_eq!(
            backward,
            vec![OrderState::Preparing, OrderState::Confirmed, OrderState::Pending]
        );

        let mut replayed = Vec::new();
        for _ in 0..3 {
            assert!(matches!(restaurant.redo(), Ok(RedoOutcome::Redone(_))));
            replayed.push(status(&restaurant, id));
        }
        assert_eq!(replayed, forward);
        assert_eq!(restaurant.redo(), Ok(RedoOutcome::NothingToRedo));

        let facts = recording.received();
        assert_eq!(
            facts,
            vec![
                "PENDING->CONFIRMED",
                "CONFIRMED->PREPARING",
                "PREPARING->READY",
                "READY->PREPARING",
                "PREPARING->CONFIRMED",
                "CONFIRMED->PENDING",
                "PENDING->CONFIRMED",
                "CONFIRMED->PREPARING",
                "PREPARING->READY",
            ]
        );
        assert_eq!(facts[6..], facts[..3]);
    }

    #[test]
    fn test_new_command_after_undo_discards_redo_tail() {
        let mut restaurant = Restaurant::new(quiet_config()).unwrap();
        let id = restaurant.place_order(create_test_order(&restaurant)).unwrap();
        restaurant.advance_order(id).unwrap();
        restaurant.advance_order(id).unwrap();

        restaurant.undo();
        restaurant.undo();
        restaurant.cancel_order(id).unwrap();

        let history = restaurant.history();
        assert_eq!(history.len(), history.position().unwrap() + 1);
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(status(&restaurant, id), OrderState::Cancelled);
    }

    #[test]
    fn test_undo_place_removes_order_and_redo_recharges() {
        let gateway = Arc::new(CountingGateway::default());
        let mut restaurant = Restaurant::with_gateway(quiet_config(), gateway.clone()).unwrap();
        let id = restaurant.place_order(create_test_order(&restaurant)).unwrap();

        restaurant.undo();
        assert!(restaurant.order(&id).is_none());

        restaurant.redo().unwrap();
        assert!(restaurant.order(&id).is_some());
        assert_eq!(gateway.charges.load(Ordering::SeqCst), 2);
        assert_eq!(
            restaurant.order(&id).unwrap().payment().unwrap().transaction_id,
            "TXN-2"
        );
    }

    #[test]
    fn test_commands_against_unknown_order_leave_history_alone() {
        let mut restaurant = Restaurant::new(quiet_config()).unwrap();
        let missing = OrderId::new();

        assert_eq!(
            restaurant.advance_order(missing),
            Err(CommandError::OrderNotFound(missing))
        );
        assert_eq!(
            restaurant.cancel_order(missing),
            Err(CommandError::OrderNotFound(missing))
        );
        assert!(restaurant.history().is_empty());
    }

    #[test]
    fn test_failing_sink_does_not_abort_commands() {
        let mut restaurant = Restaurant::new(quiet_config()).unwrap();
        let recording = Arc::new(RecordingSink::default());
        restaurant.subscribe(Arc::new(FailingSink));
        restaurant.subscribe(recording.clone());

        let id = restaurant.place_order(create_test_order(&restaurant)).unwrap();
        restaurant.advance_order(id).unwrap();
        restaurant.cancel_order(id).unwrap();

        assert_eq!(status(&restaurant, id), OrderState::Cancelled);
        assert_eq!(
            recording.received(),
            vec![
                "payment:true",
                "placed",
                "PENDING->CONFIRMED",
                "CONFIRMED->CANCELLED",
                "cancelled",
            ]
        );
    }

    #[test]
    fn test_metrics_follow_commands() {
        let mut restaurant = Restaurant::new(RestaurantConfig::default()).unwrap();
        let id = restaurant.place_order(create_test_order(&restaurant)).unwrap();
        restaurant.advance_order(id).unwrap();
        restaurant.cancel_order(id).unwrap();

        let metrics = restaurant.metrics().unwrap();
        assert_eq!(metrics.orders_placed.get(), 1);
        assert_eq!(metrics.orders_cancelled.get(), 1);
        assert_eq!(
            metrics
                .status_transitions
                .with_label_values(&["PENDING", "CONFIRMED"])
                .get(),
            1
        );
    }

    #[test]
    fn test_shared_restaurant_serializes_commands() {
        let restaurant = Restaurant::new(quiet_config()).unwrap();
        let order = create_test_order(&restaurant);
        let shared = SharedRestaurant::new(restaurant);
        let id = shared.place_order(order).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || shared.advance_order(id))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        shared.with(|r| {
            assert_eq!(r.order(&id).unwrap().status(), OrderState::InTransit);
            assert_eq!(r.history().len(), 5);
        });

        assert!(matches!(shared.undo(), UndoOutcome::Undone(_)));
        assert!(shared.cancel_order(id).is_err());
        assert!(matches!(shared.redo(), Ok(RedoOutcome::NothingToRedo)));
    }
}
