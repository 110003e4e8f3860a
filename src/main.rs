use anyhow::Result;
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use restaurant_orders::config::{GatewayConfig, RestaurantConfig};
use restaurant_orders::domain::catalog::MenuCatalog;
use restaurant_orders::{CommandError, Restaurant};

fn main() -> Result<()> {
    // Default to INFO, override with RUST_LOG
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,restaurant_orders=debug")),
        )
        .init();

    let mut restaurant = Restaurant::new(RestaurantConfig::default())?;
    tracing::info!(restaurant = restaurant.name(), "Starting order lifecycle demo");

    normal_flow(&mut restaurant)?;
    cancellation_rules(&mut restaurant)?;
    undo_redo(&mut restaurant)?;
    declined_payment()?;

    if let Some(metrics) = restaurant.metrics() {
        tracing::info!("Metrics snapshot:\n{}", metrics.render()?);
    }

    tracing::info!("Demo finished");
    Ok(())
}

/// Place an order and walk it to delivery
fn normal_flow(restaurant: &mut Restaurant) -> Result<()> {
    tracing::info!("=== Normal flow ===");
    let menu = restaurant.menu();
    let order = restaurant
        .create_order_builder("Alice Smith", "+1-555-0001")
        .email("alice@example.com")
        .delivery_address("12 Elm Street")
        .add_customized_item(required(menu.find_item("Pizza", 1))?, 2, ["Extra cheese"])
        .add_item(required(menu.find_item("Beverages", 1))?, 1)
        .build()?;

    tracing::info!("Order summary:\n{order}");
    let id = restaurant.place_order(order)?;

    while restaurant.order(&id).is_some_and(|o| !o.status().is_terminal()) {
        restaurant.advance_order(id)?;
    }
    Ok(())
}

/// Cancel succeeds early, is refused once the kitchen starts
fn cancellation_rules(restaurant: &mut Restaurant) -> Result<()> {
    tracing::info!("=== Cancellation rules ===");
    let menu = restaurant.menu();
    let early = restaurant
        .create_order_builder("Bob Jones", "+1-555-0002")
        .add_item(required(menu.find_item("Burgers", 2))?, 1)
        .build()?;
    let late = restaurant
        .create_order_builder("Carol White", "+1-555-0003")
        .special_instructions("No onions")
        .add_item(required(menu.find_item("Burgers", 1))?, 1)
        .build()?;

    let early_id = restaurant.place_order(early)?;
    restaurant.cancel_order(early_id)?;

    let late_id = restaurant.place_order(late)?;
    restaurant.advance_order(late_id)?;
    restaurant.advance_order(late_id)?;
    match restaurant.cancel_order(late_id) {
        Err(CommandError::CannotCancel(state)) => {
            tracing::info!(order_id = %late_id, %state, "Cancellation refused as expected");
        }
        other => tracing::warn!(order_id = %late_id, ?other, "Unexpected cancellation result"),
    }
    Ok(())
}

/// Step an order back and forth through the history
fn undo_redo(restaurant: &mut Restaurant) -> Result<()> {
    tracing::info!("=== Undo / redo ===");
    let menu = restaurant.menu();
    let order = restaurant
        .create_order_builder("Dave Brown", "+1-555-0004")
        .add_item(required(menu.find_item("Pizza", 3))?, 1)
        .build()?;
    let id = restaurant.place_order(order)?;

    for _ in 0..3 {
        restaurant.advance_order(id)?;
    }
    for _ in 0..3 {
        let outcome = restaurant.undo();
        tracing::info!(?outcome, "Undo");
    }
    for _ in 0..3 {
        let outcome = restaurant.redo()?;
        tracing::info!(?outcome, "Redo");
    }

    let history = restaurant.history();
    tracing::info!(
        commands = history.len(),
        position = ?history.position(),
        "History: {:?}",
        history.descriptions()
    );
    Ok(())
}

/// A gateway limit rejects the charge, nothing is registered
fn declined_payment() -> Result<()> {
    tracing::info!("=== Declined payment ===");
    let config = RestaurantConfig {
        name: "Limited Kitchen".to_string(),
        gateway: GatewayConfig::with_limit(Decimal::new(2000, 2)),
        enable_metrics: false,
    };
    let mut restaurant = Restaurant::new(config)?;
    let menu = restaurant.menu();
    let order = restaurant
        .create_order_builder("Erin Green", "+1-555-0005")
        .add_item(required(menu.find_item("Pizza", 3))?, 2)
        .build()?;
    let id = order.id();

    if let Err(e) = restaurant.place_order(order) {
        tracing::warn!(order_id = %id, error = %e, "Placement rejected");
    }
    tracing::info!(
        registered = restaurant.order(&id).is_some(),
        undo = ?restaurant.undo(),
        "After declined placement"
    );
    Ok(())
}

fn required<T>(item: Option<T>) -> Result<T> {
    item.ok_or_else(|| anyhow::anyhow!("menu item missing from house menu"))
}
