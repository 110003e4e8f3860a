use rust_decimal::Decimal;
use serde::Deserialize;

// ============================================================================
// Configuration
// ============================================================================
//
// Plain structs with sensible defaults and a few named presets. Hosts that
// want file or env driven config can deserialize them with serde.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Label reported on every payment outcome
    pub method: String,
    /// Charges strictly above this amount are declined
    pub decline_above: Option<Decimal>,
    /// Decline everything, e.g. to simulate an outage
    pub always_decline: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            method: "CreditCard".to_string(),
            decline_above: None,
            always_decline: false,
        }
    }
}

impl GatewayConfig {
    /// Gateway that refuses every charge
    pub fn declining() -> Self {
        Self {
            always_decline: true,
            ..Self::default()
        }
    }

    /// Gateway with a per-charge limit
    pub fn with_limit(limit: Decimal) -> Self {
        Self {
            decline_above: Some(limit),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RestaurantConfig {
    pub name: String,
    pub gateway: GatewayConfig,
    /// Register the prometheus-backed analytics sink
    pub enable_metrics: bool,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            name: "Main Street Kitchen".to_string(),
            gateway: GatewayConfig::default(),
            enable_metrics: true,
        }
    }
}
