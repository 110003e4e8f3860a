use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::MenuItem;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Opaque order identity, generated once when the order is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single line on an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item: MenuItem,
    pub quantity: u32,
    pub customizations: Vec<String>,
}

impl OrderItem {
    pub fn new(menu_item: MenuItem, quantity: u32, customizations: Vec<String>) -> Self {
        Self {
            menu_item,
            quantity,
            customizations,
        }
    }

    pub fn total_price(&self) -> Decimal {
        self.menu_item.price * Decimal::from(self.quantity)
    }

    /// "Margherita x2 (Extra cheese, Thin crust)"
    pub fn description(&self) -> String {
        let mut desc = format!("{} x{}", self.menu_item.name, self.quantity);
        if !self.customizations.is_empty() {
            desc.push_str(&format!(" ({})", self.customizations.join(", ")));
        }
        desc
    }
}

/// Who the order is for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl CustomerInfo {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Result of a payment attempt, as reported by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: String,
    pub method: String,
    pub message: String,
    pub amount: Decimal,
    pub processed_at: DateTime<Utc>,
}

impl PaymentOutcome {
    pub fn approved(
        transaction_id: impl Into<String>,
        method: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            success: true,
            transaction_id: transaction_id.into(),
            method: method.into(),
            message: "Payment approved".to_string(),
            amount,
            processed_at: Utc::now(),
        }
    }

    pub fn declined(method: impl Into<String>, amount: Decimal, message: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: String::new(),
            method: method.into(),
            message: message.into(),
            amount,
            processed_at: Utc::now(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
