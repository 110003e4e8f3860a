use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::domain::order::{OrderId, PaymentOutcome};

// ============================================================================
// Payment Gateway
// ============================================================================
//
// Synchronous charge call that may decline. Declines are a normal outcome
// reported through `PaymentOutcome::success`, not an error.
//
// ============================================================================

pub trait PaymentGateway: Send + Sync {
    fn charge(&self, amount: Decimal, order_id: OrderId) -> PaymentOutcome;
}

/// In-process gateway driven by `GatewayConfig`
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    config: GatewayConfig,
}

impl SimulatedGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, amount: Decimal, order_id: OrderId) -> PaymentOutcome {
        let method = self.config.method.as_str();

        if self.config.always_decline {
            tracing::warn!(order_id = %order_id, %amount, "Payment gateway unavailable");
            return PaymentOutcome::declined(method, amount, "Payment gateway unavailable");
        }

        if let Some(limit) = self.config.decline_above {
            if amount > limit {
                tracing::warn!(order_id = %order_id, %amount, %limit, "Charge exceeds limit");
                return PaymentOutcome::declined(
                    method,
                    amount,
                    format!("Amount ${amount:.2} exceeds limit ${limit:.2}"),
                );
            }
        }

        let transaction_id = format!("TXN-{}", Uuid::new_v4().simple());
        tracing::debug!(order_id = %order_id, %amount, transaction_id = %transaction_id, "Payment approved");
        PaymentOutcome::approved(transaction_id, method, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gateway_approves() {
        let gateway = SimulatedGateway::default();
        let outcome = gateway.charge(Decimal::new(2897, 2), OrderId::new());

        assert!(outcome.success);
        assert!(outcome.transaction_id.starts_with("TXN-"));
        assert_eq!(outcome.method, "CreditCard");
        assert_eq!(outcome.amount, Decimal::new(2897, 2));
    }

    #[test]
    fn test_declining_gateway() {
        let gateway = SimulatedGateway::new(GatewayConfig::declining());
        let outcome = gateway.charge(Decimal::ONE, OrderId::new());

        assert!(!outcome.success);
        assert!(outcome.transaction_id.is_empty());
    }

    #[test]
    fn test_limit_is_inclusive() {
        let gateway = SimulatedGateway::new(GatewayConfig::with_limit(Decimal::from(20)));

        assert!(gateway.charge(Decimal::from(20), OrderId::new()).success);

        let outcome = gateway.charge(Decimal::new(2001, 2), OrderId::new());
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Amount $20.01 exceeds limit $20.00");
    }
}
