// ============================================================================
// External Collaborators
// ============================================================================
//
// Payment and notification boundaries. The order core talks to these only
// through traits so hosts can plug in real services.
//
// ============================================================================

pub mod notifications;
pub mod payment;

pub use notifications::{LoggingSink, NotificationSink, Notifier};
pub use payment::{PaymentGateway, SimulatedGateway};
