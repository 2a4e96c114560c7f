//! Callbacks fired once an inbound payment notification has been checked

use domain_types::{errors::WalletOneError, types::FieldMap};

/// Receives the outcome of every notification verification.
///
/// Implementations run synchronously on the request path and must not block.
pub trait PaymentEventHandler: Send + Sync {
    /// Signature matched and the order was accepted
    fn on_success(&self, fields: &FieldMap);

    /// Verification failed, either through tampering or a declined payment
    fn on_failure(&self, fields: &FieldMap, error: &WalletOneError);
}

/// Handler that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventHandler;

impl PaymentEventHandler for NoopEventHandler {
    fn on_success(&self, _fields: &FieldMap) {}

    fn on_failure(&self, _fields: &FieldMap, _error: &WalletOneError) {}
}
