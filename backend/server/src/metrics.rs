use std::time::Instant;

use domain_types::{errors::WalletOneError, types::FieldMap};
use error_stack::ResultExt;
use interfaces::event_interface::PaymentEventHandler;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

const LATENCY_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

lazy_static! {
    /// Notifications received from the gateway, by verification outcome
    pub static ref NOTIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "WALLETONE_NOTIFICATIONS_TOTAL",
        "Total number of WalletOne payment notifications received",
        &["outcome"]
    )
    .expect("Failed to register WALLETONE_NOTIFICATIONS_TOTAL");

    /// Checkout requests built, by outcome
    pub static ref CHECKOUTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "WALLETONE_CHECKOUTS_TOTAL",
        "Total number of WalletOne checkout requests built",
        &["outcome"]
    )
    .expect("Failed to register WALLETONE_CHECKOUTS_TOTAL");

    pub static ref REQUEST_LATENCY: HistogramVec = register_histogram_vec!(
        "WALLETONE_REQUEST_LATENCY_SECONDS",
        "Time spent building or verifying WalletOne payloads",
        &["flow"],
        LATENCY_BUCKETS.to_vec()
    )
    .expect("Failed to register WALLETONE_REQUEST_LATENCY_SECONDS");
}

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_REJECTED: &str = "rejected";
pub const OUTCOME_INVALID: &str = "invalid";

/// Runs `handler` and records its latency under `flow`
pub fn with_latency<T>(flow: &str, handler: impl FnOnce() -> T) -> T {
    let start_time = Instant::now();
    let result = handler();
    REQUEST_LATENCY
        .with_label_values(&[flow])
        .observe(start_time.elapsed().as_secs_f64());
    result
}

pub fn record_notification(outcome: &str) {
    NOTIFICATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_checkout(outcome: &str) {
    CHECKOUTS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Counts verified notifications by outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationMetrics;

impl PaymentEventHandler for NotificationMetrics {
    fn on_success(&self, _fields: &FieldMap) {
        record_notification(OUTCOME_SUCCESS);
    }

    fn on_failure(&self, _fields: &FieldMap, error: &WalletOneError) {
        if error.is_security_failure() {
            record_notification(OUTCOME_INVALID);
        } else {
            record_notification(OUTCOME_REJECTED);
        }
    }
}

pub async fn metrics_handler() -> error_stack::Result<String, MetricsError> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .change_context(MetricsError::EncodingError)?;
    String::from_utf8(buffer).change_context(MetricsError::Utf8Error)
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Error encoding metrics")]
    EncodingError,
    #[error("Error converting metrics to utf8")]
    Utf8Error,
}
