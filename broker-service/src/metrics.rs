//! Prometheus metrics for the broker.

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    /// Total submissions dispatched, labeled by action, transport and outcome.
    pub static ref DISPATCH_TOTAL: CounterVec = register_counter_vec!(
        "broker_dispatch_total",
        "Total submissions dispatched",
        &["action", "transport", "status"]
    )
    .unwrap();
}
