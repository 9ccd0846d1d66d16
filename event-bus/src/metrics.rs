//! Prometheus metrics for the event bus.

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    /// Total events published, labeled by routing key and outcome.
    pub static ref EVENT_PUBLISH_TOTAL: CounterVec = register_counter_vec!(
        "event_bus_publish_total",
        "Total events published",
        &["routing_key", "status"]
    )
    .unwrap();

    /// Total events consumed, labeled by routing key and outcome.
    pub static ref EVENT_CONSUME_TOTAL: CounterVec = register_counter_vec!(
        "event_bus_consume_total",
        "Total events consumed",
        &["routing_key", "status"]
    )
    .unwrap();
}
