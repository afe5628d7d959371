//! Metrics collection.
//!
//! # Metrics
//! - `harness_client_init_total` (counter): construction stages by stage, outcome
//! - `harness_config_queries_total` (counter): channel config queries by outcome
//! - `harness_config_query_duration_seconds` (histogram): query latency
//! - `harness_events_delivered_total` / `harness_events_dropped_total` (counters)
//! - `harness_event_registrations` (gauge): live subscriptions
//!
//! Without an installed recorder these calls are no-ops.

use std::time::Duration;

fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "failure"
    }
}

/// Record one client construction stage.
pub fn record_client_init(stage: &'static str, ok: bool) {
    metrics::counter!("harness_client_init_total", "stage" => stage, "outcome" => outcome(ok))
        .increment(1);
}

/// Record a channel configuration query.
pub fn record_config_query(ok: bool, elapsed: Duration) {
    metrics::counter!("harness_config_queries_total", "outcome" => outcome(ok)).increment(1);
    metrics::histogram!("harness_config_query_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record the result of publishing one chaincode event.
pub fn record_event_delivery(delivered: usize, dropped: usize) {
    metrics::counter!("harness_events_delivered_total").increment(delivered as u64);
    if dropped > 0 {
        metrics::counter!("harness_events_dropped_total").increment(dropped as u64);
    }
}

pub fn record_active_registrations(count: usize) {
    metrics::gauge!("harness_event_registrations").set(count as f64);
}
