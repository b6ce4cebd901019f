use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUISITION_TRANSITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "prestar_requisition_transitions_total",
        "Requisition status changes, labelled by the status reached",
        &["status"]
    )
    .expect("register requisition_transitions_total")
});

pub static POINTS_AWARDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "prestar_points_awarded_total",
        "Gamification points added to user totals"
    )
    .expect("register points_awarded_total")
});

pub static NOTIFICATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "prestar_notifications_total",
        "In-app notifications created"
    )
    .expect("register notifications_total")
});

pub static EMAIL_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "prestar_email_failures_total",
        "Outbound emails the mailer failed to send"
    )
    .expect("register email_failures_total")
});

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
