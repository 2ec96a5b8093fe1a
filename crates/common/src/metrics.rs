//! Process-wide Prometheus counters (default registry).

use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pms_http_requests_total",
        "HTTP requests handled, by method and status code",
        &["method", "status"]
    )
    .expect("register http_requests_total")
});

pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pms_auth_failures_total",
        "Rejected authentication or authorization attempts, by reason",
        &["reason"]
    )
    .expect("register auth_failures_total")
});

pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pms_commands_total",
        "Commands dispatched through the mediator, by command and outcome",
        &["command", "outcome"]
    )
    .expect("register commands_total")
});

pub fn record_request(method: &str, status: u16) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, &status.to_string()])
        .inc();
}

pub fn record_auth_failure(reason: &str) {
    AUTH_FAILURES_TOTAL.with_label_values(&[reason]).inc();
}

pub fn record_command(command: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    COMMANDS_TOTAL.with_label_values(&[command, outcome]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_counters_show_up_in_exposition() {
        record_request("GET", 200);
        record_auth_failure("missing_token");
        record_command("create_user", true);
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("pms_http_requests_total"));
        assert!(body.contains("pms_auth_failures_total"));
        assert!(body.contains("reason=\"missing_token\""));
        assert!(body.contains("pms_commands_total"));
    }
}
