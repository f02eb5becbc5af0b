//! Prometheus metrics exposition
//!
//! - `vend_connect_logins_total` (counter): label `outcome`
//! - `vend_connect_exchanges_total` (counter): label `outcome`
//! - `vend_connect_exchange_duration_seconds` (histogram): label `outcome`

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const EXCHANGE_DURATION: &str = "vend_connect_exchange_duration_seconds";

/// Token endpoint latency buckets, 10ms to the 120s transport ceiling.
const EXCHANGE_BUCKETS: &[f64] = &[
    0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
];

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(EXCHANGE_DURATION.to_string()), EXCHANGE_BUCKETS)
}

/// Install the Prometheus recorder and return a handle for rendering metrics.
///
/// The exchange histogram gets explicit buckets so it renders `_bucket`
/// lines instead of a summary.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    builder()?.install_recorder()
}

/// Record a `/connect` attempt.
pub fn record_login(outcome: &'static str) {
    metrics::counter!("vend_connect_logins_total", "outcome" => outcome).increment(1);
}

/// Record a finished code exchange.
pub fn record_exchange(outcome: &'static str, duration_secs: f64) {
    metrics::counter!("vend_connect_exchanges_total", "outcome" => outcome).increment(1);
    metrics::histogram!(EXCHANGE_DURATION, "outcome" => outcome).record(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusRecorder;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        record_login("redirected");
        record_exchange("ok", 0.2);
    }

    /// Isolated recorder/handle pair; install_recorder() may only run once
    /// per process.
    fn isolated_recorder() -> (PrometheusRecorder, PrometheusHandle) {
        let recorder = builder().unwrap().build_recorder();
        let handle = recorder.handle();
        (recorder, handle)
    }

    #[test]
    fn login_counter_carries_outcome() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);

        record_login("redirected");
        record_login("configuration_error");

        let output = handle.render();
        assert!(output.contains("vend_connect_logins_total"));
        assert!(output.contains("outcome=\"redirected\""));
        assert!(output.contains("outcome=\"configuration_error\""));
    }

    #[test]
    fn exchange_histogram_renders_buckets() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);

        record_exchange("ok", 0.3);
        record_exchange("rejected", 0.05);

        let output = handle.render();
        assert!(output.contains("vend_connect_exchanges_total"));
        assert!(output.contains("outcome=\"rejected\""));
        assert!(output.contains("vend_connect_exchange_duration_seconds_bucket"));
        assert!(output.contains("le=\"0.01\""));
        assert!(output.contains("le=\"120\""));
        assert!(output.contains("le=\"+Inf\""));
    }
}
