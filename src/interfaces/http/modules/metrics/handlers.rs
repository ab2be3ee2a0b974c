//! `GET /metrics` in Prometheus text format

use axum::{extract::State, http::header, response::IntoResponse};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Install the process-wide recorder. Call once at startup.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!("bookings_created_total", "Bookings accepted by the ledger");
    metrics::describe_counter!("booking_conflicts_total", "Booking writes rejected for overlap");
    metrics::describe_counter!("bookings_cancelled_total", "Bookings moved to cancelled");
    Ok(handle)
}

pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[tokio::test]
    async fn renders_text_exposition() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = MetricsState {
            handle: recorder.handle(),
        };
        let resp = prometheus_metrics(State(state)).await.into_response();
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4; charset=utf-8"
        );
        assert!(to_bytes(resp.into_body(), usize::MAX).await.is_ok());
    }
}
