use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use rollcall_config::ServerConfig;
use rollcall_models::AttendanceStatus;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Whether metrics are recorded. Fixed by the first call to [`init_metrics`],
/// otherwise read from `OBSERVABILITY_ENABLED`.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| ServerConfig::from_env().observability_enabled)
}

/// Installs the Prometheus recorder and its upkeep task.
/// Returns `None` when observability is disabled.
pub fn init_metrics(enabled: bool) -> anyhow::Result<Option<PrometheusHandle>> {
    if !*OBSERVABILITY_ENABLED.get_or_init(|| enabled) {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);
    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Serves the Prometheus text format at `/metrics`.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_attendance_marked(status: AttendanceStatus) {
    if !is_observability_enabled() {
        return;
    }
    counter!("attendance_marked_total", "status" => status.as_str()).increment(1);
}

pub fn track_attendance_rejected(kind: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("attendance_rejected_total", "kind" => kind.to_string()).increment(1);
}

pub fn track_enrollment_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("enrollments_created_total").increment(1);
}
