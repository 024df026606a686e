use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let request_id = uuid::Uuid::new_v4().to_string();

    info!(request_id = %request_id, method = %method, path = %path, "Incoming request");

    let response = next.run(req).await;
    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    match status {
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Server error"
        ),
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Client error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    response
}

/// Installs the global subscriber: a compact console layer filtered by
/// `RUST_LOG`, plus a daily-rolling JSON file in `log_dir` when given.
pub fn init_tracing(log_dir: Option<&str>) -> std::io::Result<()> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}=info,tower_http=warn", env!("CARGO_CRATE_NAME")))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let json_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "rollcall.json");
            Some(
                fmt::layer()
                    .json()
                    .with_writer(appender)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_filter(EnvFilter::new("info")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .init();

    Ok(())
}
