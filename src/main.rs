use dotenvy::dotenv;
use rollcall::logging::init_tracing;
use rollcall::metrics::{init_metrics, metrics_app};
use rollcall::router::init_router;
use rollcall::state::init_app_state;
use rollcall_config::ServerConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(server_config.log_dir.as_deref())?;

    let metrics_handle = init_metrics(server_config.observability_enabled)?;
    let state = init_app_state().await?;

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "Server listening");
    info!("OpenAPI document at http://{}/api-docs/openapi.json", address);

    axum::serve(listener, app).await?;

    Ok(())
}
