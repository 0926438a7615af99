use axum::Router;
use configs::{AppConfig, ServerConfig};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use service::{metrics, resources::Catalog, runtime};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn bind(server: &ServerConfig) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind((server.host.as_str(), server.port))
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind {}:{}: {e}", server.host, server.port))?;
    Ok(listener)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Open every collection and build the router without binding anything.
pub fn build_app(cfg: &AppConfig) -> Router {
    let catalog = Catalog::open(&cfg.storage);
    routes::build_router(&catalog, build_cors())
}

/// Public entry: check the data directory, start the admin listener if
/// configured, then serve until Ctrl+C. The admin listener stops with the
/// main server.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let missing = runtime::ensure_env(&cfg.storage).await?;
    if !missing.is_empty() {
        warn!(?missing, "some collections are unavailable");
    }

    let admin = match cfg.admin.addr.as_deref() {
        Some(addr) => Some(common::admin_http::spawn_admin_server(addr, metrics::encode_metrics).await?),
        None => None,
    };

    let app = build_app(&cfg);
    let listener = bind(&cfg.server).await?;
    let addr = listener.local_addr()?;
    info!(%addr, data_dir = %cfg.storage.data_dir, id_strategy = ?cfg.storage.id_strategy, "starting server");
    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    if let Some(handle) = admin {
        handle.abort();
        info!(event = "admin_stopped", "admin server stopped");
    }
    served?;
    Ok(())
}
