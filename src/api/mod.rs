//! HTTP layer exposing the pipeline endpoint.

pub mod routes;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{config::Settings, pipeline::Pipeline};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Build the router serving `GET /pipeline`.
pub fn router(pipeline: Pipeline) -> Router {
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    Router::new()
        .route("/pipeline", get(routes::run_pipeline))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub async fn serve(settings: Settings) -> Result<()> {
    let pipeline = Pipeline::new(&settings).context("building upstream http client")?;
    let router = router(pipeline);

    let listener = bind(&settings).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        acquire = %settings.acquire_url,
        predict = %settings.predict_url,
        "orchestrator listening"
    );
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("orchestrator stopped");
    Ok(())
}

/// Bind the listener for `HOST`/`PORT`; host names are resolved.
pub async fn bind(settings: &Settings) -> Result<TcpListener> {
    TcpListener::bind((settings.host.as_str(), settings.port))
        .await
        .with_context(|| format!("binding {}:{}", settings.host, settings.port))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_resolves_host_names() {
        let settings = Settings::from_lookup(|key| match key {
            "HOST" => Some("localhost".to_string()),
            "PORT" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        let listener = bind(&settings).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
