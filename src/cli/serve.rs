//! CLI entry-point for serving the pipeline endpoint.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api, config::Settings};

/// Run the Axum server.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct Args {
    /// Port to bind, overriding `PORT`.
    #[arg(long)]
    pub port: Option<u16>,
    /// Host address, overriding `HOST`.
    #[arg(long)]
    pub host: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    api::serve(settings).await
}
