//! Serve Command
//!
//! Resolve configuration once, build the provider, and run the HTTP server
//! until Ctrl-C.
//!
//! Usage:
//!   coderefine serve [--host 127.0.0.1] [--port 8080]

use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::ai::create_provider;
use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::server::{self, AppState};
use crate::types::{RefineError, Result};

/// Options for the serve command
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    /// Explicit config file instead of the global/project chain
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub async fn run(options: ServeOptions) -> Result<()> {
    let mut config = ConfigLoader::resolve(options.config_path.as_deref())?;
    if let Some(host) = options.host {
        config.server.host = host;
    }
    if let Some(port) = options.port {
        config.server.port = port;
    }
    config.validate()?;

    let provider = create_provider(&config.llm)?;
    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| RefineError::Config(format!("Cannot bind {}: {}", addr, e)))?;

    let output = Output::new();
    output.header("coderefine");
    output.field("Address", &format!("http://{}", addr));
    output.field("Model", provider.model());
    output.field("Origins", &config.server.allowed_origins.join(", "));
    if config.server.diagnostics {
        output.warning("Diagnostics enabled: internal error details are exposed");
    }

    info!(provider = provider.name(), model = provider.model(), "Starting server");
    let state = AppState::new(config, provider);
    server::serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
