//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::{self, ServerSettings};

/// Run the serve command. Flags override `[server]` and `[build].output`.
pub async fn run(config_path: &Path, port: Option<u16>, dir: Option<PathBuf>) -> Result<()> {
    let file_config = config::load(config_path)?;
    let dir = dir.unwrap_or_else(|| PathBuf::from(&file_config.build.output));

    if !dir.join("index.html").exists() {
        anyhow::bail!(
            "No index.html in {}. Run 'storefront build' first.",
            dir.display()
        );
    }

    let addr = preview_addr(&file_config.server, port)?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    if file_config.server.open {
        let url = format!("http://{}", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

fn preview_addr(server: &ServerSettings, port: Option<u16>) -> Result<SocketAddr> {
    let port = port.unwrap_or(server.preview_port);
    format!("{}:{}", server.host, port)
        .parse()
        .with_context(|| format!("Invalid address {}:{}", server.host, port))
}
