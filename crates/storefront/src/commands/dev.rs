//! Development server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use storefront_server::{DevServer, DevServerConfig};
use storefront_site::get_site_config;

use crate::config;

/// Run the dev server. Flags override the `[server]` section.
pub async fn run(config_path: &Path, port: Option<u16>, open: Option<bool>) -> Result<()> {
    let file_config = config::bootstrap(config_path)?;
    let site = get_site_config()?;

    let port = port.unwrap_or(file_config.server.port);
    tracing::info!("Starting development server on port {}", port);

    let styles: Vec<PathBuf> = file_config.build.styles.iter().map(PathBuf::from).collect();
    let mut watch_paths = styles.clone();
    watch_paths.push(file_config.path.clone());

    let server_config = DevServerConfig {
        content: file_config.content,
        account_base_url: file_config.account_base_url,
        styles,
        watch_paths,
        port,
        host: file_config.server.host,
        open: open.unwrap_or(file_config.server.open),
        ..DevServerConfig::new(site.clone())
    };

    DevServer::new(server_config).start().await?;

    Ok(())
}
