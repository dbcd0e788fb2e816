//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use storefront_site::get_site_config;
use storefront_static::{BuildConfig, StaticBuilder};

use crate::config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building storefront...");

    let file_config = config::bootstrap(config_path)?;
    let site = get_site_config()?;

    let build_config = BuildConfig {
        site: site.clone(),
        content: file_config.content,
        account_base_url: file_config.account_base_url,
        output_dir: output.unwrap_or_else(|| PathBuf::from(&file_config.build.output)),
        minify: minify.unwrap_or(file_config.build.minify),
        base_url: file_config.build.base_url,
        styles: file_config.build.styles,
    };

    let result = StaticBuilder::new(build_config)?.build().await?;

    tracing::info!("Wrote {} files in {}ms", result.files, result.duration_ms);
    if !result.account_linked {
        tracing::warn!("My Account card is disabled; set WORDPRESS_URL to link it");
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
