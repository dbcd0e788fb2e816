//! Write a default configuration file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing storefront...");

    if write_default_config(config_path, yes)? {
        tracing::info!("Created {}", config_path.display());
        tracing::info!("Set WORDPRESS_URL, then run 'storefront dev' to start the development server.");
    } else {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
    }

    Ok(())
}

/// Write [`DEFAULT_CONFIG`] to `path`. Returns `false` if the file exists and
/// `overwrite` is not set.
fn write_default_config(path: &Path, overwrite: bool) -> Result<bool> {
    if path.exists() && !overwrite {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(true)
}

pub(crate) const DEFAULT_CONFIG: &str = r#"# Storefront Configuration

[site]
# Canonical origin of the storefront
domain = "https://next-woo.com"

# Short site name
name = "next-woo"

# One-sentence summary used in page metadata
description = "Headless WooCommerce store powered by Next.js"

[commerce]
# WordPress base URL for the My Account link.
# The WORDPRESS_URL environment variable takes precedence.
# wordpress_url = "https://wp.example.com"

[home]
heading = "Headless WooCommerce with Next.js"
badges = ["WooCommerce", "WordPress", "Next.js"]
# Hide the one-click deploy button
# show_deploy = false

[build]
# Output directory for the built site
output = "dist"

# Base URL (for deployment)
base_url = "/"

# Enable minification
minify = true

# Extra stylesheets
styles = []

[server]
host = "127.0.0.1"

# Dev server port
port = 7777

# Port for 'storefront serve'
preview_port = 4000

# Open a browser on start
open = true
"#;
