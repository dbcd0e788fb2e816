//! Loading of `storefront.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use storefront_site::{init_site_config, link::parse_base_url, SiteConfig};
use storefront_static::HomeContent;

/// Environment variable holding the WordPress base URL.
pub const WORDPRESS_URL_ENV: &str = "WORDPRESS_URL";

/// Configuration file structure (storefront.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    site: SiteSection,
    #[serde(default)]
    commerce: CommerceSection,
    #[serde(default)]
    home: HomeSection,
    #[serde(default)]
    build: BuildSettings,
    #[serde(default)]
    server: ServerSettings,
}

#[derive(Debug, Deserialize)]
struct SiteSection {
    #[serde(default = "default_domain")]
    domain: String,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_description")]
    description: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            name: default_name(),
            description: default_description(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct CommerceSection {
    /// WordPress base URL; the `WORDPRESS_URL` environment variable wins
    wordpress_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct HomeSection {
    heading: Option<String>,
    intro: Option<String>,
    deploy_url: Option<String>,
    show_deploy: Option<bool>,
    badges: Option<Vec<String>>,
}

/// `[build]` settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BuildSettings {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_minify")]
    pub minify: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Paths to CSS stylesheets to include
    #[serde(default)]
    pub styles: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            minify: default_minify(),
            base_url: default_base_url(),
            styles: vec![],
        }
    }
}

/// `[server]` settings for `dev` and `serve`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    /// Dev server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Port for previewing the built site
    #[serde(default = "default_preview_port")]
    pub preview_port: u16,
    /// Open a browser once the server is listening
    #[serde(default = "default_open")]
    pub open: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            preview_port: default_preview_port(),
            open: default_open(),
        }
    }
}

fn default_domain() -> String {
    "https://next-woo.com".to_string()
}
fn default_name() -> String {
    "next-woo".to_string()
}
fn default_description() -> String {
    "Headless WooCommerce store powered by Next.js".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7777
}
fn default_preview_port() -> u16 {
    4000
}
fn default_open() -> bool {
    true
}

/// Validated configuration for one process run.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Site identity
    pub site: SiteConfig,
    /// WordPress base URL for the account link
    pub account_base_url: Option<String>,
    /// Home page copy
    pub content: HomeContent,
    /// Build settings
    pub build: BuildSettings,
    /// Server settings
    pub server: ServerSettings,
    /// Path the configuration was loaded from
    pub path: PathBuf,
}

/// Load configuration from `path` if it exists, falling back to defaults.
///
/// The `WORDPRESS_URL` environment variable is read here, once.
/// Returns an error if the file exists but is malformed or the site identity
/// is invalid.
pub fn load(path: &Path) -> Result<StorefrontConfig> {
    let file = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        file
    } else {
        tracing::info!("{} not found, using defaults", path.display());
        ConfigFile::default()
    };

    let env_url = std::env::var(WORDPRESS_URL_ENV).ok();
    resolve(file, env_url, path)
}

/// Load the configuration and install the process-wide site identity.
///
/// Commands read the identity back through
/// [`storefront_site::get_site_config`].
pub fn bootstrap(path: &Path) -> Result<StorefrontConfig> {
    let config = load(path)?;
    init_site_config(config.site.clone())
        .context("Failed to initialize site configuration")?;
    Ok(config)
}

fn resolve(file: ConfigFile, env_url: Option<String>, path: &Path) -> Result<StorefrontConfig> {
    let site = SiteConfig::new(file.site.domain, file.site.name, file.site.description)
        .with_context(|| format!("Invalid [site] configuration in {}", path.display()))?;

    let account_base_url = non_blank(env_url).or_else(|| non_blank(file.commerce.wordpress_url));
    match &account_base_url {
        Some(url) => {
            if let Err(e) = parse_base_url(url) {
                tracing::warn!("WordPress URL '{}' is not usable: {}", url, e);
            }
        }
        None => tracing::warn!(
            "No WordPress URL configured; set {} or [commerce].wordpress_url",
            WORDPRESS_URL_ENV
        ),
    }

    let defaults = HomeContent::default();
    let deploy_url = if file.home.show_deploy == Some(false) {
        None
    } else {
        file.home.deploy_url.or(defaults.deploy_url)
    };
    let content = HomeContent {
        heading: file.home.heading.unwrap_or(defaults.heading),
        intro: file.home.intro.unwrap_or(defaults.intro),
        deploy_url,
        badges: file.home.badges.unwrap_or(defaults.badges),
    };

    Ok(StorefrontConfig {
        site,
        account_base_url,
        content,
        build: file.build,
        server: file.server,
        path: path.to_path_buf(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(toml_str: &str, env_url: Option<&str>) -> Result<StorefrontConfig> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        resolve(file, env_url.map(str::to_string), Path::new("storefront.toml"))
    }

    #[test]
    fn defaults_match_next_woo() {
        let config = parse("", None).unwrap();

        assert_eq!(config.site.domain(), "https://next-woo.com");
        assert_eq!(config.site.name(), "next-woo");
        assert_eq!(config.account_base_url, None);
        assert_eq!(config.content, HomeContent::default());
        assert_eq!(config.build, BuildSettings::default());
        assert_eq!(config.server, ServerSettings::default());
        assert_eq!(config.server.port, 7777);
        assert_eq!(config.server.preview_port, 4000);
    }

    #[test]
    fn reads_all_sections() {
        let config = parse(
            r#"
[site]
domain = "https://mystore.test"
name = "mystore"
description = "My store"

[commerce]
wordpress_url = "https://wp.mystore.test"

[home]
heading = "Welcome"
badges = ["WooCommerce"]
show_deploy = false

[build]
output = "public"
minify = false
styles = ["theme.css"]
"#,
            None,
        )
        .unwrap();

        assert_eq!(config.site.domain(), "https://mystore.test");
        assert_eq!(config.site.description(), "My store");
        assert_eq!(
            config.account_base_url.as_deref(),
            Some("https://wp.mystore.test")
        );
        assert_eq!(config.content.heading, "Welcome");
        assert_eq!(config.content.badges, vec!["WooCommerce".to_string()]);
        assert_eq!(config.content.deploy_url, None);
        assert_eq!(config.build.output, "public");
        assert!(!config.build.minify);
        assert_eq!(config.build.base_url, "/");
        assert_eq!(config.build.styles, vec!["theme.css".to_string()]);
    }

    #[test]
    fn reads_server_section() {
        let config = parse(
            "[server]\nhost = \"0.0.0.0\"\nport = 9999\nopen = false\n",
            None,
        )
        .unwrap();

        assert_eq!(
            config.server,
            ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 9999,
                preview_port: 4000,
                open: false,
            }
        );
    }

    #[test]
    fn rejects_invalid_server_port() {
        assert!(parse("[server]\nport = \"fast\"\n", None).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let config = parse(
            "[commerce]\nwordpress_url = \"https://file.test\"\n",
            Some("https://env.test"),
        )
        .unwrap();

        assert_eq!(config.account_base_url.as_deref(), Some("https://env.test"));
    }

    #[test]
    fn blank_environment_value_counts_as_unset() {
        let config = parse(
            "[commerce]\nwordpress_url = \"https://file.test\"\n",
            Some("  "),
        )
        .unwrap();
        assert_eq!(config.account_base_url.as_deref(), Some("https://file.test"));

        let config = parse("", Some("")).unwrap();
        assert_eq!(config.account_base_url, None);
    }

    #[test]
    fn invalid_wordpress_url_is_not_fatal() {
        let config = parse("", Some("not a url")).unwrap();
        assert_eq!(config.account_base_url.as_deref(), Some("not a url"));
    }

    #[test]
    fn invalid_site_is_fatal() {
        let err = parse("[site]\ndomain = \"next-woo.com\"\n", None).unwrap_err();
        assert!(err.to_string().contains("Invalid [site] configuration"));

        assert!(parse("[site]\nname = \"\"\n", None).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("storefront.toml");
        fs::write(&path, "[site\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn bootstrap_installs_site_identity() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("storefront.toml");
        fs::write(&path, "[site]\nname = \"bootstrapped\"\n").unwrap();

        let config = bootstrap(&path).unwrap();
        let site = storefront_site::get_site_config().unwrap();

        assert_eq!(site, &config.site);
        assert_eq!(site.name(), "bootstrapped");
        assert!(bootstrap(&path).is_err());
    }

    #[test]
    fn default_config_template_is_valid() {
        let config = parse(crate::commands::init::DEFAULT_CONFIG, None).unwrap();

        assert_eq!(config.site.name(), "next-woo");
        assert_eq!(config.build.output, "dist");
        assert_eq!(config.server, ServerSettings::default());
    }
}
