//! Static site builder.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use storefront_site::{Destination, NavigationEntry, SiteConfig};

use crate::assets::AssetPipeline;
use crate::templates::{HomeContent, HomeContext, TemplateEngine};

/// Configuration for building the static storefront home.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Site identity
    pub site: SiteConfig,

    /// Home page copy
    pub content: HomeContent,

    /// WordPress base URL for the account link
    pub account_base_url: Option<String>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL the site is served under
    pub base_url: String,

    /// Paths to CSS stylesheets to copy and include
    pub styles: Vec<String>,
}

impl BuildConfig {
    /// Build configuration with default content and output settings.
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            content: HomeContent::default(),
            account_base_url: None,
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            styles: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of files written
    pub files: usize,

    /// Whether the account card resolved to a real URL
    pub account_linked: bool,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("Failed to serialize {0}")]
    SerializeError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let templates =
            TemplateEngine::new().map_err(|e| BuildError::TemplateError(e.to_string()))?;

        Ok(Self { config, templates })
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let out = &self.config.output_dir;

        fs::create_dir_all(out).map_err(|e| write_error(out, e))?;

        let copied = self.generate_assets()?;
        let style_urls = copied
            .iter()
            .map(|name| format!("{}assets/{}", self.config.base_url, name))
            .collect();

        let context = HomeContext::new(
            &self.config.site,
            &self.config.content,
            self.config.account_base_url.as_deref(),
            &self.config.base_url,
        )
        .with_styles(style_urls);

        let html = self
            .templates
            .render_home(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        write_file(&out.join("index.html"), html)?;

        // index.html and main.css
        let mut files = 2 + copied.len();
        files += self.generate_sitemap(&context.nav)?;
        files += self.generate_manifest()?;

        let account_linked = context.nav.iter().any(|e| {
            e.is_external() && e.href().ends_with(storefront_site::ACCOUNT_PATH)
        });

        Ok(BuildResult {
            files,
            account_linked,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: out.clone(),
        })
    }

    /// Write `assets/main.css` and copy configured stylesheets.
    ///
    /// Returns the file names of the stylesheets copied into `assets/`, in
    /// configuration order. Missing stylesheets are skipped and file names
    /// that collide get a numeric suffix.
    fn generate_assets(&self) -> Result<Vec<String>, BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| write_error(&assets_dir, e))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Skipping CSS minification: {}", e);
                css.clone()
            })
        } else {
            css
        };
        write_file(&assets_dir.join("main.css"), css)?;

        let mut taken: HashSet<String> = HashSet::from(["main.css".to_string()]);
        let mut copied = Vec::new();
        for style_path in &self.config.styles {
            let source_path = PathBuf::from(style_path);
            if !source_path.exists() {
                tracing::warn!("Stylesheet not found: {}", style_path);
                continue;
            }

            let content = fs::read_to_string(&source_path).map_err(|e| BuildError::ReadError {
                path: source_path.display().to_string(),
                message: e.to_string(),
            })?;

            let name = unique_asset_name(style_file_name(style_path), &mut taken);
            write_file(&assets_dir.join(&name), content)?;
            tracing::info!("Copied stylesheet from {} to assets/{}", style_path, name);
            copied.push(name);
        }

        Ok(copied)
    }

    /// Write `sitemap.xml` and `robots.txt`.
    ///
    /// The sitemap lists the home page and every internal route linked from it.
    fn generate_sitemap(&self, nav: &[NavigationEntry]) -> Result<usize, BuildError> {
        let site = &self.config.site;

        let mut paths = vec!["/"];
        paths.extend(nav.iter().filter_map(|entry| match entry.destination {
            Destination::Internal(path) => Some(path),
            _ => None,
        }));

        let urls: Vec<String> = paths
            .iter()
            .map(|path| {
                format!(
                    "  <url>\n    <loc>{}</loc>\n  </url>",
                    escape_xml(&site.canonical_url(path))
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );
        write_file(&self.config.output_dir.join("sitemap.xml"), sitemap)?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}",
            site.canonical_url("/sitemap.xml")
        );
        write_file(&self.config.output_dir.join("robots.txt"), robots)?;

        Ok(2)
    }

    /// Write `site.webmanifest` from the site identity.
    fn generate_manifest(&self) -> Result<usize, BuildError> {
        let site = &self.config.site;

        let manifest = serde_json::json!({
            "name": site.name(),
            "short_name": site.name(),
            "description": site.description(),
            "start_url": self.config.base_url,
            "display": "browser",
        });

        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| BuildError::SerializeError(format!("site.webmanifest: {}", e)))?;
        write_file(&self.config.output_dir.join("site.webmanifest"), json)?;

        Ok(1)
    }
}

fn style_file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("style.css")
}

/// Pick a name not yet in `taken`, inserting `-2`, `-3`, ... before the
/// extension as needed.
fn unique_asset_name(name: &str, taken: &mut HashSet<String>) -> String {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    let mut candidate = name.to_string();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = match ext {
            Some(ext) => format!("{}-{}.{}", stem, n, ext),
            None => format!("{}-{}", stem, n),
        };
        n += 1;
    }

    taken.insert(candidate.clone());
    candidate
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|e| write_error(path, e))
}

fn write_error(path: &Path, e: std::io::Error) -> BuildError {
    BuildError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
