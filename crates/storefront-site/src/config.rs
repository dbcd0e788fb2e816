//! Site identity configuration.
//!
//! A [`SiteConfig`] can only be built through [`SiteConfig::new`], which
//! validates every field. The process-wide instance is stored once at startup
//! with [`init_site_config`] and read back with [`get_site_config`].

use std::sync::OnceLock;

use serde::Serialize;

use url::Url;

use crate::link::{append_path, parse_base_url, UrlJoinError};

/// Errors raised while building or accessing the site configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid site domain '{value}': {source}")]
    InvalidDomain {
        value: String,
        #[source]
        source: UrlJoinError,
    },

    #[error("Site {0} must not be empty")]
    EmptyField(&'static str),

    #[error("Site configuration has already been initialized")]
    AlreadyInitialized,

    #[error("Site configuration has not been initialized")]
    Uninitialized,
}

/// Identity of the site: canonical origin, short name and summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    domain: String,
    #[serde(skip)]
    origin: Url,
    name: String,
    description: String,
}

impl SiteConfig {
    /// Validate and build a site configuration.
    ///
    /// `domain` must be an absolute `http`/`https` URL with a host and no query
    /// or fragment. `name` and
    /// `description` must contain something other than whitespace. Values are
    /// stored exactly as given.
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let domain = domain.into();
        let name = name.into();
        let description = description.into();

        let origin = parse_base_url(&domain).map_err(|source| ConfigError::InvalidDomain {
            value: domain.clone(),
            source,
        })?;

        if name.trim().is_empty() {
            return Err(ConfigError::EmptyField("name"));
        }
        if description.trim().is_empty() {
            return Err(ConfigError::EmptyField("description"));
        }

        Ok(Self {
            domain,
            origin,
            name,
            description,
        })
    }

    /// Canonical site origin, e.g. `https://next-woo.com`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Absolute URL of a site route, resolved against the domain.
    pub fn canonical_url(&self, path: &str) -> String {
        // http(s) origins always have path segments, so the join cannot fail.
        append_path(&self.origin, path)
            .map_or_else(|_| self.origin.to_string(), String::from)
    }
}

/// A set-once holder for a [`SiteConfig`].
#[derive(Debug, Default)]
pub struct SiteConfigCell {
    inner: OnceLock<SiteConfig>,
}

impl SiteConfigCell {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Store the configuration. Fails if a value is already present.
    pub fn init(&self, config: SiteConfig) -> Result<&SiteConfig, ConfigError> {
        self.inner
            .set(config)
            .map_err(|_| ConfigError::AlreadyInitialized)?;
        self.get()
    }

    /// Read the stored configuration.
    pub fn get(&self) -> Result<&SiteConfig, ConfigError> {
        self.inner.get().ok_or(ConfigError::Uninitialized)
    }
}

static SITE_CONFIG: SiteConfigCell = SiteConfigCell::new();

/// Install the process-wide site configuration.
pub fn init_site_config(config: SiteConfig) -> Result<&'static SiteConfig, ConfigError> {
    let stored = SITE_CONFIG.init(config)?;
    tracing::debug!(domain = stored.domain(), name = stored.name(), "Site config initialized");
    Ok(stored)
}

/// The process-wide site configuration.
pub fn get_site_config() -> Result<&'static SiteConfig, ConfigError> {
    SITE_CONFIG.get()
}
