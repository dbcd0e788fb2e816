//! Site configuration and home navigation for the headless storefront.
//!
//! This crate holds the structured core of the storefront: the validated,
//! set-once site identity record and the ordered list of navigation cards
//! shown on the landing page. Rendering lives in `storefront-static`.

pub mod config;
pub mod link;
pub mod nav;

pub use config::{get_site_config, init_site_config, ConfigError, SiteConfig, SiteConfigCell};
pub use link::{is_internal_path, join_url, UrlJoinError};
pub use nav::{
    build_navigation_entries, Destination, Icon, NavigationEntry, ACCOUNT_PATH, DEPLOY_URL,
    SOURCE_REPOSITORY_URL, UNCONFIGURED_HREF,
};
