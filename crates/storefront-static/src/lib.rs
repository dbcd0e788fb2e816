//! Static site generator for the storefront home page.
//!
//! Renders the landing page, its stylesheet and the metadata files
//! (sitemap, robots, web manifest) into an output directory.

pub mod assets;
pub mod builder;
pub mod templates;

pub use assets::{AssetError, AssetPipeline};
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use templates::{render_markdown, HomeContent, HomeContext, TemplateEngine};
