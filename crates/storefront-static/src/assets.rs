//! Asset pipeline for the storefront stylesheet.

/// Errors that can occur while processing assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("CSS parse error: {0}")]
    Parse(String),

    #[error("CSS minify error: {0}")]
    Minify(String),
}

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, AssetError> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| AssetError::Parse(e.to_string()))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| AssetError::Minify(e.to_string()))?;

        Ok(minified.code)
    }
}

// Neutral tokens; a configured stylesheet can override any of them.
const DEFAULT_CSS: &str = r#"/* Storefront home */

:root {
  --background: #ffffff;
  --foreground: #0a0a0a;
  --muted-foreground: #737373;
  --accent: #f5f5f5;
  --border: #e5e5e5;
  --radius: 0.5rem;
  --container-width: 1024px;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #0a0a0a;
    --foreground: #fafafa;
    --muted-foreground: #a3a3a3;
    --accent: #171717;
    --border: #262626;
  }
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-sans, system-ui, -apple-system, sans-serif);
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.section {
  padding: 3rem 0;
}

.container {
  max-width: var(--container-width);
  margin: 0 auto;
  padding: 0 1.5rem;
}

.home > * + * {
  margin-top: 1.5rem;
}

/* Prose */
.prose h1 {
  font-size: 2.25rem;
  font-weight: 700;
  line-height: 1.2;
  margin-bottom: 1rem;
}

.prose p {
  max-width: 65ch;
}

.prose a {
  color: inherit;
  text-decoration: underline;
  text-underline-offset: 4px;
}

/* Deploy button and badges */
.hero-actions {
  display: flex;
  justify-content: space-between;
  align-items: center;
  gap: 1rem;
}

.deploy img {
  display: block;
  margin: 1rem 0;
}

.badges {
  display: flex;
  gap: 0.5rem;
  list-style: none;
}

.badge {
  font-size: 0.75rem;
  padding: 0.25rem 0.5rem;
  border: 1px solid var(--border);
  border-radius: 999px;
  color: var(--muted-foreground);
}

/* Navigation cards */
.cards {
  display: grid;
  grid-template-columns: 1fr;
  gap: 1rem;
  margin-top: 1.5rem;
}

@media (min-width: 768px) {
  .cards {
    grid-template-columns: repeat(3, 1fr);
  }
}

.card {
  display: flex;
  flex-direction: column;
  justify-content: space-between;
  height: 12rem;
  padding: 1rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--accent);
  color: var(--foreground);
  text-decoration: none;
  transition: transform 0.15s;
}

.card:hover {
  transform: scale(1.02);
}

.card-disabled {
  opacity: 0.5;
  pointer-events: none;
}

.card-description {
  display: block;
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

.icon {
  display: inline-block;
  width: 2rem;
  height: 2rem;
  border-radius: 0.375rem;
  background: currentColor;
  mask-size: contain;
  mask-repeat: no-repeat;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();

        assert!(css.contains(".cards"));
        assert!(css.contains("repeat(3, 1fr)"));
    }

    #[test]
    fn minifies_css() {
        let css = AssetPipeline::generate_css();
        let minified = AssetPipeline::minify_css(&css).unwrap();

        assert!(minified.len() < css.len());
        assert!(!minified.contains("/* Storefront home */"));
    }
}
