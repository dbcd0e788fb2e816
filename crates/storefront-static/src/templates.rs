//! Template engine for rendering the storefront home page.

use minijinja::{context, Environment, Value};
use serde::Serialize;

use storefront_site::{build_navigation_entries, NavigationEntry, SiteConfig, DEPLOY_URL};

/// Editable copy shown above the navigation cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeContent {
    /// Main heading
    pub heading: String,
    /// Introduction paragraph, in Markdown
    pub intro: String,
    /// One-click deploy link, hidden when `None`
    pub deploy_url: Option<String>,
    /// Technology badges shown next to the deploy button
    pub badges: Vec<String>,
}

impl Default for HomeContent {
    fn default() -> Self {
        Self {
            heading: "Headless WooCommerce with Next.js".to_string(),
            intro: DEFAULT_INTRO.to_string(),
            deploy_url: Some(DEPLOY_URL.to_string()),
            badges: vec![
                "WooCommerce".to_string(),
                "WordPress".to_string(),
                "Next.js".to_string(),
            ],
        }
    }
}

const DEFAULT_INTRO: &str = "This is [next-woo](https://github.com/brijr/next-woo), a headless \
WooCommerce storefront built with Next.js 16, React 19, and TypeScript. It features a complete \
e-commerce experience with products, cart, checkout, and customer accounts. Built with \
[shadcn/ui](https://ui.shadcn.com), [craft-ds](https://craft-ds.com), and Tailwind CSS.";

/// Context for rendering the home page template.
#[derive(Debug, Clone, Serialize)]
pub struct HomeContext {
    /// Site identity
    pub site: SiteConfig,
    /// Canonical URL of the page
    pub canonical_url: String,
    /// Main heading
    pub heading: String,
    /// Rendered introduction HTML
    pub intro_html: String,
    /// One-click deploy link
    pub deploy_url: Option<String>,
    /// Technology badges
    pub badges: Vec<String>,
    /// Navigation cards in display order
    pub nav: Vec<NavigationEntry>,
    /// Base URL for assets
    pub base_url: String,
    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,
    /// Script injected by the development server
    pub live_reload: Option<String>,
}

impl HomeContext {
    /// Build the context for one render.
    ///
    /// The navigation cards are composed here, once per call.
    pub fn new(
        site: &SiteConfig,
        content: &HomeContent,
        account_base_url: Option<&str>,
        base_url: &str,
    ) -> Self {
        Self {
            site: site.clone(),
            canonical_url: site.canonical_url("/"),
            heading: content.heading.clone(),
            intro_html: render_markdown(&content.intro),
            deploy_url: content.deploy_url.clone(),
            badges: content.badges.clone(),
            nav: build_navigation_entries(account_base_url),
            base_url: base_url.to_string(),
            styles: Vec::new(),
            live_reload: None,
        }
    }

    pub fn with_styles(mut self, styles: Vec<String>) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_live_reload(mut self, script_src: impl Into<String>) -> Self {
        self.live_reload = Some(script_src.into());
        self
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        env.add_filter("href", href_filter);
        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("home.html", HOME_TEMPLATE)?;
        env.add_template("card.html", CARD_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render the home page.
    pub fn render_home(&self, context: &HomeContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("home.html")?;

        tmpl.render(context! {
            site => &context.site,
            canonical_url => &context.canonical_url,
            heading => &context.heading,
            intro_html => &context.intro_html,
            deploy_url => &context.deploy_url,
            badges => &context.badges,
            nav => &context.nav,
            base_url => &context.base_url,
            styles => &context.styles,
            live_reload => &context.live_reload,
        })
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine").finish_non_exhaustive()
    }
}

/// Render Markdown to HTML.
pub fn render_markdown(content: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Escape a URL for use inside a double-quoted attribute.
///
/// Unlike the default HTML escaping this leaves `/` alone, so hrefs stay
/// readable in the output.
fn href_filter(value: &str) -> Value {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Value::from_safe_string(out)
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ site.name }}</title>
  <meta name="description" content="{{ site.description }}">
  <link rel="canonical" href="{{ canonical_url | href }}">
  <meta property="og:title" content="{{ site.name }}">
  <meta property="og:description" content="{{ site.description }}">
  <meta property="og:url" content="{{ canonical_url | href }}">
  <meta property="og:site_name" content="{{ site.name }}">
  <meta property="og:type" content="website">
  <link rel="manifest" href="{{ base_url | href }}site.webmanifest">
  <link rel="stylesheet" href="{{ base_url | href }}assets/main.css">
  {% for style in styles %}<link rel="stylesheet" href="{{ style | href }}">
  {% endfor %}
</head>
<body>
  <section class="section">
    <div class="container">
      {% block content %}{% endblock %}
    </div>
  </section>
  {% if live_reload %}<script src="{{ live_reload | href }}"></script>{% endif %}
</body>
</html>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<main class="home">
  <div class="prose">
    <h1>{{ heading }}</h1>
    {{ intro_html | safe }}
  </div>

  <div class="hero-actions">
    {% if deploy_url %}
    <a class="deploy" href="{{ deploy_url | href }}">
      <img src="https://vercel.com/button" alt="Deploy with Vercel" width="105" height="33">
    </a>
    {% endif %}
    {% if badges %}
    <ul class="badges">
      {% for badge in badges %}<li class="badge">{{ badge }}</li>{% endfor %}
    </ul>
    {% endif %}
  </div>

  <nav class="cards" aria-label="Store navigation">
    {% for entry in nav %}{% include "card.html" %}{% endfor %}
  </nav>
</main>
{% endblock %}"##;

const CARD_TEMPLATE: &str = r##"<a class="card{% if not entry.is_configured %} card-disabled{% endif %}" href="{{ entry.href | href }}"{% if entry.is_external %} rel="noopener"{% endif %}{% if not entry.is_configured %} aria-disabled="true"{% endif %} data-icon="{{ entry.icon }}">
      <span class="icon icon-{{ entry.icon }}" aria-hidden="true"></span>
      <span class="card-label">
        {{ entry.label }}
        <span class="card-description">{{ entry.description }}</span>
      </span>
    </a>
    "##;

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig::new(
            "https://next-woo.com",
            "next-woo",
            "Headless WooCommerce store powered by Next.js",
        )
        .unwrap()
    }

    fn render(account_base_url: Option<&str>) -> String {
        let engine = TemplateEngine::new().unwrap();
        let context = HomeContext::new(&site(), &HomeContent::default(), account_base_url, "/");
        engine.render_home(&context).unwrap()
    }

    #[test]
    fn renders_site_metadata() {
        let html = render(Some("https://shop.example.com"));

        assert!(html.contains("<title>next-woo</title>"));
        assert!(html.contains(
            r#"<meta name="description" content="Headless WooCommerce store powered by Next.js">"#
        ));
        assert!(html.contains(r#"<link rel="canonical" href="https://next-woo.com/">"#));
    }

    #[test]
    fn renders_cards_in_order() {
        let html = render(Some("https://shop.example.com"));

        let positions: Vec<usize> = [
            r#"href="/shop""#,
            r#"href="/cart""#,
            r#"href="/checkout""#,
            r#"href="https://shop.example.com/my-account" rel="noopener""#,
            r#"href="/posts/categories""#,
            r#"href="/posts""#,
            r#"href="/pages""#,
            r#"href="https://github.com/brijr/next-woo" rel="noopener""#,
        ]
        .iter()
        .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn marks_external_cards() {
        let html = render(Some("https://shop.example.com"));

        assert!(html.contains(r#"href="https://github.com/brijr/next-woo" rel="noopener""#));
        assert!(!html.contains(r#"href="/shop" rel="noopener""#));
    }

    #[test]
    fn disables_account_card_without_base_url() {
        let html = render(None);

        assert!(html.contains(r##"href="#account-unavailable" aria-disabled="true""##));
        assert!(!html.contains("undefined"));
        assert!(!html.contains("/my-account"));
    }

    #[test]
    fn renders_intro_markdown() {
        let html = render(None);

        assert!(html.contains("<h1>Headless WooCommerce with Next.js</h1>"));
        assert!(html.contains(r#"<a href="https://ui.shadcn.com">shadcn/ui</a>"#));
    }

    #[test]
    fn escapes_ampersands_in_deploy_link() {
        let html = render(None);

        assert!(html.contains("repository-url=https%3A%2F%2Fgithub.com%2Fbrijr%2Fnext-woo&amp;env="));
    }

    #[test]
    fn hides_deploy_button_when_unset() {
        let engine = TemplateEngine::new().unwrap();
        let content = HomeContent {
            deploy_url: None,
            ..HomeContent::default()
        };
        let context = HomeContext::new(&site(), &content, None, "/");
        let html = engine.render_home(&context).unwrap();

        assert!(!html.contains("Deploy with Vercel"));
    }

    #[test]
    fn includes_styles_and_live_reload() {
        let engine = TemplateEngine::new().unwrap();
        let context = HomeContext::new(&site(), &HomeContent::default(), None, "/")
            .with_styles(vec!["/assets/theme.css".to_string()])
            .with_live_reload("/__reload.js");
        let html = engine.render_home(&context).unwrap();

        assert!(html.contains(r#"<link rel="stylesheet" href="/assets/theme.css">"#));
        assert!(html.contains(r#"<script src="/__reload.js"></script>"#));
    }

    #[test]
    fn escapes_site_text() {
        let engine = TemplateEngine::new().unwrap();
        let site = SiteConfig::new("https://a.test", "A <b> store", "Fish & chips").unwrap();
        let context = HomeContext::new(&site, &HomeContent::default(), None, "/");
        let html = engine.render_home(&context).unwrap();

        assert!(html.contains("<title>A &lt;b&gt; store</title>"));
        assert!(html.contains("Fish &amp; chips"));
    }

    #[test]
    fn renders_markdown() {
        let html = render_markdown("# Hello\n\nWorld");

        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }
}
