//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path as RoutePath, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use storefront_site::SiteConfig;
use storefront_static::{AssetPipeline, HomeContent, HomeContext, TemplateEngine};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

const RELOAD_SOCKET_PATH: &str = "/__reload";
const RELOAD_SCRIPT_PATH: &str = "/__reload.js";

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site identity
    pub site: SiteConfig,

    /// Home page copy
    pub content: HomeContent,

    /// WordPress base URL for the account link
    pub account_base_url: Option<String>,

    /// Extra stylesheets served under `/assets/`
    pub styles: Vec<PathBuf>,

    /// Files and directories to watch for changes
    pub watch_paths: Vec<PathBuf>,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl DevServerConfig {
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            content: HomeContent::default(),
            account_base_url: None,
            styles: vec![],
            watch_paths: vec![],
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Template error: {0}")]
    TemplateError(String),
}

/// Shared server state. Read-only once the server is running.
struct ServerState {
    config: DevServerConfig,
    templates: TemplateEngine,
    reload: ReloadHub,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let state = Arc::new(ServerState::new(self.config.clone())?);

        let (watcher, mut rx) = FileWatcher::new(&self.config.watch_paths)
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone.reload, event);
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state);

        tracing::info!("Starting dev server at http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

impl ServerState {
    fn new(config: DevServerConfig) -> Result<Self, ServerError> {
        let templates =
            TemplateEngine::new().map_err(|e| ServerError::TemplateError(e.to_string()))?;

        Ok(Self {
            config,
            templates,
            reload: ReloadHub::new(),
        })
    }

    /// Render the home page for one request.
    fn render_home(&self) -> Result<String, minijinja::Error> {
        let styles = self
            .config
            .styles
            .iter()
            .filter_map(|p| p.file_name().and_then(|f| f.to_str()))
            .map(|name| format!("/assets/{}", name))
            .collect();

        let context = HomeContext::new(
            &self.config.site,
            &self.config.content,
            self.config.account_base_url.as_deref(),
            "/",
        )
        .with_styles(styles)
        .with_live_reload(RELOAD_SCRIPT_PATH);

        self.templates.render_home(&context)
    }

    /// Find a configured stylesheet by file name.
    fn style_path(&self, name: &str) -> Option<&Path> {
        self.config
            .styles
            .iter()
            .find(|p| p.file_name().and_then(|f| f.to_str()) == Some(name))
            .map(PathBuf::as_path)
    }
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/healthz", get(health_handler))
        .route("/assets/{name}", get(asset_handler))
        .route(RELOAD_SOCKET_PATH, get(ws_handler))
        .route(RELOAD_SCRIPT_PATH, get(reload_script_handler))
        .with_state(state)
}

/// Handle file watch events.
fn handle_watch_event(hub: &ReloadHub, event: WatchEvent) {
    match event {
        WatchEvent::StyleModified(path) => {
            tracing::info!(
                clients = hub.subscriber_count(),
                "Stylesheet modified: {}",
                path.display()
            );
            hub.send(ReloadMessage::Reload);
        }

        WatchEvent::ConfigModified(path) => {
            tracing::warn!(
                "{} changed; restart the dev server to apply configuration changes",
                path.display()
            );
            hub.send(ReloadMessage::ConfigChanged {
                path: path.display().to_string(),
            });
        }

        WatchEvent::Created(_) | WatchEvent::Deleted(_) | WatchEvent::Modified(_) => {
            hub.send(ReloadMessage::Reload);
        }
    }
}

/// Handler for the home page.
async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.render_home() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render home page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render home page: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Handler for `/assets/{name}`.
///
/// `main.css` is the built-in stylesheet; other names resolve to configured
/// stylesheets, read from disk on every request.
async fn asset_handler(
    State(state): State<Arc<ServerState>>,
    RoutePath(name): RoutePath<String>,
) -> Response {
    if name == "main.css" {
        return css_response(AssetPipeline::generate_css());
    }

    let Some(path) = state.style_path(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read_to_string(path).await {
        Ok(css) => css_response(css),
        Err(e) => {
            tracing::warn!("Failed to read stylesheet {}: {}", path.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn css_response(css: String) -> Response {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response()
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.reload.subscribe();

    if send_message(&mut socket, &ReloadMessage::Connected)
        .await
        .is_err()
    {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_message(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to serialize reload message: {}", e);
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await
}

/// Handler for the live reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        reload_client_script(RELOAD_SOCKET_PATH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn site() -> SiteConfig {
        SiteConfig::new(
            "https://next-woo.com",
            "next-woo",
            "Headless WooCommerce store powered by Next.js",
        )
        .unwrap()
    }

    fn app(config: DevServerConfig) -> Router {
        router(Arc::new(ServerState::new(config).unwrap()))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn creates_server_with_default_port() {
        let server = DevServer::new(DevServerConfig::new(site()));
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.host, "127.0.0.1");
    }

    #[tokio::test]
    async fn renders_home_with_account_link() {
        let config = DevServerConfig {
            account_base_url: Some("https://mystore.test".to_string()),
            ..DevServerConfig::new(site())
        };

        let (status, body) = get_body(app(config), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="https://mystore.test/my-account""#));
        assert!(body.contains(r#"<script src="/__reload.js"></script>"#));
    }

    #[tokio::test]
    async fn renders_home_without_account_link() {
        let (status, body) = get_body(app(DevServerConfig::new(site())), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r##"href="#account-unavailable""##));
        assert!(!body.contains("undefined"));
    }

    #[tokio::test]
    async fn serves_builtin_and_configured_styles() {
        let temp = tempdir().unwrap();
        let theme = temp.path().join("theme.css");
        fs::write(&theme, ".card { color: red; }").unwrap();

        let config = DevServerConfig {
            styles: vec![theme],
            ..DevServerConfig::new(site())
        };

        let (status, css) = get_body(app(config.clone()), "/assets/main.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(css.contains(".cards"));

        let (status, css) = get_body(app(config.clone()), "/assets/theme.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(css, ".card { color: red; }");

        let (status, _) = get_body(app(config), "/assets/other.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_health_and_reload_script() {
        let (status, body) = get_body(app(DevServerConfig::new(site())), "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");

        let (status, script) = get_body(app(DevServerConfig::new(site())), "/__reload.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(script.contains("'/__reload'"));
    }

    #[test]
    fn forwards_watch_events_to_hub() {
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        handle_watch_event(&hub, WatchEvent::StyleModified(PathBuf::from("theme.css")));
        handle_watch_event(
            &hub,
            WatchEvent::ConfigModified(PathBuf::from("storefront.toml")),
        );

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
        assert_eq!(
            rx.try_recv().unwrap(),
            ReloadMessage::ConfigChanged {
                path: "storefront.toml".to_string()
            }
        );
    }
}
