//! Development server with live reload for the storefront.
//!
//! Renders the home page on every request from the loaded configuration,
//! serves the stylesheets, and pushes reload messages to open browsers when
//! watched files change.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};
