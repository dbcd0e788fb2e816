//! Typed URL joining for links built from configured base URLs.

use url::Url;

/// Errors that can occur when validating or joining a base URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlJoinError {
    #[error("Base URL is empty")]
    Empty,

    #[error("Invalid URL '{value}': {message}")]
    Invalid { value: String, message: String },

    #[error("Unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Base URL must not carry a query or fragment: {0}")]
    QueryOrFragment(String),
}

/// Parse an absolute `http`/`https` URL with a host.
///
/// Surrounding whitespace is ignored.
pub fn parse_absolute_url(value: &str) -> Result<Url, UrlJoinError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UrlJoinError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlJoinError::Invalid {
        value: trimmed.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlJoinError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlJoinError::MissingHost(trimmed.to_string()));
    }

    Ok(url)
}

/// Parse a base URL that paths can be appended to.
///
/// Same rules as [`parse_absolute_url`], and the URL must not carry a query
/// string or fragment since appended segments would otherwise land inside
/// them.
pub fn parse_base_url(value: &str) -> Result<Url, UrlJoinError> {
    let url = parse_absolute_url(value)?;

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlJoinError::QueryOrFragment(value.trim().to_string()));
    }

    Ok(url)
}

/// Append the `/`-separated segments of `suffix` to the path of `base`.
///
/// A trailing slash on the base is not doubled and empty segments in the
/// suffix are dropped.
pub fn append_path(base: &Url, suffix: &str) -> Result<Url, UrlJoinError> {
    let mut url = base.clone();

    {
        let mut segments = url.path_segments_mut().map_err(|()| UrlJoinError::Invalid {
            value: base.to_string(),
            message: "URL cannot be a base".to_string(),
        })?;
        segments.pop_if_empty();
        segments.extend(suffix.split('/').filter(|s| !s.is_empty()));
    }

    Ok(url)
}

/// Join a base URL with a path suffix.
///
/// The base path is kept and the suffix segments are appended after it, so
/// `https://shop.test/wp` joined with `/my-account` yields
/// `https://shop.test/wp/my-account`.
pub fn join_url(base: &str, suffix: &str) -> Result<Url, UrlJoinError> {
    append_path(&parse_base_url(base)?, suffix)
}

/// Whether `path` is a site-relative route such as `/shop`.
///
/// Protocol-relative references (`//host/path`) are not internal.
pub fn is_internal_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}
