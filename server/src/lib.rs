//! Static asset server for the reminders app.
//!
//! The app keeps all reminder state in the browser, so the server only hands
//! out the built assets and answers `GET /hello`, which echoes the requested
//! URL and is used as a liveness probe.

pub mod config;

use axum::{
    extract::OriginalUri,
    http::{header, HeaderMap, Uri},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub use config::{ConfigError, ServerConfig};

pub fn app(config: &ServerConfig) -> Router {
    let assets = ServeDir::new(&config.static_dir).append_index_html_on_directories(true);
    Router::new()
        .route("/hello", get(hello))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, config: &ServerConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

async fn hello(headers: HeaderMap, OriginalUri(uri): OriginalUri) -> String {
    let url = requested_url(&headers, &uri);
    debug!(%url, "hello");
    format!("Hello from reminders! You requested: {url}")
}

/// Absolute URL when the client sent a `Host` header, the bare path otherwise.
fn requested_url(headers: &HeaderMap, uri: &Uri) -> String {
    if uri.scheme().is_some() {
        return uri.to_string();
    }
    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}{uri}"),
        None => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn requested_url_uses_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:8000"));
        let uri: Uri = "/hello?name=x".parse().unwrap();
        assert_eq!(
            requested_url(&headers, &uri),
            "http://localhost:8000/hello?name=x"
        );
    }

    #[test]
    fn requested_url_without_host_is_the_path() {
        let uri: Uri = "/hello".parse().unwrap();
        assert_eq!(requested_url(&HeaderMap::new(), &uri), "/hello");
    }

    #[test]
    fn absolute_request_uri_is_kept() {
        let uri: Uri = "http://example.com/hello".parse().unwrap();
        assert_eq!(
            requested_url(&HeaderMap::new(), &uri),
            "http://example.com/hello"
        );
    }
}
