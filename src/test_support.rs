//! In-process HTTP server for exercising the HTTP side of the crate

use axum::Router;
use std::net::SocketAddr;

/// Serve `app` on an ephemeral local port; returns the base URL
///
/// The server runs until the test runtime shuts down.
pub(crate) async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://127.0.0.1:{}", addr.port())
}

/// Value of the `Cookie` request header, empty when absent
pub(crate) fn cookie_header(headers: &axum::http::HeaderMap) -> String {
    headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
