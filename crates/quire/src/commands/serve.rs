//! Preview server command.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use super::raw::read_raw;

/// Run the serve command.
pub async fn run(port: u16, dir: PathBuf, open: bool) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'quire build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    if open {
        let url = format!("http://{}", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, router(dir)).await?;

    Ok(())
}

fn router(dir: PathBuf) -> Router {
    Router::new()
        .route("/raw/{*path}", get(raw_handler))
        .fallback_service(ServeDir::new(&dir))
        .with_state(Arc::new(dir))
}

/// Serve a page's raw source as markdown.
async fn raw_handler(State(dir): State<Arc<PathBuf>>, Path(path): Path<String>) -> Response {
    match read_raw(&dir, &path) {
        Ok(Some(bytes)) => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::warn!("Failed to serve raw source for {}: {:#}", path, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
