//! HTTP surface of the gallery.
//!
//! Pages are rendered server-side; picture files and the stylesheet are
//! served straight from disk.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::config::Config;
use crate::gallery::GalleryService;

mod pages;
mod routes;

#[derive(Clone)]
pub struct AppState {
    pub gallery: GalleryService,
    pub config: Arc<Config>,
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    let pictures = ServeDir::new(state.gallery.root());
    let stylesheet = ServeFile::new(&state.config.stylesheet);

    Router::new()
        .route("/", get(routes::index))
        .route("/gallery", get(routes::gallery_root))
        .route("/gallery/*dir", get(routes::gallery_dir))
        .route("/upload", get(routes::upload))
        .route("/settings", get(routes::settings))
        .route("/pic/*name", get(routes::picture))
        .route("/rescan", post(routes::rescan))
        .route_service("/output.css", stylesheet)
        .nest_service("/pictures", pictures)
        .fallback(routes::not_found)
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running at http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::fs::{self, File};
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    use crate::models::Catalog;
    use crate::scanner::FileScanner;

    struct Fixture {
        _dir: TempDir,
        state: AppState,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let root = dir.path().join("pictures");
        fs::create_dir_all(root.join("sub dir")).unwrap();
        image::RgbImage::new(4, 3).save(root.join("a.png")).unwrap();
        File::create(root.join("sub dir").join("b.jpg")).unwrap();
        File::create(root.join("notes.txt")).unwrap();

        let stylesheet = dir.path().join("output.css");
        fs::write(&stylesheet, "body { margin: 0; }").unwrap();

        let state = state_for(root, stylesheet);
        Fixture { _dir: dir, state }
    }

    fn state_for(root: PathBuf, stylesheet: PathBuf) -> AppState {
        let config = Config {
            root: root.clone(),
            stylesheet,
            ..Config::default()
        };
        let gallery =
            GalleryService::new(root, Catalog::open_in_memory().unwrap(), FileScanner::new());
        AppState {
            gallery,
            config: Arc::new(config),
        }
    }

    async fn send(state: &AppState, method: &str, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_static_pages_render() {
        let fx = fixture();
        for uri in ["/", "/upload", "/settings"] {
            let (status, body) = send(&fx.state, "GET", uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(body.contains("/output.css"), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_rescan_then_gallery() {
        let fx = fixture();

        let (status, body) = send(&fx.state, "POST", "/rescan").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (status, body) = send(&fx.state, "GET", "/gallery").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/pictures/a.png"));
        assert!(body.contains("/gallery/sub%20dir"));
        assert!(!body.contains("notes.txt"));
        assert!(!body.contains("b.jpg"));

        let (status, body) = send(&fx.state, "GET", "/gallery/sub%20dir").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/pictures/sub%20dir/b.jpg"));
        assert!(!body.contains("a.png"));
    }

    #[tokio::test]
    async fn test_rescan_missing_root_is_bad_request() {
        let dir = tempdir().unwrap();
        let state = state_for(dir.path().join("missing"), dir.path().join("output.css"));

        let (status, body) = send(&state, "POST", "/rescan").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_rescan_file_root_is_bad_request() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("pictures");
        std::fs::File::create(&root).unwrap();
        let state = state_for(root, dir.path().join("output.css"));

        let (status, body) = send(&state, "POST", "/rescan").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_rescan_requires_post() {
        let fx = fixture();
        let (status, _) = send(&fx.state, "GET", "/rescan").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_picture_page_shows_dimensions() {
        let fx = fixture();
        let (status, body) = send(&fx.state, "GET", "/pic/a.png").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/pictures/a.png"));
        assert!(body.contains("4 × 3"));
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let fx = fixture();
        let (status, _) = send(&fx.state, "GET", "/pic/..%2Fsecret.png").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&fx.state, "GET", "/gallery/sub%20dir/..").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_static_files() {
        let fx = fixture();

        let (status, body) = send(&fx.state, "GET", "/output.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("margin"));

        let (status, _) = send(&fx.state, "GET", "/pictures/a.png").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&fx.state, "GET", "/pictures/missing.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let fx = fixture();
        let (status, body) = send(&fx.state, "GET", "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Not found"));
    }
}
