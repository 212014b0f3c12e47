use axum::extract::{Path, State};
use axum::http::StatusCode;
use maud::Markup;
use tokio::task;
use tracing::{debug, error, info, warn};

use super::pages::{self, Item, Settings};
use super::AppState;
use crate::image_loader;
use crate::models::Entry;

pub(super) async fn index() -> Markup {
    pages::index()
}

pub(super) async fn gallery_root(State(state): State<AppState>) -> Markup {
    render_gallery(&state, "").await
}

pub(super) async fn gallery_dir(
    State(state): State<AppState>,
    Path(dir): Path<String>,
) -> Result<Markup, StatusCode> {
    let dir = dir.trim_matches('/');
    if !is_safe_relative_path(dir) {
        warn!("Rejected gallery path {:?}", dir);
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(render_gallery(&state, dir).await)
}

async fn render_gallery(state: &AppState, dir: &str) -> Markup {
    let listing = state.gallery.list(dir).await;
    if listing.is_empty() {
        debug!("No catalog entries under {:?}", dir);
    }
    let to_item = |entry: &Entry| Item {
        name: entry.name.clone(),
        path: state.gallery.relative_path(entry),
    };

    let directories: Vec<Item> = listing.directories.iter().map(to_item).collect();
    let images: Vec<Item> = listing.images.iter().map(to_item).collect();
    pages::gallery(dir, &directories, &images)
}

pub(super) async fn picture(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Markup, StatusCode> {
    let name = name.trim_matches('/').to_string();
    if name.is_empty() || !is_safe_relative_path(&name) {
        warn!("Rejected picture path {:?}", name);
        return Err(StatusCode::BAD_REQUEST);
    }

    let path = state.gallery.resolve(&name);
    let dimensions = task::spawn_blocking(move || image_loader::read_dimensions(&path).ok())
        .await
        .ok()
        .flatten();

    Ok(pages::picture(&name, dimensions))
}

pub(super) async fn upload(State(state): State<AppState>) -> Markup {
    pages::upload(&state.config.root)
}

pub(super) async fn settings(State(state): State<AppState>) -> Markup {
    let stats = state.gallery.stats().await;
    pages::settings(&Settings {
        config: &state.config,
        stats,
    })
}

pub(super) async fn rescan(State(state): State<AppState>) -> StatusCode {
    match state.gallery.rescan().await {
        Ok(result) => {
            info!(
                entries = result.total(),
                new = result.inserted,
                skipped = result.skipped,
                "Rescan finished"
            );
            StatusCode::OK
        }
        Err(e) if e.is_fatal() => {
            error!("Could not write to the catalog, exiting: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            warn!("Could not reload: {}", e);
            StatusCode::BAD_REQUEST
        }
    }
}

pub(super) async fn not_found() -> (StatusCode, Markup) {
    (StatusCode::NOT_FOUND, pages::not_found())
}

/// Rejects `..` segments, backslashes and NUL bytes in a root-relative path.
///
/// Axum percent-decodes path parameters, so `%2E%2E` arrives here as `..`.
fn is_safe_relative_path(path: &str) -> bool {
    path.split('/')
        .all(|segment| segment != ".." && !segment.contains('\\') && !segment.contains('\0'))
}
