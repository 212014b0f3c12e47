//! Gallery service: the seam between HTTP handlers and the scanner/catalog.
//!
//! Handlers never hold gallery state of their own. Every page asks the
//! catalog again, so a rescan is visible on the next request. The catalog
//! lock is only taken per query or per recorded entry, so pages keep loading
//! while a rescan is running.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task;
use tracing::{error, info};

use crate::error::{CatalogError, ScanError};
use crate::models::{
    catalog_path, join_catalog_path, relative_catalog_path, Catalog, CatalogStats, Entry, Listing,
};
use crate::scanner::{FileScanner, ScanResult};

#[derive(Clone)]
pub struct GalleryService {
    root: PathBuf,
    root_key: String,
    catalog: Arc<Mutex<Catalog>>,
    scanner: FileScanner,
    scan_guard: Arc<tokio::sync::Mutex<()>>,
}

impl GalleryService {
    pub fn new(root: PathBuf, catalog: Catalog, scanner: FileScanner) -> Self {
        let root_key = catalog_path(&root);
        Self {
            root,
            root_key,
            catalog: Arc::new(Mutex::new(catalog)),
            scanner,
            scan_guard: Arc::default(),
        }
    }

    /// Directory served as the gallery root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Re-scans the whole root. Resolves once the walk has finished.
    ///
    /// Concurrent calls run one after another.
    pub async fn rescan(&self) -> Result<ScanResult, ScanError> {
        let _guard = self.scan_guard.lock().await;
        info!("Rescanning {:?}", self.root);
        self.scanner
            .scan_catalog(self.root.clone(), Arc::clone(&self.catalog))
            .await
    }

    /// Lists one directory, given relative to the root (`""` for the root).
    ///
    /// Query failures are logged and show up as an empty listing.
    pub async fn list(&self, dir: &str) -> Listing {
        let key = join_catalog_path(&self.root_key, dir);
        match self.with_catalog(move |catalog| catalog.list(&key)).await {
            Ok(listing) => listing,
            Err(e) => {
                error!("Error while loading pictures for {:?}: {}", dir, e);
                Listing::default()
            }
        }
    }

    pub async fn stats(&self) -> Option<CatalogStats> {
        match self.with_catalog(|catalog| catalog.stats()).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                error!("Error while reading catalog stats: {}", e);
                None
            }
        }
    }

    /// Root-relative path of an entry, as used in page and file URLs.
    pub fn relative_path(&self, entry: &Entry) -> String {
        let full = entry.full_path();
        relative_catalog_path(&self.root_key, &full)
            .unwrap_or(&full)
            .to_string()
    }

    /// Filesystem location of a root-relative path.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    async fn with_catalog<T, F>(&self, f: F) -> Result<T, CatalogError>
    where
        T: Send + 'static,
        F: FnOnce(&Catalog) -> Result<T, CatalogError> + Send + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        task::spawn_blocking(move || f(&catalog.lock())).await?
    }
}
