use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::gallery::GalleryService;
use crate::models::Catalog;
use crate::scanner::FileScanner;
use crate::server::{self, AppState};

pub struct GalleryApp {
    config: Arc<Config>,
}

impl GalleryApp {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Opens the catalog, runs the startup scan and serves until shutdown.
    pub async fn run(self) -> Result<()> {
        let catalog = Catalog::open(&self.config.database)
            .with_context(|| format!("Failed to open catalog {:?}", self.config.database))?;

        let scanner = FileScanner::with_config(self.config.scan_config());
        let gallery = GalleryService::new(self.config.root.clone(), catalog, scanner);

        if !self.config.no_initial_scan {
            match gallery.rescan().await {
                Ok(result) => info!(
                    "Startup scan found {} images in {} directories",
                    result.images.len(),
                    result.directories.len()
                ),
                Err(e) if e.is_fatal() => bail!("Startup scan aborted: {e}"),
                Err(e) => warn!("Startup scan failed, serving existing catalog: {}", e),
            }
        }

        server::serve(AppState {
            gallery,
            config: self.config,
        })
        .await
    }
}
