//! Recursive directory scanner that feeds the catalog.
//!
//! This module provides the `FileScanner` struct which handles:
//! - Depth-first directory walking using walkdir, in file-name order
//! - Image detection by file extension, hidden entries skipped
//! - Recording every image and subdirectory through an [`EntrySink`] as it is found
//! - Skipping unreadable subtrees without failing the whole scan

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task;
use tracing::{debug, info, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{CatalogError, ScanError};
use crate::models::{catalog_path, Catalog, Entry, EntryKind};

/// Configuration for the file scanner.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

/// Receives each classified entry while the walk is in progress.
pub trait EntrySink {
    /// Records an entry. Returns `true` if it was not already known.
    fn record(&mut self, entry: &Entry) -> Result<bool, CatalogError>;
}

impl EntrySink for Catalog {
    fn record(&mut self, entry: &Entry) -> Result<bool, CatalogError> {
        self.upsert_entry(entry)
    }
}

/// Takes the catalog lock once per entry, so queries run between writes
/// instead of waiting for the whole walk.
impl EntrySink for Arc<Mutex<Catalog>> {
    fn record(&mut self, entry: &Entry) -> Result<bool, CatalogError> {
        self.lock().record(entry)
    }
}

#[cfg(test)]
impl EntrySink for Vec<Entry> {
    fn record(&mut self, entry: &Entry) -> Result<bool, CatalogError> {
        if self.contains(entry) {
            return Ok(false);
        }
        self.push(entry.clone());
        Ok(true)
    }
}

/// Result of a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Images in walk order.
    pub images: Vec<Entry>,
    /// Directories in walk order.
    pub directories: Vec<Entry>,
    /// Entries the sink had not seen before.
    pub inserted: usize,
    /// Subtrees (or entries) skipped because they could not be read.
    pub skipped: usize,
}

impl ScanResult {
    pub fn total(&self) -> usize {
        self.images.len() + self.directories.len()
    }
}

/// Depth-first scanner for an image tree.
#[derive(Debug, Clone, Default)]
pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    /// Creates a new file scanner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new file scanner with custom configuration.
    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scans `root` on the blocking pool, recording into the shared catalog.
    pub async fn scan_catalog(
        &self,
        root: PathBuf,
        catalog: Arc<Mutex<Catalog>>,
    ) -> Result<ScanResult, ScanError> {
        let scanner = self.clone();

        task::spawn_blocking(move || {
            let mut catalog = catalog;
            scanner.scan(&root, &mut catalog)
        })
        .await?
    }

    /// Walks `root` depth-first and records every image and subdirectory.
    ///
    /// Errors reading anything below the root are logged and skipped. A failure
    /// to read the root itself, or any sink failure, ends the scan.
    pub fn scan<S: EntrySink>(&self, root: &Path, sink: &mut S) -> Result<ScanResult, ScanError> {
        info!("Starting scan of {:?}", root);

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();
        if self.config.max_depth > 0 {
            walker = walker.max_depth(self.config.max_depth);
        }

        let follow_symlinks = self.config.follow_symlinks;
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let entries = walker.into_iter().filter_entry(move |entry| {
            if entry.depth() > 0 && is_hidden(entry) {
                trace!("Skipping hidden entry {:?}", entry.path());
                return false;
            }
            !follow_symlinks || !entry.file_type().is_dir() || first_visit(&mut visited, entry)
        });

        let mut result = ScanResult::default();

        for item in entries {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(ScanError::Root {
                        path: root.to_path_buf(),
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(path = ?err.path(), error = %err, "Skipping unreadable entry");
                    result.skipped += 1;
                    continue;
                }
            };

            // The root itself is not an entry of the catalog.
            if entry.depth() == 0 {
                if !entry.path().is_dir() {
                    return Err(ScanError::NotADirectory {
                        path: root.to_path_buf(),
                    });
                }
                continue;
            }

            let Some(classified) = classify(&entry) else {
                trace!("Ignoring {:?}", entry.path());
                continue;
            };

            if sink.record(&classified)? {
                result.inserted += 1;
            }
            trace!(path = %classified.path, name = %classified.name, "Recorded entry");

            match classified.kind {
                EntryKind::Image => result.images.push(classified),
                EntryKind::Directory => result.directories.push(classified),
            }
        }

        info!(
            "Scan complete: {} images, {} directories, {} new, {} skipped",
            result.images.len(),
            result.directories.len(),
            result.inserted,
            result.skipped
        );

        Ok(result)
    }
}

/// Turns a walked entry into a catalog entry, or `None` if it is not tracked.
fn classify(entry: &DirEntry) -> Option<Entry> {
    let name = entry.file_name().to_string_lossy().into_owned();
    let kind = if entry.file_type().is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::from_file_name(&name)?
    };

    let parent = entry.path().parent().unwrap_or_else(|| Path::new(""));
    Some(Entry {
        name,
        path: catalog_path(parent),
        kind,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}

/// Returns false if the directory's real path was already walked.
fn first_visit(visited: &mut HashSet<PathBuf>, entry: &DirEntry) -> bool {
    match entry.path().canonicalize() {
        Ok(real) => {
            let first = visited.insert(real);
            if !first {
                debug!("Skipping already visited directory {:?}", entry.path());
            }
            first
        }
        // Let walkdir report the failure when it tries to read the directory.
        Err(_) => true,
    }
}
