//! SQLite-backed catalog of discovered images and directories.
//!
//! The catalog holds one row per filesystem entry found by a scan, keyed by
//! the catalog path of its containing directory and its name. Rows are only
//! ever inserted; a rescan of an unchanged tree is a no-op.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::models::{Entry, EntryKind, Listing};

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Persistent index of scanned entries.
pub struct Catalog {
    conn: Connection,
}

/// Row counts and on-disk size, shown on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub images: i64,
    pub directories: i64,
    pub db_size_bytes: i64,
}

impl Catalog {
    /// Opens or creates the catalog database at the specified path.
    ///
    /// Configures SQLite with:
    /// - journal_mode = WAL
    /// - synchronous = NORMAL
    /// - temp_store = MEMORY
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CatalogError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let catalog = Self { conn };
        catalog.create_tables()?;

        info!("Opened catalog at {:?}", path);
        Ok(catalog)
    }

    /// Opens a throwaway catalog that lives only as long as the connection.
    pub fn open_in_memory() -> Result<Self> {
        let catalog = Self {
            conn: Connection::open_in_memory()?,
        };
        catalog.create_tables()?;
        Ok(catalog)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pictures (
                id INTEGER PRIMARY KEY,
                path TEXT NOT NULL,
                name TEXT NOT NULL,
                is_directory INTEGER NOT NULL DEFAULT 0,
                UNIQUE(path, name)
            );
            ",
        )?;

        debug!("Catalog tables created/verified");
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts an entry unless a row with the same `(path, name)` exists.
    ///
    /// Returns `true` if a new row was written. Only the uniqueness conflict is
    /// swallowed; any other failure is returned.
    pub fn upsert_entry(&self, entry: &Entry) -> Result<bool> {
        let inserted = self
            .conn
            .prepare_cached(
                "
            INSERT INTO pictures (path, name, is_directory)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(path, name) DO NOTHING
            ",
            )?
            .execute(params![entry.path, entry.name, entry.is_directory()])?;

        Ok(inserted > 0)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists entries recorded directly under `path` (exact match, not prefix).
    pub fn list(&self, path: &str) -> Result<Listing> {
        let mut stmt = self.conn.prepare_cached(
            "
            SELECT path, name, is_directory
            FROM pictures
            WHERE path = ?1
            ORDER BY name
            ",
        )?;

        let rows = stmt
            .query_map(params![path], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let (directories, images): (Vec<Entry>, Vec<Entry>) =
            rows.into_iter().partition(Entry::is_directory);
        Ok(Listing {
            images,
            directories,
        })
    }

    pub fn stats(&self) -> Result<CatalogStats> {
        let (images, directories): (i64, i64) = self.conn.query_row(
            "
            SELECT
                COALESCE(SUM(is_directory = 0), 0),
                COALESCE(SUM(is_directory = 1), 0)
            FROM pictures
            ",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let page_count: i64 = self.conn.query_row("PRAGMA page_count", [], |r| r.get(0))?;
        let page_size: i64 = self.conn.query_row("PRAGMA page_size", [], |r| r.get(0))?;

        Ok(CatalogStats {
            images,
            directories,
            db_size_bytes: page_count * page_size,
        })
    }
}

#[cfg(test)]
impl Catalog {
    /// Returns true if the exact `(path, name)` row exists.
    fn contains(&self, path: &str, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pictures WHERE path = ?1 AND name = ?2",
            params![path, name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Returns the total number of rows.
    pub(crate) fn count_entries(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pictures", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    let is_directory: bool = row.get(2)?;
    Ok(Entry {
        path: row.get(0)?,
        name: row.get(1)?,
        kind: if is_directory {
            EntryKind::Directory
        } else {
            EntryKind::Image
        },
    })
}
