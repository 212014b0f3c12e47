//! Filesystem scanning for the gallery catalog.

pub mod file_scanner;

pub use file_scanner::{EntrySink, FileScanner, ScanConfig, ScanResult};
