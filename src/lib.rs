//! picdex: a self-hosted image gallery.
//!
//! A depth-first scanner indexes a picture folder into a SQLite catalog, and
//! an axum server renders the catalog as browsable HTML pages.

pub mod app;
pub mod config;
pub mod error;
pub mod gallery;
pub mod image_loader;
pub mod models;
pub mod scanner;
pub mod server;
