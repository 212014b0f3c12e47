use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::scanner::ScanConfig;

pub const DEFAULT_ROOT: &str = "./pictures";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE: &str = "pictures.db";
pub const DEFAULT_STYLESHEET: &str = "./templates/output.css";

#[derive(Parser, Debug, Clone)]
#[command(name = "picdex", about = "Self-hosted image gallery", version)]
pub struct Config {
    /// Directory tree to scan for images
    #[arg(long, env = "PICDEX_ROOT", default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Port to listen on
    #[arg(long, env = "PICDEX_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "PICDEX_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// SQLite catalog file
    #[arg(long, env = "PICDEX_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Stylesheet served at /output.css
    #[arg(long, env = "PICDEX_STYLESHEET", default_value = DEFAULT_STYLESHEET)]
    pub stylesheet: PathBuf,

    /// Follow symbolic links while scanning
    #[arg(long, env = "PICDEX_FOLLOW_SYMLINKS")]
    pub follow_symlinks: bool,

    /// Maximum scan depth (0 = unlimited)
    #[arg(long, env = "PICDEX_MAX_DEPTH", default_value_t = 0)]
    pub max_depth: usize,

    /// Skip the scan that normally runs before the server starts
    #[arg(long)]
    pub no_initial_scan: bool,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            max_depth: self.max_depth,
            follow_symlinks: self.follow_symlinks,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            database: PathBuf::from(DEFAULT_DATABASE),
            stylesheet: PathBuf::from(DEFAULT_STYLESHEET),
            follow_symlinks: false,
            max_depth: 0,
            no_initial_scan: false,
        }
    }
}
