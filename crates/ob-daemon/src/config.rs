//! Process configuration for ob-daemon.
//!
//! Every flag has an environment fallback so the daemon can run unattended
//! (e.g. from a `.env.local` loaded by `main`).

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "ob-daemon")]
#[command(about = "Shared real-time order board server", long_about = None)]
pub struct DaemonConfig {
    /// Listen address for HTTP, WebSocket and SSE.
    #[arg(long, env = "OB_DAEMON_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Directory of static client assets (tablet and display UI).
    #[arg(long, env = "OB_PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Snapshots buffered per subscriber before a slow client starts skipping.
    #[arg(
        long,
        env = "OB_BUS_CAPACITY",
        default_value_t = 64,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub bus_capacity: u16,

    /// Allowed CORS origins for the HTTP API (repeatable or comma-separated).
    #[arg(
        long = "cors-origin",
        env = "OB_CORS_ORIGINS",
        value_delimiter = ',',
        default_values = [
            "http://localhost",
            "http://127.0.0.1",
            "http://localhost:3000",
            "http://127.0.0.1:3000",
        ]
    )]
    pub cors_origins: Vec<String>,
}
