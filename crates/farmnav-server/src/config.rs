//! Server configuration from flags and environment variables.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Farm Navigator backend")]
pub struct ServerConfig {
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// JSON file for leaderboard persistence. Unset keeps scores in memory.
    #[arg(long, env = "LEADERBOARD_DB")]
    pub leaderboard_db: Option<PathBuf>,

    /// Front-end files served for any path not under /api.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,
}
