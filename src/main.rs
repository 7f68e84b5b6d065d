use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use labscan_rs::config::Config;
use labscan_rs::server::{self, AppState};

/// labscan-rs — web-triggered nmap scan of a single pre-configured lab target.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "labscan-rs",
    version,
    about = "Web-triggered nmap scan of a single pre-configured lab target.",
    long_about = None
)]
struct Cli {
    /// Lab host to scan. Fixed for the life of the process.
    #[arg(long, env = "LAB_TARGET", default_value = "10.0.0.5")]
    target: String,

    /// Address to serve the web UI on.
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: String,

    /// Name or path of the nmap binary to invoke.
    #[arg(long = "nmap-path", env = "NMAP_PATH", default_value = "nmap")]
    nmap_path: String,

    /// Hard deadline for one scan run, in seconds.
    #[arg(long = "scan-timeout-secs", default_value_t = 120)]
    scan_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("labscan-rs configuration:");
    println!("  target       : {}", cli.target);
    println!("  bind         : {}", cli.bind);
    println!("  nmap_path    : {}", cli.nmap_path);
    println!("  scan_timeout : {}s", cli.scan_timeout_secs);

    let config = Config::new(
        cli.target,
        cli.nmap_path,
        Duration::from_secs(cli.scan_timeout_secs),
    );

    server::serve(&cli.bind, AppState::new(config)).await
}
