//! pagescope - browser perception and automation toolkit.
//!
//! Serves browser tools over stdio JSON-RPC, driving Chrome via CDP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagescope::manager::{BrowserManager, BrowserManagerConfig};
use pagescope::server;
use pagescope::tools::ToolRegistry;

/// pagescope CLI.
#[derive(Parser)]
#[command(name = "pagescope")]
#[command(about = "Browser perception and automation toolkit over CDP")]
#[command(version)]
struct Cli {
    /// Chrome remote-debugging port
    #[arg(long, default_value_t = 9222, env = "PAGESCOPE_DEBUG_PORT")]
    debug_port: u16,

    /// Run Chrome headless
    #[arg(long, env = "PAGESCOPE_HEADLESS")]
    headless: bool,

    /// Viewport width
    #[arg(long, default_value_t = 1280)]
    viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value_t = 720)]
    viewport_height: u32,

    /// Chrome profile directory
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    /// Log filter (tracing EnvFilter syntax)
    #[arg(long, default_value = "info", env = "PAGESCOPE_LOG")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout is the protocol channel; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = BrowserManagerConfig {
        debug_port: cli.debug_port,
        viewport_width: cli.viewport_width,
        viewport_height: cli.viewport_height,
        profile_dir: cli.profile_dir,
        headless: cli.headless,
    };

    let manager = Arc::new(BrowserManager::new(config));
    let registry = ToolRegistry::new(manager.clone());

    info!("Starting pagescope tool server");
    let served = server::serve_stdio(registry).await;

    manager.shutdown_chrome().await.ok();
    served?;
    Ok(())
}
