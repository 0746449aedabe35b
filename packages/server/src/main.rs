#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the site map API server.

use std::path::PathBuf;

use clap::Parser;

/// Site map API server.
#[derive(Parser)]
#[command(name = "site_map_server", about = "Site map API server")]
struct Cli {
    /// Prompt for configuration instead of reading environment variables
    #[arg(long)]
    interactive: bool,
    /// Bind address (overrides `BIND_ADDR`)
    #[arg(long)]
    bind: Option<String>,
    /// Port (overrides `PORT`)
    #[arg(long)]
    port: Option<u16>,
    /// Path to a seed TOML file (overrides `SITE_MAP_SEED`)
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // SAFETY: We are single-threaded at this point (before server starts)
    // and these variables are only read once during server initialisation.
    unsafe {
        if let Some(bind) = &cli.bind {
            std::env::set_var("BIND_ADDR", bind);
        }
        if let Some(port) = cli.port {
            std::env::set_var("PORT", port.to_string());
        }
        if let Some(seed) = &cli.seed {
            std::env::set_var("SITE_MAP_SEED", seed);
        }
    }

    if cli.interactive {
        site_map_server::interactive::run().await
    } else {
        site_map_server::run_server().await
    }
}
