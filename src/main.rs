//! # TL Scrape API
//!
//! A small JSON API in front of the Throne and Liberty website. It scrapes
//! the public pages on every request and re-exposes the data as JSON.
//!
//! ## Endpoints
//!
//! - `GET /news?q=<category>`: every news teaser across all listing pages,
//!   optionally filtered by category
//! - `GET /server-status?region=<id>`: server states grouped by region
//! - `GET /health`: this API plus upstream reachability
//!
//! ## Usage
//!
//! ```sh
//! tl_scrape_api -c ./tl.yaml -b 127.0.0.1:8000
//! ```
//!
//! ## Architecture
//!
//! Each request is handled independently, with no caching:
//! 1. **Fetching**: one sequential GET per upstream page ([`fetcher`])
//! 2. **Extraction**: CSS selectors turn HTML into typed records ([`scrapers`])
//! 3. **Shaping**: records are serialized as JSON by the handlers ([`server`])

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};

mod cli;
mod config;
mod error;
mod fetcher;
mod health;
mod logging;
mod models;
mod scrapers;
mod server;
mod utils;

use cli::Cli;
use config::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    let settings = Settings::load(args.config.as_deref())?.apply_cli(&args)?;

    tracing::subscriber::set_global_default(logging::subscriber(&settings.log_filter))?;
    info!(version = env!("CARGO_PKG_VERSION"), "tl_scrape_api starting up");
    debug!(?args, ?settings, "Resolved configuration");

    server::serve(&settings).await
}
