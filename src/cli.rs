//! Command-line interface definitions for the scraping API server.
//!
//! Flags override values from the settings file; every flag can also be
//! supplied through an environment variable.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the server.
///
/// # Examples
///
/// ```sh
/// # Defaults: listen on 0.0.0.0:8000, scrape the live site
/// tl_scrape_api
///
/// # Custom settings file and listen address
/// tl_scrape_api -c ./tl.yaml -b 127.0.0.1:9000
///
/// # Tighter pagination cap
/// TL_MAX_PAGES=10 tl_scrape_api
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "TL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8000
    #[arg(short, long, env = "TL_BIND")]
    pub bind: Option<String>,

    /// Maximum number of news pages fetched per request
    #[arg(long, env = "TL_MAX_PAGES")]
    pub max_pages: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "tl_scrape_api",
            "--config",
            "./tl.yaml",
            "--bind",
            "127.0.0.1:9000",
            "--max-pages",
            "12",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("./tl.yaml")));
        assert_eq!(cli.bind.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(cli.max_pages, Some(12));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["tl_scrape_api", "-c", "/etc/tl.yaml", "-b", "0.0.0.0:80"]);

        assert_eq!(cli.config, Some(PathBuf::from("/etc/tl.yaml")));
        assert_eq!(cli.bind.as_deref(), Some("0.0.0.0:80"));
    }

    #[test]
    fn test_cli_rejects_non_numeric_page_cap() {
        let result = Cli::try_parse_from(["tl_scrape_api", "--max-pages", "lots"]);
        assert!(result.is_err());
    }
}
