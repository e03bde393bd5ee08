//! Run configuration resolved once at startup.
//!
//! All knobs are fixed for the lifetime of a run and threaded through the
//! pipeline as an explicit [`ScrapeConfig`] value rather than ambient state,
//! so discovery and extraction stay runnable against multiple sites (or test
//! fixtures) in the same process.
//!
//! Values come from an optional YAML config file (`--config`), with explicit
//! command-line flags taking precedence over file values.

use crate::cli::Cli;
use serde::{Deserialize, Serialize};
use std::error::Error;
use url::Url;

fn default_output_dir() -> String {
    "exported_posts".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_max_crawl_pages() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    10
}

/// Fixed configuration for one export run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapeConfig {
    /// Absolute site root; every discovered URL must share this prefix.
    pub base_url: String,
    /// Directory the per-post text files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Politeness delay between consecutive requests, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Visited-page cap for the crawl fallback.
    #[serde(default = "default_max_crawl_pages")]
    pub max_crawl_pages: usize,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ScrapeConfig {
    /// A config for `base_url` with every other knob at its default.
    pub fn for_site(base_url: String) -> Self {
        Self {
            base_url,
            output_dir: default_output_dir(),
            delay_ms: default_delay_ms(),
            max_crawl_pages: default_max_crawl_pages(),
            request_timeout_secs: default_timeout_secs(),
        }
    }

    /// Resolve the effective configuration from CLI arguments.
    ///
    /// If `--config` names a YAML file it is loaded first; any flags given on
    /// the command line then override the file's values. The site URL must
    /// come from one of the two sources. The base URL is parsed and
    /// re-serialized so that a bare host like `https://example.com` gains its
    /// trailing slash and prefix checks behave consistently.
    ///
    /// # Errors
    ///
    /// Returns an error if no site URL was provided, the config file cannot
    /// be read or parsed, or the base URL is not a valid absolute URL.
    pub fn resolve(args: &Cli) -> Result<Self, Box<dyn Error>> {
        let mut config = match &args.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let mut parsed: ScrapeConfig = serde_yaml::from_str(&raw)?;
                if let Some(url) = &args.site_url {
                    parsed.base_url = url.clone();
                }
                parsed
            }
            None => {
                let url = args
                    .site_url
                    .clone()
                    .ok_or("a site URL is required (positional argument or --config file)")?;
                ScrapeConfig::for_site(url)
            }
        };

        if let Some(dir) = &args.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(delay) = args.delay_ms {
            config.delay_ms = delay;
        }
        if let Some(max) = args.max_pages {
            config.max_crawl_pages = max;
        }
        if let Some(timeout) = args.timeout {
            config.request_timeout_secs = timeout;
        }

        config.base_url = Url::parse(&config.base_url)?.to_string();
        Ok(config)
    }
}
