//! # Blog Text Export
//!
//! A one-shot batch tool that discovers every post on a WordPress-style blog
//! and saves each post's readable text as an individual file.
//!
//! ## Features
//!
//! - Sitemap-first URL discovery with a bounded pagination crawl as fallback
//! - Structural URL validation that tells posts apart from media attachment
//!   pages sharing the same `/YYYY/MM/DD/slug/` convention
//! - Heuristic content extraction that drops navigation, sharing widgets,
//!   comment sections, and inline boilerplate
//! - Sequentially numbered, deterministically named output files
//!
//! ## Usage
//!
//! ```sh
//! blog_text_export https://example.wordpress.com -o ./posts
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: Enumerate post URLs (sitemap, then crawl fallback)
//! 2. **Extraction**: Fetch each post and isolate its readable text
//! 3. **Output**: Write one text file per successfully extracted post
//!
//! Requests are issued one at a time with a fixed politeness delay; a failed
//! URL is counted and skipped, never retried.

use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod discovery;
mod extract;
mod fetch;
mod models;
mod outputs;
mod utils;

use cli::Cli;
use config::ScrapeConfig;
use fetch::{Fetch, HttpFetcher};
use models::RunSummary;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    let config = match ScrapeConfig::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };
    info!(
        base_url = %config.base_url,
        output_dir = %config.output_dir,
        "blog_text_export starting up"
    );

    // Early check: fail before any network traffic if output isn't writable.
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        std::process::exit(1);
    }

    let fetcher = match HttpFetcher::new(config.request_timeout_secs) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };

    tokio::select! {
        result = run(&config, &fetcher) => match result {
            Ok(summary) => {
                let elapsed = start_time.elapsed();
                info!(
                    discovered = summary.discovered,
                    exported = summary.exported,
                    failed = summary.failed,
                    secs = elapsed.as_secs(),
                    millis = elapsed.subsec_millis(),
                    "Export complete"
                );
            }
            Err(e) => {
                error!(error = %e, "Run failed");
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; completed files are kept, the in-flight file may be incomplete");
            std::process::exit(130);
        }
    }
}

/// Drive the full pipeline: discovery, then sequential per-post export.
async fn run<F: Fetch>(config: &ScrapeConfig, fetcher: &F) -> Result<RunSummary, Box<dyn Error>> {
    let post_urls = discovery::discover_post_urls(config, fetcher).await;
    if post_urls.is_empty() {
        warn!("No blog posts found");
        return Ok(RunSummary::default());
    }

    let total = post_urls.len();
    info!(total, "Extracting post content");

    // One post at a time; every URL consumes its sequence number whether or
    // not it produces a file.
    let results: Vec<bool> = stream::iter(post_urls.iter().enumerate())
        .then(|(index, url)| async move {
            let seq = index + 1;
            info!(seq, total, %url, "Processing post");
            let exported = export_post(config, fetcher, url, seq).await;
            tokio::time::sleep(Duration::from_millis(config.delay_ms)).await;
            exported
        })
        .collect()
        .await;

    let exported = results.iter().filter(|ok| **ok).count();
    Ok(RunSummary {
        discovered: total,
        exported,
        failed: total - exported,
    })
}

/// Extract one post and persist it. Returns whether a file was written;
/// every failure path is logged and recovered locally.
async fn export_post<F: Fetch>(
    config: &ScrapeConfig,
    fetcher: &F,
    url: &str,
    seq: usize,
) -> bool {
    match extract::extract_post(fetcher, url).await {
        Ok(Some(post)) => match outputs::write_post(&post, seq, &config.output_dir).await {
            Ok(_) => true,
            Err(e) => {
                error!(%url, error = %e, "Failed to save post");
                false
            }
        },
        Ok(None) => {
            warn!(%url, "Failed to extract content");
            false
        }
        Err(e) => {
            error!(%url, error = %e, "Post fetch failed");
            false
        }
    }
}
