//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Unset options fall back to config-file values (when `--config` is given)
//! and then to built-in defaults; see [`crate::config::ScrapeConfig`].

use clap::Parser;

/// Command-line arguments for the blog text exporter.
///
/// # Examples
///
/// ```sh
/// # Export a blog with default settings
/// blog_text_export https://example.wordpress.com
///
/// # Slower crawl into a chosen directory
/// blog_text_export https://example.wordpress.com -o ./posts --delay-ms 2000
///
/// # Settings from a YAML file, output dir overridden on the command line
/// blog_text_export -c site.yaml -o ./posts
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Site root URL to export posts from
    pub site_url: Option<String>,

    /// Output directory for the per-post text files
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Delay between consecutive requests, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Maximum number of pages to visit during the crawl fallback
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "blog_text_export",
            "https://example.com/",
            "--output-dir",
            "./posts",
        ]);

        assert_eq!(cli.site_url.as_deref(), Some("https://example.com/"));
        assert_eq!(cli.output_dir.as_deref(), Some("./posts"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["blog_text_export", "-o", "/tmp/posts", "-c", "site.yaml"]);

        assert_eq!(cli.output_dir.as_deref(), Some("/tmp/posts"));
        assert_eq!(cli.config.as_deref(), Some("site.yaml"));
        assert!(cli.site_url.is_none());
    }

    #[test]
    fn test_cli_numeric_options() {
        let cli = Cli::parse_from([
            "blog_text_export",
            "https://example.com/",
            "--delay-ms",
            "500",
            "--max-pages",
            "25",
            "--timeout",
            "15",
        ]);

        assert_eq!(cli.delay_ms, Some(500));
        assert_eq!(cli.max_pages, Some(25));
        assert_eq!(cli.timeout, Some(15));
    }
}
