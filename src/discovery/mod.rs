//! Post URL discovery for a single blog site.
//!
//! Discovery runs in two phases, authoritative source first:
//!
//! 1. **Sitemap** ([`sitemap`]): try the well-known sitemap locations; the
//!    first one listing at least one valid post URL settles discovery.
//! 2. **Crawl** ([`crawl`]): breadth-first walk of the site's pagination
//!    sequence, harvesting post links from every visited page.
//!
//! Either way, every candidate passes the URL-shape check in [`validate`]
//! before it is admitted, and the final set is deduplicated and sorted so a
//! fixed site snapshot always yields the same numbering.

use crate::config::ScrapeConfig;
use crate::fetch::Fetch;
use tracing::{info, instrument};

pub mod crawl;
pub mod sitemap;
pub mod validate;

/// Enumerate all post URLs for the configured site.
///
/// Never fails: a site where both phases come up empty simply yields an
/// empty vector.
#[instrument(level = "info", skip_all, fields(base_url = %config.base_url))]
pub async fn discover_post_urls<F: Fetch>(config: &ScrapeConfig, fetcher: &F) -> Vec<String> {
    if let Some(urls) = sitemap::from_sitemaps(config, fetcher).await {
        info!(count = urls.len(), "Found posts via sitemap");
        return urls;
    }

    info!("No usable sitemap, crawling site");
    let urls = crawl::crawl_site(config, fetcher).await;
    info!(count = urls.len(), "Discovered posts via crawl");
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::{self, StaticFetcher};

    fn test_config() -> ScrapeConfig {
        let mut config = ScrapeConfig::for_site("https://example.com/".to_string());
        config.delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_sitemap_success_suppresses_crawl() {
        let config = test_config();
        let sitemap = r#"<urlset>
            <url><loc>https://example.com/2019/06/03/a-day-out/</loc></url>
        </urlset>"#;
        // Only the sitemap has a canned response; any crawl request would be
        // recorded (and fail), so the request log proves the short-circuit.
        let fetcher = StaticFetcher::new()
            .with_page("https://example.com/sitemap.xml", stub::xml(sitemap));

        let urls = discover_post_urls(&config, &fetcher).await;
        assert_eq!(urls, vec!["https://example.com/2019/06/03/a-day-out/".to_string()]);
        assert_eq!(fetcher.requested(), vec!["https://example.com/sitemap.xml"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_crawl_when_sitemaps_fail() {
        let config = test_config();
        let fetcher = StaticFetcher::new().with_page(
            "https://example.com/",
            stub::html(r#"<a href="/2019/06/03/a-day-out/">post</a>"#),
        );

        let urls = discover_post_urls(&config, &fetcher).await;
        assert_eq!(urls, vec!["https://example.com/2019/06/03/a-day-out/".to_string()]);
        // All three sitemap candidates tried before the crawl started.
        assert_eq!(fetcher.requested().len(), 4);
    }
}
