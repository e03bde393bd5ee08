//! Crawl-based post discovery.
//!
//! Fallback for sites with no usable sitemap: a bounded breadth-first walk
//! that only ever traverses the site root and `/page/` pagination URLs, while
//! harvesting post links from every page it visits. Category, tag, and
//! archive index pages are harvested when linked but never traversed, which
//! keeps the walk confined to the pagination sequence.

use crate::config::ScrapeConfig;
use crate::discovery::validate;
use crate::fetch::Fetch;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Breadth-first crawl of the pagination sequence, collecting post URLs.
///
/// Pages that fail to fetch (transport error or non-2xx) are skipped without
/// aborting the crawl. Stops when the queue empties or `max_crawl_pages`
/// pages have been visited. A politeness delay follows every successfully
/// fetched page.
#[instrument(level = "info", skip_all, fields(base_url = %config.base_url))]
pub async fn crawl_site<F: Fetch>(config: &ScrapeConfig, fetcher: &F) -> Vec<String> {
    let Ok(base) = Url::parse(&config.base_url) else {
        warn!(base_url = %config.base_url, "Base URL does not parse; nothing to crawl");
        return Vec::new();
    };

    let mut queue: VecDeque<String> = VecDeque::from([config.base_url.clone()]);
    let mut visited: HashSet<String> = HashSet::new();
    let mut found: HashSet<String> = HashSet::new();

    while let Some(page) = queue.pop_front() {
        if visited.len() >= config.max_crawl_pages {
            warn!(cap = config.max_crawl_pages, "Crawl page cap reached");
            break;
        }
        if !visited.insert(page.clone()) {
            continue;
        }

        info!(%page, "Checking page");
        let response = match fetcher.fetch(&page).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                debug!(%page, status = response.status, "Skipping page");
                continue;
            }
            Err(e) => {
                warn!(%page, error = %e, "Page fetch failed");
                continue;
            }
        };

        {
            let document = Html::parse_document(&response.body);
            for element in document.select(&ANCHOR) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                let Some(resolved) = resolve_href(&base, href) else {
                    continue;
                };

                if validate::is_post_url(&resolved, &config.base_url) {
                    found.insert(resolved.clone());
                }

                // Only the root and pagination URLs are worth traversing;
                // everything else is harvested where it is linked.
                if resolved.starts_with(&config.base_url)
                    && !visited.contains(&resolved)
                    && (resolved == config.base_url || resolved.contains("/page/"))
                {
                    queue.push_back(resolved);
                }
            }
        }

        sleep(Duration::from_millis(config.delay_ms)).await;
    }

    found.into_iter().sorted().collect()
}

/// Resolve an anchor href against the site root and normalize it (fragment
/// and query stripped). `None` for hrefs that cannot resolve to a URL.
fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);
    resolved.set_query(None);
    Some(resolved.to_string())
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

    #[test]
    fn test_resolve_href() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(
            resolve_href(&base, "/2019/06/03/a-day-out/#more").unwrap(),
            "https://example.com/2019/06/03/a-day-out/"
        );
        assert_eq!(
            resolve_href(&base, "https://example.com/page/2/?ref=nav").unwrap(),
            "https://example.com/page/2/"
        );
        assert_eq!(
            resolve_href(&base, "about/").unwrap(),
            "https://example.com/about/"
        );
    }

    #[tokio::test]
    async fn test_crawl_follows_pagination_and_collects_posts() {
        let config = test_config();
        let fetcher = StaticFetcher::new()
            .with_page(
                "https://example.com/",
                stub::html(concat!(
                    r#"<a href="/2019/06/03/a-day-out/">post</a>"#,
                    r#"<a href="/page/2/">older</a>"#,
                    r#"<a href="/category/travel/">category</a>"#,
                    r#"<a href="https://elsewhere.com/2019/06/03/offsite/">offsite</a>"#,
                )),
            )
            .with_page(
                "https://example.com/page/2/",
                stub::html(concat!(
                    r#"<a href="/2018/11/20/first-post/?share=x">post</a>"#,
                    r#"<a href="/2019/06/03/a-day-out/">repeat</a>"#,
                    r#"<a href="/2019/06/03/img_2041/">attachment</a>"#,
                )),
            );

        let urls = crawl_site(&config, &fetcher).await;
        // Sorted, deduplicated, attachment and offsite links excluded.
        assert_eq!(
            urls,
            vec![
                "https://example.com/2018/11/20/first-post/".to_string(),
                "https://example.com/2019/06/03/a-day-out/".to_string(),
            ]
        );
        // Category page harvested but never traversed.
        assert_eq!(
            fetcher.requested(),
            vec!["https://example.com/", "https://example.com/page/2/"]
        );
    }

    #[tokio::test]
    async fn test_crawl_survives_broken_pages() {
        let config = test_config();
        let fetcher = StaticFetcher::new().with_page(
            "https://example.com/",
            stub::html(concat!(
                r#"<a href="/page/2/">older</a>"#,
                r#"<a href="/page/3/">oldest</a>"#,
            )),
        );
        // /page/2/ has no canned response (transport error), /page/3/ is
        // missing too; the crawl must still terminate cleanly.
        let urls = crawl_site(&config, &fetcher).await;
        assert!(urls.is_empty());
        assert_eq!(fetcher.requested().len(), 3);
    }

    #[tokio::test]
    async fn test_crawl_respects_page_cap() {
        let mut config = test_config();
        config.max_crawl_pages = 2;
        let fetcher = StaticFetcher::new()
            .with_page("https://example.com/", stub::html(r#"<a href="/page/2/">2</a>"#))
            .with_page(
                "https://example.com/page/2/",
                stub::html(r#"<a href="/page/3/">3</a>"#),
            )
            .with_page(
                "https://example.com/page/3/",
                stub::html(r#"<a href="/2019/06/03/a-day-out/">post</a>"#),
            );

        let urls = crawl_site(&config, &fetcher).await;
        assert!(urls.is_empty());
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_crawl_never_returns_urls_outside_base() {
        let config = test_config();
        let fetcher = StaticFetcher::new().with_page(
            "https://example.com/",
            stub::html(r#"<a href="https://other.com/2019/06/03/post/">x</a>"#),
        );
        assert!(crawl_site(&config, &fetcher).await.is_empty());
    }
}
