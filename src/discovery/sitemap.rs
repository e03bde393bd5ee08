//! Sitemap-based post discovery.
//!
//! A sitemap is the authoritative source when present: WordPress publishes
//! one under a handful of well-known names, and every `<loc>` entry it lists
//! can be shape-checked without crawling anything. The first candidate that
//! yields at least one valid post URL wins and the crawl fallback never runs.

use crate::config::ScrapeConfig;
use crate::discovery::validate;
use crate::fetch::Fetch;
use itertools::Itertools;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashSet;
use tracing::{debug, info, instrument};
use url::Url;

/// Well-known sitemap locations, tried in priority order.
const SITEMAP_PATHS: &[&str] = &["sitemap.xml", "sitemap_index.xml", "wp-sitemap.xml"];

/// Try each well-known sitemap and return the post URLs of the first one
/// that produces any.
///
/// A candidate counts only if it answers 2xx with an XML content type and at
/// least one `<loc>` entry passes the URL-shape check. Fetch errors, non-XML
/// responses, and empty results all mean "try the next candidate"; `None`
/// means the caller should fall back to crawling.
#[instrument(level = "info", skip_all, fields(base_url = %config.base_url))]
pub async fn from_sitemaps<F: Fetch>(config: &ScrapeConfig, fetcher: &F) -> Option<Vec<String>> {
    let base = Url::parse(&config.base_url).ok()?;

    for path in SITEMAP_PATHS {
        let sitemap_url = match base.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => continue,
        };

        let response = match fetcher.fetch(&sitemap_url).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %sitemap_url, error = %e, "Sitemap fetch failed");
                continue;
            }
        };
        if !response.is_success() || !response.is_xml() {
            debug!(
                url = %sitemap_url,
                status = response.status,
                content_type = ?response.content_type,
                "Sitemap candidate not usable"
            );
            continue;
        }

        let mut found: HashSet<String> = HashSet::new();
        for loc in parse_locations(&response.body) {
            let url = validate::strip_locator(&loc).to_string();
            if validate::is_post_url(&url, &config.base_url) {
                found.insert(url);
            }
        }

        if !found.is_empty() {
            info!(url = %sitemap_url, count = found.len(), "Sitemap yielded post URLs");
            return Some(found.into_iter().sorted().collect());
        }
    }

    None
}

/// Pull every `<loc>` text value out of a sitemap document.
///
/// Streaming parse; tolerant of namespace prefixes and of malformed tails
/// (parsing stops at the first error and whatever was collected so far is
/// returned).
fn parse_locations(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locations = Vec::new();
    let mut in_loc = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(t)) if in_loc => {
                if let Ok(raw) = t.decode() {
                    if let Ok(text) = quick_xml::escape::unescape(&raw) {
                        locations.push(text.trim().to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }
    locations
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

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/2019/06/03/a-day-out/</loc></url>
  <url><loc>https://example.com/2020/01/15/winter-notes/?replytocom=5</loc></url>
  <url><loc>https://example.com/2019/06/03/img_2041/</loc></url>
  <url><loc>https://example.com/about/</loc></url>
</urlset>"#;

    #[test]
    fn test_parse_locations_reads_loc_entries() {
        let locations = parse_locations(SITEMAP);
        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0], "https://example.com/2019/06/03/a-day-out/");
    }

    #[test]
    fn test_parse_locations_handles_garbage() {
        assert!(parse_locations("not xml at all").is_empty());
        assert!(parse_locations("").is_empty());
    }

    #[tokio::test]
    async fn test_first_usable_sitemap_wins() {
        let config = test_config();
        let fetcher = StaticFetcher::new()
            .with_page("https://example.com/sitemap.xml", stub::xml(SITEMAP));

        let urls = from_sitemaps(&config, &fetcher).await.unwrap();
        // Media-slug and non-post entries filtered; query string stripped.
        assert_eq!(
            urls,
            vec![
                "https://example.com/2019/06/03/a-day-out/".to_string(),
                "https://example.com/2020/01/15/winter-notes/".to_string(),
            ]
        );
        assert_eq!(fetcher.requested(), vec!["https://example.com/sitemap.xml"]);
    }

    #[tokio::test]
    async fn test_falls_through_to_later_candidates() {
        let config = test_config();
        let fetcher = StaticFetcher::new()
            .with_page("https://example.com/sitemap.xml", stub::not_found())
            .with_page("https://example.com/sitemap_index.xml", stub::html("<html/>"))
            .with_page("https://example.com/wp-sitemap.xml", stub::xml(SITEMAP));

        let urls = from_sitemaps(&config, &fetcher).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(
            fetcher.requested(),
            vec![
                "https://example.com/sitemap.xml",
                "https://example.com/sitemap_index.xml",
                "https://example.com/wp-sitemap.xml",
            ]
        );
    }

    #[tokio::test]
    async fn test_no_valid_entries_means_none() {
        let config = test_config();
        let empty = r#"<urlset><url><loc>https://example.com/about/</loc></url></urlset>"#;
        let fetcher = StaticFetcher::new()
            .with_page("https://example.com/sitemap.xml", stub::xml(empty));

        assert!(from_sitemaps(&config, &fetcher).await.is_none());
    }
}
