//! HTTP fetching behind a trait seam.
//!
//! Both discovery and extraction talk to the network through the [`Fetch`]
//! trait so the whole pipeline can run against canned fixtures in tests.
//! [`HttpFetcher`] is the production implementation: a `reqwest` client with
//! a bounded per-request timeout, no caching, and no cookie state.

use std::error::Error;
use std::time::Duration;
use tracing::debug;

/// A fetched HTTP response, reduced to the parts the pipeline needs.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The declared `Content-Type` header value, if any.
    pub content_type: Option<String>,
    /// The response body decoded as text.
    pub body: String,
}

impl FetchResponse {
    /// Whether the response carries a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the declared content type indicates an XML document.
    pub fn is_xml(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("xml"))
    }
}

/// Async page fetching.
///
/// Implementors return the response for a URL or an error for transport
/// failures (timeout, connection refused, DNS). Callers treat every error as
/// "no data for this URL" and continue; nothing in the pipeline retries.
pub trait Fetch {
    /// Fetch a single URL.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Box<dyn Error>>;
}

/// Production fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests time out after `timeout_secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Box<dyn Error>> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        debug!(%url, status, bytes = body.len(), "Fetched page");
        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_bounds() {
        let mut response = stub::html("ok");
        assert!(response.is_success());
        response.status = 299;
        assert!(response.is_success());
        response.status = 301;
        assert!(!response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }

    #[test]
    fn test_is_xml_checks_declared_content_type() {
        assert!(stub::xml("<urlset/>").is_xml());
        assert!(
            FetchResponse {
                status: 200,
                content_type: Some("application/xml; charset=UTF-8".to_string()),
                body: String::new(),
            }
            .is_xml()
        );
        assert!(!stub::html("<urlset/>").is_xml());
        assert!(
            !FetchResponse {
                status: 200,
                content_type: None,
                body: String::new(),
            }
            .is_xml()
        );
    }

    #[tokio::test]
    async fn test_stub_records_requests() {
        let fetcher = stub::StaticFetcher::new().with_page("https://a/", stub::html("hi"));
        let response = fetcher.fetch("https://a/").await.unwrap();
        assert_eq!(response.body, "hi");
        assert!(fetcher.fetch("https://b/").await.is_err());
        assert_eq!(fetcher.requested(), vec!["https://a/", "https://b/"]);
    }
}
