//! Data models for extracted blog posts and run accounting.
//!
//! This module defines the two records that flow through the pipeline:
//! - [`BlogPost`]: one post's extracted text and metadata, ready to persist
//! - [`RunSummary`]: end-of-run counters reported to the user

/// A single blog post as extracted from its page.
///
/// Created once per successful extraction and consumed exactly once by the
/// persistence step. The `content` field holds plain text with blank lines
/// as paragraph separators; all template furniture (navigation, sharing
/// widgets, comment prompts) has already been stripped.
///
/// # Fields
///
/// * `title` - The post title, or `"Untitled"` if none could be resolved
/// * `date` - The publish date as rendered on the page, or `"No date"`
/// * `url` - The normalized URL the post was extracted from
/// * `content` - The readable body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    /// The post title.
    pub title: String,
    /// The publish date text, taken verbatim from the page.
    pub date: String,
    /// The URL the post was fetched from.
    pub url: String,
    /// The extracted body text with paragraph breaks.
    pub content: String,
}

/// Counters for one complete export run.
///
/// Every discovered URL is attempted exactly once; a URL either produces an
/// output file (`exported`) or is counted as a failure (`failed`), so
/// `exported + failed == discovered` once the run completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of post URLs discovery produced.
    pub discovered: usize,
    /// Number of posts successfully extracted and written to disk.
    pub exported: usize,
    /// Number of posts that failed extraction or persistence.
    pub failed: usize,
}
