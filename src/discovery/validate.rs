//! URL-shape validation for post URLs.
//!
//! WordPress-style blogs put posts at `/YYYY/MM/DD/slug/`, but they store
//! media attachment pages under the exact same date-path convention. The only
//! structural difference is the slug, so after checking the path shape we
//! reject slugs that look like uploaded image filenames.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Slug patterns that mark a URL as an attachment/media page rather than a
/// post: bare numbers, camera-default names, timestamp names, and generic
/// screenshot/image names. Anchored so they only match from the start of the
/// slug, like the filenames they come from.
static MEDIA_SLUG_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^fb_img",
        r"^\d{8}_\d{6}$",
        r"^img[_-]?\d+",
        r"^dsc[_-]?\d+",
        r"^\d{4}-\d{2}-\d{2}",
        r"^screenshot",
        r"^image[_-]?\d*",
        r"^\d+$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Drop the fragment and query string from a URL, returning the prefix.
///
/// Candidate URLs are compared and stored in this normalized form, so
/// `https://a/p/#x` and `https://a/p/?y=z` are the same candidate.
pub fn strip_locator(url: &str) -> &str {
    url.split(['#', '?']).next().unwrap_or(url)
}

/// Decide whether `url` denotes a dated post page under `base_url`.
///
/// The check is purely structural: the normalized URL must live under the
/// site root, have exactly four path segments, start with an in-range
/// `year/month/day` triple (year 2000-2030, month 1-12, day 1-31; no
/// calendar validation beyond the ranges), and carry a slug that does not
/// look like an uploaded media filename.
pub fn is_post_url(url: &str, base_url: &str) -> bool {
    let url = strip_locator(url);

    if !url.starts_with(base_url) {
        return false;
    }
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let path = parsed.path().trim_end_matches('/');
    if path.is_empty() || path == "/" {
        return false;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() != 4 {
        return false;
    }

    let (Ok(year), Ok(month), Ok(day)) = (
        segments[0].parse::<i32>(),
        segments[1].parse::<u32>(),
        segments[2].parse::<u32>(),
    ) else {
        return false;
    };
    if !(2000..=2030).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return false;
    }

    let slug = segments[3].to_lowercase();
    !MEDIA_SLUG_PATTERNS.iter().any(|pattern| pattern.is_match(&slug))
}
