//! Content extraction for a single post page.
//!
//! Pages carry no content schema, so everything here is structural
//! heuristics: title, date, and body container are each resolved by a chain
//! of independent resolvers tried in priority order, first match wins. The
//! chosen container is serialized to text while skipping a fixed denylist of
//! noise subtrees (navigation, sharing widgets, comment sections), and a
//! final table of textual cleanups removes the boilerplate WordPress emits
//! as plain inline text rather than as separable elements.

use crate::fetch::Fetch;
use crate::models::BlogPost;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::error::Error;
use tracing::{debug, warn};

static ENTRY_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1.entry-title").unwrap());
static ANY_H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static DOC_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static ENTRY_DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("time.entry-date").unwrap());
static ANY_TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());
static ENTRY_CONTENT: Lazy<Selector> = Lazy::new(|| Selector::parse("div.entry-content").unwrap());
static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Separator between a page title and the trailing site name: `|`, en-dash,
/// or hyphen. Only the text before the first separator is kept.
static SITE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[|–-]").unwrap());

/// Elements whose entire subtree is template furniture on any page.
const NOISE_TAGS: &[&str] = &["script", "style", "nav", "aside", "iframe", "form"];

/// Header/footer regions, stripped only when the container is an `article`
/// element (where they hold the post chrome rather than body text).
const CHROME_TAGS: &[&str] = &["header", "footer"];

/// Class names that mark sharing widgets, comment areas, related-post
/// blocks, and generic sidebar/widget/nav wrappers.
const NOISE_CLASSES: &[&str] = &[
    "sharedaddy",
    "share-buttons",
    "sd-sharing",
    "comments-area",
    "comment-respond",
    "related-posts",
    "jp-relatedposts",
    "widget",
    "sidebar",
    "navigation",
    "post-navigation",
];

const NOISE_IDS: &[&str] = &["comments"];

/// Ordered textual cleanup passes, applied after structural stripping.
/// WordPress emits some boilerplate as bare inline text with no element of
/// its own, out of reach of the structural denylist. The final pass
/// collapses 3+ newlines into the paragraph separator.
static CLEANUP_PASSES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        // "Share this:" trailer up to the next blank line (or end of text).
        (Regex::new(r"(?is)Share this:.*?(\n\n|\z)").unwrap(), "$1"),
        (
            Regex::new(r"(?i)Click to (?:share|email|print)[^\n]*").unwrap(),
            "",
        ),
        (
            Regex::new(
                r"(?:Facebook|Twitter|Pinterest|Email|Print|LinkedIn|Tumblr|Reddit|WhatsApp|Pocket|Telegram|Skype)\n",
            )
            .unwrap(),
            "",
        ),
        (Regex::new(r"Posted in[^\n]*\nTagged[^\n]*\n").unwrap(), ""),
        (Regex::new(r"(?i)Leave a (?:comment|reply)[^\n]*\n").unwrap(), ""),
        (Regex::new(r"(?m)^Related$").unwrap(), ""),
        (Regex::new(r"\n\s*\n\s*\n+").unwrap(), "\n\n"),
    ]
});

/// Title resolvers in priority order; the first non-empty result wins.
static TITLE_RESOLVERS: [fn(&Html) -> Option<String>; 3] =
    [entry_title, first_heading, document_title];

/// Date resolvers in priority order.
static DATE_RESOLVERS: [fn(&Html) -> Option<String>; 2] = [entry_date, first_time];

/// The container subtree judged to hold the post body, plus whether its
/// `header`/`footer` children are chrome to be skipped.
struct ContentRoot<'a> {
    root: ElementRef<'a>,
    strip_chrome: bool,
}

/// Fetch one post page and extract its readable content.
///
/// Three outcomes, all handled by the caller: `Ok(Some(post))` on success,
/// `Ok(None)` when the page answered but nothing extractable was found
/// (non-2xx status, no content container, or no text left after cleanup),
/// and `Err` for transport failures.
pub async fn extract_post<F: Fetch>(
    fetcher: &F,
    url: &str,
) -> Result<Option<BlogPost>, Box<dyn Error>> {
    let response = fetcher.fetch(url).await?;
    if !response.is_success() {
        warn!(%url, status = response.status, "Post fetch was not successful");
        return Ok(None);
    }
    Ok(parse_post(&response.body, url))
}

/// Extract title, date, and body text from a post page's markup.
pub(crate) fn parse_post(html: &str, url: &str) -> Option<BlogPost> {
    let document = Html::parse_document(html);

    let title = TITLE_RESOLVERS
        .iter()
        .find_map(|resolve| resolve(&document))
        .unwrap_or_else(|| "Untitled".to_string());
    let date = DATE_RESOLVERS
        .iter()
        .find_map(|resolve| resolve(&document))
        .unwrap_or_else(|| "No date".to_string());

    let container = resolve_content(&document)?;
    let content = clean_text(&container_text(&container));
    if content.is_empty() {
        debug!(%url, "No readable text in content container");
        return None;
    }

    Some(BlogPost {
        title,
        date,
        url: url.to_string(),
        content,
    })
}

fn entry_title(document: &Html) -> Option<String> {
    document.select(&ENTRY_TITLE).next().and_then(element_text)
}

fn first_heading(document: &Html) -> Option<String> {
    document.select(&ANY_H1).next().and_then(element_text)
}

/// Document `<title>`, with the trailing site-name suffix stripped.
fn document_title(document: &Html) -> Option<String> {
    let raw = document.select(&DOC_TITLE).next().and_then(element_text)?;
    let title = SITE_SUFFIX.split(&raw).next().unwrap_or("").trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn entry_date(document: &Html) -> Option<String> {
    document.select(&ENTRY_DATE).next().and_then(element_text)
}

fn first_time(document: &Html) -> Option<String> {
    document.select(&ANY_TIME).next().and_then(element_text)
}

/// Resolve the content container: `div.entry-content`, then `article` (with
/// its header/footer chrome marked for skipping), then `main`, then `body`.
fn resolve_content(document: &Html) -> Option<ContentRoot<'_>> {
    if let Some(root) = document.select(&ENTRY_CONTENT).next() {
        return Some(ContentRoot { root, strip_chrome: false });
    }
    if let Some(root) = document.select(&ARTICLE).next() {
        return Some(ContentRoot { root, strip_chrome: true });
    }
    if let Some(root) = document.select(&MAIN).next() {
        return Some(ContentRoot { root, strip_chrome: false });
    }
    if let Some(root) = document.select(&BODY).next() {
        debug!("Falling back to <body> as content container");
        return Some(ContentRoot { root, strip_chrome: false });
    }
    None
}

/// Rendered text of an element, all text nodes concatenated and trimmed.
/// `None` when the element holds no visible text.
fn element_text(element: ElementRef) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Serialize a container to text: one entry per non-empty trimmed text node,
/// newline-joined, with denylisted subtrees skipped whole. Skipping during
/// traversal leaves the parsed document untouched, so title/date resolution
/// never sees a modified tree.
fn container_text(container: &ContentRoot) -> String {
    let mut parts: Vec<String> = Vec::new();
    collect_text(container.root, container.strip_chrome, &mut parts);
    parts.join("\n")
}

fn collect_text(element: ElementRef, strip_chrome: bool, out: &mut Vec<String>) {
    if is_noise(&element, strip_chrome) {
        return;
    }
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, strip_chrome, out);
        } else if let Node::Text(text) = child.value() {
            let text = text.trim();
            if !text.is_empty() {
                out.push(text.to_string());
            }
        }
    }
}

fn is_noise(element: &ElementRef, strip_chrome: bool) -> bool {
    let value = element.value();
    let tag = value.name();
    if NOISE_TAGS.contains(&tag) {
        return true;
    }
    if strip_chrome && CHROME_TAGS.contains(&tag) {
        return true;
    }
    if value.id().is_some_and(|id| NOISE_IDS.contains(&id)) {
        return true;
    }
    value.classes().any(|class| NOISE_CLASSES.contains(&class))
}

/// Apply the cleanup-pass table in order, then trim.
fn clean_text(text: &str) -> String {
    let mut cleaned = text.to_string();
    for (pattern, replacement) in CLEANUP_PASSES.iter() {
        cleaned = pattern.replace_all(&cleaned, *replacement).into_owned();
    }
    cleaned.trim().to_string()
}
