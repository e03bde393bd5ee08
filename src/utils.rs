//! Utility functions for filename sanitization and file system checks.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static ILLEGAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Maximum length of a sanitized filename stem, in characters.
const MAX_FILENAME_LEN: usize = 200;

/// Turn a post title into a safe filename stem.
///
/// Characters that are illegal in filenames (`< > : " / \ | ? *`) are
/// removed, whitespace runs become single underscores, repeated underscores
/// collapse to one, and the result is truncated to 200 characters and
/// trimmed of leading/trailing underscores.
///
/// # Arguments
///
/// * `title` - The post title to sanitize
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_filename(r#"My Post: A "Great" Day?"#), "My_Post_A_Great_Day");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let name = ILLEGAL_CHARS.replace_all(title, "");
    let name = WHITESPACE_RUN.replace_all(&name, "_");
    let name = UNDERSCORE_RUN.replace_all(&name, "_");
    let name: String = name.chars().take(MAX_FILENAME_LEN).collect();
    name.trim_matches('_').to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file. Called before any network
/// traffic so a bad output path fails the run up front.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Small sync probe write; simpler error surface than an async one.
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
