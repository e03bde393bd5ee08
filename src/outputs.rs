//! Plain-text output files, one per exported post.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── 0001_My_First_Post.txt
//! ├── 0002_A_Day_Out.txt
//! └── ...
//! ```
//!
//! Sequence numbers are 1-based positions in the sorted discovered URL list,
//! so a re-run against an unchanged site produces identical filenames. A URL
//! that fails extraction consumes its number without producing a file.

use crate::models::BlogPost;
use crate::utils::sanitize_filename;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Width of the `=` banner separating the header from the body.
const BANNER_WIDTH: usize = 80;

/// Write one post to `{output_dir}/{seq:04}_{sanitized title}.txt`.
///
/// # Arguments
///
/// * `post` - The extracted post to persist
/// * `seq` - 1-based position of the post's URL in the sorted discovery list
/// * `output_dir` - Directory the file is written into
///
/// # Returns
///
/// The filename written, or an error if the write fails.
#[instrument(level = "info", skip_all, fields(seq, title = %post.title))]
pub async fn write_post(
    post: &BlogPost,
    seq: usize,
    output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let filename = format!("{:04}_{}.txt", seq, sanitize_filename(&post.title));
    let path = Path::new(output_dir).join(&filename);

    let body = format!(
        "Title: {}\nDate: {}\nURL: {}\n\n{}\n\n{}\n",
        post.title,
        post.date,
        post.url,
        "=".repeat(BANNER_WIDTH),
        post.content
    );

    fs::write(&path, body).await?;
    info!(path = %path.display(), chars = post.content.len(), "Saved post");
    Ok(filename)
}
