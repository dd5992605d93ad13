//! Post models
//!
//! A post lives in its own directory holding `post.md`, the rendered
//! `index.html` and a `media/` folder. [`PostRecord`] is what every post has;
//! [`ExistingPost`] is a post read back from disk for a rebuild, [`NewPost`] is
//! one being assembled from a submission.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::helpers::{iso_timestamp, slugify};

/// Author recorded when none was given
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Tag given to posts submitted without any
pub const DEFAULT_TAG: &str = "random";

/// Name of the Markdown file inside a post directory
pub const POST_FILE: &str = "post.md";

/// Name of the rendered page inside a post directory
pub const POST_PAGE: &str = "index.html";

/// Name of the media folder inside a post directory
pub const MEDIA_DIR: &str = "media";

/// Fields shared by every post
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    /// Creation time
    pub date: DateTime<FixedOffset>,

    /// Post directory; doubles as the post's identity on disk
    pub directory: PathBuf,

    /// Markdown body without front-matter
    pub markdown: String,

    /// `<timestamp>_<slug>`, equal to the directory name
    pub post_id: String,

    /// Never empty
    pub tags: Vec<String>,

    pub title: String,

    pub author: String,

    /// Root-relative URL of the following post's page, set by navigation linking
    pub next: Option<String>,

    /// Root-relative URL of the preceding post's page, set by navigation linking
    pub previous: Option<String>,
}

impl PostRecord {
    /// Create a record; a blank author becomes [`UNKNOWN_AUTHOR`]
    pub fn new(
        date: DateTime<FixedOffset>,
        directory: PathBuf,
        post_id: String,
        title: String,
        author: &str,
        tags: Vec<String>,
    ) -> Self {
        Self {
            date,
            directory,
            markdown: String::new(),
            post_id,
            tags,
            title,
            author: author_or_unknown(author),
            next: None,
            previous: None,
        }
    }

    /// Media folder on disk
    pub fn media_dir(&self) -> PathBuf {
        self.directory.join(MEDIA_DIR)
    }

    /// Rendered page on disk
    pub fn page_path(&self) -> PathBuf {
        self.directory.join(POST_PAGE)
    }

    /// Markdown source on disk
    pub fn markdown_path(&self) -> PathBuf {
        self.directory.join(POST_FILE)
    }
}

/// Trimmed author, or [`UNKNOWN_AUTHOR`] when blank
pub fn author_or_unknown(author: &str) -> String {
    let author = author.trim();
    if author.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        author.to_string()
    }
}

/// A published post, rebuilt from its Markdown file on every run
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingPost {
    pub record: PostRecord,

    /// First image eligible for the index thumbnail
    pub index_image: Option<String>,

    /// Root-relative URL of the post page
    pub post_url: String,

    /// Root-relative URL of the media folder, set when there is an index image
    pub thumbnail_parent_url: Option<String>,

    /// Root-relative URL of the thumbnail, set by the thumbnail builder
    pub thumbnail_url: Option<String>,
}

impl ExistingPost {
    pub fn post_id(&self) -> &str {
        &self.record.post_id
    }

    /// File name of this post's author index page
    pub fn author_index_file(&self) -> String {
        format!("{}.html", slugify(&self.record.author, false))
    }
}

/// Metadata block written as front-matter of a new post
///
/// Field order is the on-disk key order.
#[derive(Debug, Serialize)]
struct MediaHeader<'a> {
    author: &'a str,
    date: String,
    media_file_names: &'a [String],
    post_id: &'a str,
    tags: &'a [String],
    title: &'a str,
}

/// A post being created from a submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub record: PostRecord,

    /// Media files saved for this post, in submission order
    pub media_file_names: Vec<String>,
}

impl NewPost {
    pub fn new(record: PostRecord) -> Self {
        Self {
            record,
            media_file_names: Vec::new(),
        }
    }

    /// YAML metadata block (without `---` fences)
    pub fn media_header(&self) -> Result<String> {
        let header = MediaHeader {
            author: &self.record.author,
            date: iso_timestamp(&self.record.date),
            media_file_names: &self.media_file_names,
            post_id: &self.record.post_id,
            tags: &self.record.tags,
            title: &self.record.title,
        };
        Ok(serde_yaml::to_string(&header)?)
    }

    /// Media path relative to the post directory, as used inside the Markdown
    pub fn relative_media_path(name: &str) -> String {
        format!("{}/{}", MEDIA_DIR, name)
    }

    /// Write the composed Markdown file, creating the post directory
    pub fn write_markdown(&self) -> Result<()> {
        fs::create_dir_all(&self.record.directory)
            .with_context(|| format!("Failed to create {:?}", self.record.directory))?;
        let path = self.record.markdown_path();
        fs::write(&path, &self.record.markdown)
            .with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Wrote {:?}", path);
        Ok(())
    }
}
