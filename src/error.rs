//! Error types for failures that callers may want to tell apart

use std::path::PathBuf;
use thiserror::Error;

/// Classified journal errors
///
/// Everything else (I/O, template, image codec failures) travels as a plain
/// `anyhow::Error` with context attached.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Malformed front-matter in {path:?}: {reason}")]
    MalformedFrontMatter { path: PathBuf, reason: String },

    #[error("Missing required field `{field}` in {path:?}")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Invalid date `{value}` in {path:?}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("Thumbnail requested for post {post_id} without a media URL")]
    MissingThumbnailParent { post_id: String },
}
