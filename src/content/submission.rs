//! Turning a submitted form into a new post on disk

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use std::path::Path;
use tera::Context;

use super::media::{self, MediaOptions, Upload};
use super::post::{NewPost, PostRecord, DEFAULT_TAG};
use crate::helpers::{iso_timestamp, slugify};
use crate::templates::{MediaData, TemplateRenderer};

/// Prefix of checkbox fields that select a suggested tag
pub const TAG_FIELD_PREFIX: &str = "tag-";

/// A new-post submission, independent of how it arrived
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub title: Option<String>,
    pub author: String,
    /// Markdown text of the post
    pub content: String,
    /// Comma separated free-form tags
    pub tags: String,
    /// Tags ticked among the suggestions
    pub selected_tags: Vec<String>,
    pub media: Vec<Upload>,
}

/// Combine free-form and ticked tags: trimmed, lowercased, never empty
pub fn extract_tags(tags_field: &str, selected: &[String]) -> Vec<String> {
    let tags: Vec<String> = tags_field
        .split(',')
        .chain(selected.iter().map(String::as_str))
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();

    if tags.is_empty() {
        vec![DEFAULT_TAG.to_string()]
    } else {
        tags
    }
}

impl NewPost {
    /// Lay out a new post for a submission received at `now`
    ///
    /// Nothing is written; the post lives in
    /// `<posts_dir>/<year>/<month>/<timestamp>_<slug>/`.
    pub fn from_submission(
        submission: &Submission,
        posts_dir: &Path,
        now: DateTime<FixedOffset>,
    ) -> Self {
        let timestamp = iso_timestamp(&now);
        let title = submission
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| timestamp.clone());

        let post_id = format!("{}_{}", timestamp, slugify(&title, false));
        let directory = posts_dir
            .join(now.format("%Y").to_string())
            .join(now.format("%m").to_string())
            .join(&post_id);

        NewPost::new(PostRecord::new(
            now,
            directory,
            post_id,
            title,
            &submission.author,
            extract_tags(&submission.tags, &submission.selected_tags),
        ))
    }

    /// Save the submission's media into the post directory
    pub fn store_media(&mut self, uploads: &[Upload], options: &MediaOptions) -> Result<()> {
        media::store_uploads(self, uploads, options)
    }

    /// Build the Markdown file: metadata header, text, then embedded media
    pub fn compose_markdown(&mut self, content: &str, templates: &TemplateRenderer) -> Result<()> {
        let mut images = Vec::new();
        let mut videos = Vec::new();

        for name in &self.media_file_names {
            let mime = media::sniff_file(&self.record.media_dir().join(name))?;
            let data = MediaData {
                name: name.clone(),
                path: NewPost::relative_media_path(name),
                mime,
            };
            if data.mime.starts_with("image/") {
                images.push(data);
            } else if data.mime.starts_with("video/") {
                videos.push(data);
            } else {
                tracing::debug!("Not embedding {} ({})", data.name, data.mime);
            }
        }

        let mut context = Context::new();
        context.insert("md_header", &self.media_header()?);
        context.insert("content", content);
        context.insert("images", &images);
        context.insert("videos", &videos);

        self.record.markdown = templates.render("post.md", &context)?;
        Ok(())
    }
}
