//! Create a new post from the command line

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::{NewPost, Submission, Upload};
use crate::Journal;

/// A post described by command-line arguments
#[derive(Debug, Clone, Default)]
pub struct NewPostArgs {
    pub title: String,
    pub author: String,
    /// Comma separated tags
    pub tags: String,
    /// Markdown text given inline
    pub content: Option<String>,
    /// File holding the Markdown text
    pub content_file: Option<PathBuf>,
    /// Media files to attach
    pub media: Vec<PathBuf>,
}

impl NewPostArgs {
    /// Read the text and attachments into a submission
    pub fn into_submission(self) -> Result<Submission> {
        let content = match (self.content, &self.content_file) {
            (Some(content), _) => content,
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?,
            (None, None) => String::new(),
        };

        let media = self
            .media
            .iter()
            .map(|path| {
                let data = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .with_context(|| format!("{:?} is not a file", path))?;
                Ok(Upload { file_name, data })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Submission {
            title: Some(self.title),
            author: self.author,
            content,
            tags: self.tags,
            selected_tags: Vec::new(),
            media,
        })
    }
}

/// Create and publish a post
pub fn create_post(journal: &Journal, args: NewPostArgs) -> Result<NewPost> {
    let post = journal.create_post(args.into_submission()?)?;
    println!("Created: {:?}", post.record.markdown_path());
    Ok(post)
}
