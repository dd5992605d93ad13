//! Post scanner - reads every post under `<site>/posts` into memory

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::post::{ExistingPost, PostRecord};
use super::{schema, FrontMatter};
use crate::error::JournalError;
use crate::helpers::{parse_date, site_url};

/// Loads posts from the site directory
pub struct ContentLoader<'a> {
    site_dir: &'a Path,
    posts_dir: PathBuf,
}

impl<'a> ContentLoader<'a> {
    /// Loader for `<site_dir>/posts`
    pub fn new(site_dir: &'a Path) -> Self {
        Self::with_posts_dir(site_dir, site_dir.join("posts"))
    }

    /// Loader for an arbitrary posts directory inside `site_dir`
    pub fn with_posts_dir(site_dir: &'a Path, posts_dir: PathBuf) -> Self {
        Self {
            site_dir,
            posts_dir,
        }
    }

    /// Load every post, oldest first
    ///
    /// Any Markdown file below the posts directory counts, at any depth. A
    /// single malformed post fails the whole scan.
    pub fn load_posts(&self) -> Result<Vec<ExistingPost>> {
        if !self.posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.posts_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("Failed to walk {:?}", self.posts_dir))?;
            let path = entry.path();
            if entry.file_type().is_file() && is_markdown_file(path) {
                posts.push(self.load_post(path)?);
            }
        }

        // Stable, so equal dates keep walk order
        posts.sort_by(|a, b| a.record.date.cmp(&b.record.date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// Load a single post from its Markdown file
    pub fn load_post(&self, path: &Path) -> Result<ExistingPost> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let (fm, body) = FrontMatter::parse(path, &content)?;

        let raw_date = fm.date.as_deref().ok_or_else(|| JournalError::MissingField {
            path: path.to_path_buf(),
            field: "date",
        })?;
        let date = parse_date(raw_date).ok_or_else(|| JournalError::InvalidDate {
            path: path.to_path_buf(),
            value: raw_date.to_string(),
        })?;
        let title = fm.title.clone().ok_or_else(|| JournalError::MissingField {
            path: path.to_path_buf(),
            field: "title",
        })?;

        let directory = path
            .parent()
            .with_context(|| format!("{:?} has no parent directory", path))?
            .to_path_buf();
        let post_id = directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("{:?} has no directory name", directory))?;

        let tags = schema::merge_tags(&fm.tags, &fm.categories);
        let images = schema::thumbnail_candidates(&fm, body);

        let mut record = PostRecord::new(
            date,
            directory,
            post_id,
            title,
            fm.author.as_deref().unwrap_or_default(),
            tags,
        );
        record.markdown = body.to_string();

        let post_url = site_url(self.site_dir, &record.page_path())?;
        let (index_image, thumbnail_parent_url) = match images.into_iter().next() {
            Some(image) => (
                Some(image),
                Some(site_url(self.site_dir, &record.media_dir())?),
            ),
            None => (None, None),
        };

        Ok(ExistingPost {
            record,
            index_image,
            post_url,
            thumbnail_parent_url,
            thumbnail_url: None,
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_post(site: &Path, rel_dir: &str, content: &str) -> PathBuf {
        let dir = site.join("posts").join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("post.md");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_scan_orders_by_date() {
        let site = tempfile::tempdir().unwrap();
        write_post(
            site.path(),
            "2024/02/b",
            "---\ntitle: B\ndate: 2024-02-01T00:00:00+00:00\n---\nb",
        );
        write_post(
            site.path(),
            "2023/12/a",
            "---\ntitle: A\ndate: 2023-12-01T00:00:00+00:00\n---\na",
        );
        write_post(
            site.path(),
            "2024/01/c",
            "---\ntitle: C\ndate: 2024-01-01T00:00:00+00:00\n---\nc",
        );

        let posts = ContentLoader::new(site.path()).load_posts().unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.post_id()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_post_fields() {
        let site = tempfile::tempdir().unwrap();
        write_post(
            site.path(),
            "2024/01/the-id",
            "---\ntitle: Hello\nauthor: Ann\ndate: 2024-01-05 10:00:00\ntags: [x]\nmedia_file_names: [clip.mp4, pic.jpg]\n---\nHi there\n",
        );

        let posts = ContentLoader::new(site.path()).load_posts().unwrap();
        let post = &posts[0];
        assert_eq!(post.post_id(), "the-id");
        assert_eq!(post.record.title, "Hello");
        assert_eq!(post.record.author, "Ann");
        assert_eq!(post.record.tags, vec!["x"]);
        assert_eq!(post.record.markdown, "Hi there\n");
        assert_eq!(post.record.date.offset().local_minus_utc(), 0);
        assert_eq!(post.post_url, "/posts/2024/01/the-id/index.html");
        assert_eq!(post.index_image.as_deref(), Some("pic.jpg"));
        assert_eq!(
            post.thumbnail_parent_url.as_deref(),
            Some("/posts/2024/01/the-id/media")
        );
        assert!(post.thumbnail_url.is_none());
        assert!(post.record.next.is_none());
    }

    #[test]
    fn test_legacy_post() {
        let site = tempfile::tempdir().unwrap();
        write_post(
            site.path(),
            "2019/05/old",
            "---\ntitle: Old\ndate: 2019-05-01\ncategories: [old]\n---\n![pic](media/photo.jpg)\n",
        );

        let posts = ContentLoader::new(site.path()).load_posts().unwrap();
        assert_eq!(posts[0].record.tags, vec!["old"]);
        assert_eq!(posts[0].record.author, "Unknown");
        assert_eq!(posts[0].index_image.as_deref(), Some("photo.jpg"));
    }

    #[test]
    fn test_post_without_images() {
        let site = tempfile::tempdir().unwrap();
        write_post(
            site.path(),
            "2024/01/plain",
            "---\ntitle: Plain\ndate: 2024-01-01\n---\ntext",
        );

        let posts = ContentLoader::new(site.path()).load_posts().unwrap();
        assert!(posts[0].index_image.is_none());
        assert!(posts[0].thumbnail_parent_url.is_none());
    }

    #[test]
    fn test_missing_title_fails_scan() {
        let site = tempfile::tempdir().unwrap();
        write_post(site.path(), "2024/01/ok", "---\ntitle: Ok\ndate: 2024-01-01\n---\n");
        write_post(site.path(), "2024/01/bad", "---\ndate: 2024-01-02\n---\n");

        let err = ContentLoader::new(site.path()).load_posts().unwrap_err();
        match err.downcast_ref::<JournalError>() {
            Some(JournalError::MissingField { field, .. }) => assert_eq!(*field, "title"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_date_fails_scan() {
        let site = tempfile::tempdir().unwrap();
        write_post(site.path(), "2024/01/bad", "---\ntitle: No date\n---\n");

        let err = ContentLoader::new(site.path()).load_posts().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JournalError>(),
            Some(JournalError::MissingField { field: "date", .. })
        ));
    }

    #[test]
    fn test_unparsable_date_fails_scan() {
        let site = tempfile::tempdir().unwrap();
        write_post(site.path(), "2024/01/bad", "---\ntitle: T\ndate: someday\n---\n");

        let err = ContentLoader::new(site.path()).load_posts().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JournalError>(),
            Some(JournalError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_missing_posts_dir_is_empty() {
        let site = tempfile::tempdir().unwrap();
        assert!(ContentLoader::new(site.path()).load_posts().unwrap().is_empty());
    }

    #[test]
    fn test_ignores_non_markdown_files() {
        let site = tempfile::tempdir().unwrap();
        let md = write_post(site.path(), "2024/01/p", "---\ntitle: P\ndate: 2024-01-01\n---\n");
        fs::write(md.parent().unwrap().join("index.html"), "<html></html>").unwrap();

        assert_eq!(ContentLoader::new(site.path()).load_posts().unwrap().len(), 1);
    }
}
