//! Generator module - regenerates the static site from the posts on disk
//!
//! Every run rescans all posts. A run targeting one post rewrites only that
//! post's page and its two neighbours, but thumbnails and index pages always
//! cover the full collection.

mod index;
pub mod navigation;
pub mod selector;
pub mod thumbnail;

use anyhow::{Context as _, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;

use crate::config::JournalConfig;
use crate::content::{ContentLoader, ExistingPost, MarkdownRenderer};
use crate::templates::{PostData, TemplateRenderer};

pub use index::{AUTHOR_DIR, HOME_TITLE, TAG_DIR};

/// Result of the page-rendering stage
#[derive(Debug)]
pub struct Rebuild {
    /// Every post, oldest first, with navigation links set
    pub posts: Vec<ExistingPost>,

    /// Indices into `posts` of the pages that were rewritten
    pub rendered: Vec<usize>,
}

impl Rebuild {
    pub fn rendered_posts(&self) -> impl Iterator<Item = &ExistingPost> {
        self.rendered.iter().map(|&i| &self.posts[i])
    }
}

/// Outcome of a complete regeneration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildSummary {
    /// Post pages rewritten
    pub built: usize,

    /// Posts on disk
    pub total: usize,

    /// Thumbnails generated
    pub thumbnails: usize,
}

impl fmt::Display for RebuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Built {} of {} posts.", self.built, self.total)
    }
}

/// Static site generator using Tera templates
pub struct Generator {
    site_dir: PathBuf,
    config: JournalConfig,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site_dir: &Path, config: &JournalConfig) -> Result<Self> {
        Ok(Self {
            site_dir: site_dir.to_path_buf(),
            config: config.clone(),
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::with_options(&config.highlight),
        })
    }

    pub fn templates(&self) -> &TemplateRenderer {
        &self.templates
    }

    /// Directory scanned for posts
    pub fn posts_dir(&self) -> PathBuf {
        self.site_dir.join("posts")
    }

    /// Scan every post, oldest first
    pub fn load_posts(&self) -> Result<Vec<ExistingPost>> {
        ContentLoader::with_posts_dir(&self.site_dir, self.posts_dir()).load_posts()
    }

    /// Rescan, relink and rewrite post pages
    ///
    /// With a target only the target and its neighbours are rewritten; an
    /// unknown target rewrites nothing.
    pub fn rebuild_site(&self, target: Option<&str>) -> Result<Rebuild> {
        let mut posts = self.load_posts()?;
        navigation::link_navigation(&mut posts);

        let rendered = match target {
            Some(post_id) => selector::rebuild_indices(post_id, &posts),
            None => (0..posts.len()).collect(),
        };

        if rendered.is_empty() {
            if let Some(post_id) = target {
                tracing::info!("No post with id {}, nothing to render", post_id);
            }
        }

        for &index in &rendered {
            self.write_post_page(&posts[index])?;
        }

        Ok(Rebuild { posts, rendered })
    }

    /// Render one post's Markdown and overwrite its `index.html`
    pub fn write_post_page(&self, post: &ExistingPost) -> Result<()> {
        let content = self.markdown.render(&post.record.markdown)?;

        let mut context = self.base_context();
        context.insert("post", &PostData::from(post));
        context.insert("content", &content);

        let html = self.templates.render("post.html", &context)?;
        let output_path = post.record.page_path();
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated post: {:?}", output_path);
        Ok(())
    }

    /// Full pipeline: post pages, then thumbnails and every index page
    pub fn publish(&self, target: Option<&str>) -> Result<RebuildSummary> {
        let Rebuild { mut posts, rendered } = self.rebuild_site(target)?;

        let thumbnails = thumbnail::build_thumbnails(&mut posts, self.config.thumbnail_size)?;
        self.write_home_index(&posts)?;
        let tags = self.write_tag_indices(&posts)?;
        let authors = self.write_author_indices(&posts)?;

        let summary = RebuildSummary {
            built: rendered.len(),
            total: posts.len(),
            thumbnails,
        };
        tracing::info!(
            "{} ({} thumbnails, {} tags, {} authors)",
            summary,
            thumbnails,
            tags,
            authors
        );
        Ok(summary)
    }

    /// Submission form offering the configured tags
    pub fn render_new_post_form(&self) -> Result<String> {
        let mut context = self.base_context();
        context.insert("tags", &self.config.tags);
        self.templates.render("new.html", &context)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site_title", &self.config.title);
        context
    }
}
