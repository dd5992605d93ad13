//! home-journal: a personal journal published as a static site
//!
//! Posts are submitted through a small web form (or the `new` command),
//! stored as Markdown with YAML front matter under `<site>/posts`, and the
//! site is regenerated from those files after every change.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use config::JournalConfig;
use content::{ExistingPost, MediaOptions, NewPost, Submission};
use generator::{Generator, RebuildSummary};

/// The main journal application
#[derive(Clone)]
pub struct Journal {
    /// Journal configuration
    pub config: JournalConfig,
    /// Site directory, also the web root
    pub site_dir: PathBuf,
    /// Posts directory
    pub posts_dir: PathBuf,
    generator: Arc<Generator>,
    rebuild_lock: Arc<Mutex<()>>,
}

impl Journal {
    /// Open the journal in `site_dir`, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(site_dir: P) -> Result<Self> {
        let site_dir = site_dir.as_ref();
        let config = JournalConfig::load_from_site(site_dir)?;
        Self::with_config(site_dir, config)
    }

    /// Open the journal with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(site_dir: P, config: JournalConfig) -> Result<Self> {
        let site_dir = site_dir.as_ref().to_path_buf();
        let generator = Generator::new(&site_dir, &config)?;

        Ok(Self {
            config,
            posts_dir: generator.posts_dir(),
            site_dir,
            generator: Arc::new(generator),
            rebuild_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Regenerate the site
    ///
    /// `target` limits post page rendering to one post and its neighbours;
    /// thumbnails and index pages are always rebuilt in full. Rebuilds never
    /// overlap.
    pub fn rebuild(&self, target: Option<&str>) -> Result<RebuildSummary> {
        let _guard = self.lock();
        self.generator.publish(target)
    }

    /// Write a new post to disk and publish it
    ///
    /// `post.md` appears under the same lock as the rebuild that follows, so
    /// a concurrent rebuild never scans a half-written post.
    pub fn create_post(&self, submission: Submission) -> Result<NewPost> {
        let now = Local::now().fixed_offset();
        let mut post = NewPost::from_submission(&submission, &self.posts_dir, now);

        post.store_media(&submission.media, &MediaOptions::from(&self.config))?;
        post.compose_markdown(&submission.content, self.generator.templates())?;

        let _guard = self.lock();
        post.write_markdown()?;
        tracing::info!("Created post {}", post.record.post_id);

        self.generator.publish(Some(&post.record.post_id))?;
        Ok(post)
    }

    // Rebuilds are idempotent, a poisoned lock is safe to reuse
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.rebuild_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Root-relative URL of a post's page
    pub fn post_url(&self, post: &NewPost) -> Result<String> {
        helpers::site_url(&self.site_dir, &post.record.page_path())
    }

    /// HTML of the new-post form
    pub fn new_post_form(&self) -> Result<String> {
        self.generator.render_new_post_form()
    }

    /// Scan every post, oldest first
    pub fn load_posts(&self) -> Result<Vec<ExistingPost>> {
        self.generator.load_posts()
    }
}
