//! Built-in journal templates using the Tera template engine
//!
//! Templates are embedded in the binary; a site directory only ever holds
//! generated output and posts.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::ExistingPost;
use crate::helpers::{display_date, iso_timestamp, slugify};

/// Stylesheet written into `<site>/css/` by `init`
pub const STYLESHEET: &str = include_str!("journal/journal.css");

/// Static files `init` writes into the site, as (relative path, content)
///
/// Besides the stylesheet: colour scheme toggle, arrow-key post navigation,
/// the upload progress form script and the share-target service worker.
pub const SITE_ASSETS: &[(&str, &str)] = &[
    ("css/journal.css", STYLESHEET),
    ("js/site.js", include_str!("journal/js/site.js")),
    ("js/post.js", include_str!("journal/js/post.js")),
    ("js/new.js", include_str!("journal/js/new.js")),
    ("sw.js", include_str!("journal/sw.js")),
    ("manifest.webmanifest", include_str!("journal/manifest.webmanifest")),
];

/// Template renderer with the embedded journal templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Post bodies are pre-rendered HTML and URLs must stay verbatim
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("journal/layout.html")),
            ("post.html", include_str!("journal/post.html")),
            ("index.html", include_str!("journal/index.html")),
            ("new.html", include_str!("journal/new.html")),
            ("post.md", include_str!("journal/post.md")),
        ])?;

        tera.register_filter("slugify", slugify_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: URL slug of a tag or author
///
/// `{{ v | slugify(unicode=true) }}` keeps non-ASCII letters.
fn slugify_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("slugify", "value", String, value);
    let allow_unicode = match args.get("unicode") {
        Some(flag) => tera::try_get_value!("slugify", "unicode", bool, flag),
        None => false,
    };
    Ok(tera::Value::String(slugify(&s, allow_unicode)))
}

/// Post data exposed to page templates
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub post_id: String,
    pub title: String,
    pub date: String,
    pub iso_date: String,
    pub author: String,
    pub author_url: String,
    pub tags: Vec<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl From<&ExistingPost> for PostData {
    fn from(post: &ExistingPost) -> Self {
        let record = &post.record;
        Self {
            post_id: record.post_id.clone(),
            title: record.title.clone(),
            date: display_date(&record.date),
            iso_date: iso_timestamp(&record.date),
            author: record.author.clone(),
            author_url: format!("/authors/{}", post.author_index_file()),
            tags: record.tags.clone(),
            url: post.post_url.clone(),
            thumbnail_url: post.thumbnail_url.clone(),
            next: record.next.clone(),
            previous: record.previous.clone(),
        }
    }
}

/// A media file referenced from a new post's Markdown
#[derive(Debug, Clone, Serialize)]
pub struct MediaData {
    pub name: String,
    pub path: String,
    pub mime: String,
}
