//! Home, tag and author index pages
//!
//! Index pages are global: they are always built from the full post
//! collection, and the tag and author folders are wiped first so pages for
//! tags or authors that no longer exist disappear.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::Path;

use super::Generator;
use crate::content::ExistingPost;
use crate::helpers::slugify;
use crate::templates::PostData;

/// Folder of per-tag index pages
pub const TAG_DIR: &str = "tags";

/// Folder of per-author index pages
pub const AUTHOR_DIR: &str = "authors";

/// Title of the home index
pub const HOME_TITLE: &str = "everything";

impl Generator {
    /// Overwrite `<site>/index.html` with a listing of every post
    pub fn write_home_index(&self, posts: &[ExistingPost]) -> Result<()> {
        let path = self.site_dir.join("index.html");
        let refs: Vec<&ExistingPost> = posts.iter().collect();
        self.write_index_page(&path, HOME_TITLE, &refs)
    }

    /// Regenerate `<site>/tags/<slug>.html`, one page per distinct tag
    pub fn write_tag_indices(&self, posts: &[ExistingPost]) -> Result<usize> {
        let groups = group_by(posts, |post| post.record.tags.clone());
        self.write_group_pages(TAG_DIR, &groups)
    }

    /// Regenerate `<site>/authors/<slug>.html`, one page per author
    pub fn write_author_indices(&self, posts: &[ExistingPost]) -> Result<usize> {
        let groups = group_by(posts, |post| vec![post.record.author.clone()]);
        self.write_group_pages(AUTHOR_DIR, &groups)
    }

    fn write_group_pages(
        &self,
        dir_name: &str,
        groups: &IndexMap<String, Vec<&ExistingPost>>,
    ) -> Result<usize> {
        let dir = self.site_dir.join(dir_name);
        remove_dir_if_exists(&dir)?;
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;

        for (key, matching) in groups {
            let path = dir.join(format!("{}.html", slugify(key, false)));
            self.write_index_page(&path, key, matching)?;
        }

        tracing::debug!("Wrote {} pages into {:?}", groups.len(), dir);
        Ok(groups.len())
    }

    fn write_index_page(&self, path: &Path, title: &str, posts: &[&ExistingPost]) -> Result<()> {
        let post_data: Vec<PostData> = posts.iter().map(|p| PostData::from(*p)).collect();

        let mut context = self.base_context();
        context.insert("title", title);
        context.insert("posts", &post_data);

        let html = self.templates.render("index.html", &context)?;
        fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }
}

/// Group posts under every key they carry, keeping first-seen key order
/// and chronological post order inside each group
fn group_by<F>(posts: &[ExistingPost], keys: F) -> IndexMap<String, Vec<&ExistingPost>>
where
    F: Fn(&ExistingPost) -> Vec<String>,
{
    let mut groups: IndexMap<String, Vec<&ExistingPost>> = IndexMap::new();
    for post in posts {
        for key in keys(post) {
            let group = groups.entry(key).or_default();
            // A post listing the same tag twice appears once on that page
            if !group.iter().any(|p| std::ptr::eq(*p, post)) {
                group.push(post);
            }
        }
    }
    groups
}

fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {:?}", dir)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::{generator, posts_in};

    fn listed(html: &str, post: &ExistingPost) -> bool {
        html.contains(&format!("href=\"{}\"", post.post_url))
    }

    #[test]
    fn test_tag_pages() {
        let site = tempfile::tempdir().unwrap();
        let mut posts = posts_in(site.path(), 2);
        posts[0].record.tags = vec!["a".to_string(), "b".to_string()];
        posts[1].record.tags = vec!["b".to_string()];

        let generator = generator(site.path());
        assert_eq!(generator.write_tag_indices(&posts).unwrap(), 2);

        let a = fs::read_to_string(site.path().join("tags/a.html")).unwrap();
        let b = fs::read_to_string(site.path().join("tags/b.html")).unwrap();
        assert!(listed(&a, &posts[0]));
        assert!(!listed(&a, &posts[1]));
        assert!(listed(&b, &posts[0]));
        assert!(listed(&b, &posts[1]));
    }

    #[test]
    fn test_stale_tag_pages_are_removed() {
        let site = tempfile::tempdir().unwrap();
        let mut posts = posts_in(site.path(), 1);
        let generator = generator(site.path());

        posts[0].record.tags = vec!["old".to_string()];
        generator.write_tag_indices(&posts).unwrap();
        assert!(site.path().join("tags/old.html").exists());

        posts[0].record.tags = vec!["new".to_string()];
        generator.write_tag_indices(&posts).unwrap();
        assert!(!site.path().join("tags/old.html").exists());
        assert!(site.path().join("tags/new.html").exists());
    }

    #[test]
    fn test_tag_file_names_are_slugs() {
        let site = tempfile::tempdir().unwrap();
        let mut posts = posts_in(site.path(), 1);
        posts[0].record.tags = vec!["Summer Trips".to_string()];

        generator(site.path()).write_tag_indices(&posts).unwrap();
        let html = fs::read_to_string(site.path().join("tags/summer-trips.html")).unwrap();
        assert!(html.contains("Summer Trips"));
    }

    #[test]
    fn test_author_pages() {
        let site = tempfile::tempdir().unwrap();
        let mut posts = posts_in(site.path(), 3);
        posts[0].record.author = "Ann".to_string();
        posts[1].record.author = "Bob Lee".to_string();
        posts[2].record.author = "Ann".to_string();

        let generator = generator(site.path());
        fs::create_dir_all(site.path().join("authors")).unwrap();
        fs::write(site.path().join("authors/carol.html"), "stale").unwrap();

        assert_eq!(generator.write_author_indices(&posts).unwrap(), 2);
        let ann = fs::read_to_string(site.path().join("authors/ann.html")).unwrap();
        assert!(listed(&ann, &posts[0]));
        assert!(listed(&ann, &posts[2]));
        assert!(!listed(&ann, &posts[1]));
        assert!(site.path().join("authors/bob-lee.html").exists());
        assert!(!site.path().join("authors/carol.html").exists());
    }

    #[test]
    fn test_home_index_lists_everything() {
        let site = tempfile::tempdir().unwrap();
        let posts = posts_in(site.path(), 3);

        generator(site.path()).write_home_index(&posts).unwrap();
        let html = fs::read_to_string(site.path().join("index.html")).unwrap();
        assert!(html.contains("everything"));
        assert!(posts.iter().all(|p| listed(&html, p)));
    }

    #[test]
    fn test_duplicate_tag_listed_once() {
        let site = tempfile::tempdir().unwrap();
        let mut posts = posts_in(site.path(), 1);
        posts[0].record.tags = vec!["x".to_string(), "x".to_string()];

        generator(site.path()).write_tag_indices(&posts).unwrap();
        let html = fs::read_to_string(site.path().join("tags/x.html")).unwrap();
        assert_eq!(html.matches(&posts[0].post_url).count(), 1);
    }
}
