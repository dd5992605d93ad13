//! List journal content

use anyhow::Result;
use indexmap::IndexMap;

use crate::content::ExistingPost;
use crate::Journal;

/// List journal content by type
pub fn run(journal: &Journal, content_type: &str) -> Result<()> {
    let posts = journal.load_posts()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!(
                    "  {} - {} by {} [{}]",
                    post.record.date.format("%Y-%m-%d"),
                    post.record.title,
                    post.record.author,
                    post.post_id()
                );
            }
        }
        "tag" | "tags" => {
            let tags = count_by(&posts, |post| post.record.tags.clone());
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "author" | "authors" => {
            let authors = count_by(&posts, |post| vec![post.record.author.clone()]);
            println!("Authors ({}):", authors.len());
            for (author, count) in authors {
                println!("  {} ({})", author, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, tags, authors",
                content_type
            );
        }
    }

    Ok(())
}

/// Number of posts per key, most used first
fn count_by<F>(posts: &[ExistingPost], keys: F) -> Vec<(String, usize)>
where
    F: Fn(&ExistingPost) -> Vec<String>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for post in posts {
        for key in keys(post) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::posts;

    #[test]
    fn test_count_by_tag() {
        let mut posts = posts(3);
        posts[0].record.tags = vec!["a".to_string()];
        posts[1].record.tags = vec!["b".to_string(), "a".to_string()];
        posts[2].record.tags = vec!["c".to_string()];

        let counts = count_by(&posts, |p| p.record.tags.clone());
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 1),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_unknown_type() {
        let site = tempfile::tempdir().unwrap();
        let journal = Journal::new(site.path()).unwrap();
        assert!(run(&journal, "pages").is_err());
        assert!(run(&journal, "authors").is_ok());
    }
}
