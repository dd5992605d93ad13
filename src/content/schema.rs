//! Normalization of older post schemas
//!
//! Posts written by earlier versions stored `categories` instead of `tags`
//! and did not list their images in the front-matter. Every such difference is
//! resolved here, at ingestion, so the rest of the pipeline sees one schema.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::post::DEFAULT_TAG;
use super::FrontMatter;

lazy_static! {
    static ref MARKDOWN_IMAGE: Regex =
        Regex::new(r#"(?i)!\[[^\]]*\]\(\s*<?([^)\s>]+?\.(?:jpe?g|png))[>\s)"]"#)
            .expect("static regex");
}

const THUMBNAIL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Tags followed by legacy categories, in that order, duplicates kept
///
/// A post with neither gets [`DEFAULT_TAG`].
pub fn merge_tags(tags: &[String], categories: &[String]) -> Vec<String> {
    let merged: Vec<String> = tags
        .iter()
        .chain(categories)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if merged.is_empty() {
        vec![DEFAULT_TAG.to_string()]
    } else {
        merged
    }
}

/// Images that may serve as the index thumbnail, in order of preference
///
/// An explicit `image_file_names` list wins, then the image entries of
/// `media_file_names`, then images referenced from the body.
pub fn thumbnail_candidates(fm: &FrontMatter, body: &str) -> Vec<String> {
    if !fm.image_file_names.is_empty() {
        return fm.image_file_names.clone();
    }

    let media_images: Vec<String> = fm
        .media_file_names
        .iter()
        .filter(|name| is_thumbnail_source(name))
        .cloned()
        .collect();
    if !media_images.is_empty() {
        return media_images;
    }

    body_images(body)
}

/// File names of JPEG/PNG images embedded with Markdown image syntax
pub fn body_images(body: &str) -> Vec<String> {
    MARKDOWN_IMAGE
        .captures_iter(body)
        .filter_map(|caps| {
            let link = caps.get(1)?.as_str();
            Path::new(link)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .collect()
}

/// Whether a file can be thumbnailed
pub fn is_thumbnail_source(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| THUMBNAIL_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_categories_become_tags() {
        assert_eq!(merge_tags(&[], &strings(&["old"])), vec!["old"]);
    }

    #[test]
    fn test_tags_then_categories_without_dedup() {
        assert_eq!(
            merge_tags(&strings(&["a", "b"]), &strings(&["b", "c"])),
            vec!["a", "b", "b", "c"]
        );
    }

    #[test]
    fn test_no_tags_defaults_to_random() {
        assert_eq!(merge_tags(&[], &[]), vec!["random"]);
        assert_eq!(merge_tags(&strings(&[" "]), &[]), vec!["random"]);
    }

    #[test]
    fn test_body_images() {
        let body = "Intro\n![first](media/one.JPG) and ![](media/two.png)\n\
                    ![clip](media/movie.mp4)\n![x](<media/three.jpeg>)\n![y](four.jpg \"Title\")";
        assert_eq!(
            body_images(body),
            vec!["one.JPG", "two.png", "three.jpeg", "four.jpg"]
        );
    }

    #[test]
    fn test_explicit_image_list_wins() {
        let fm = FrontMatter {
            image_file_names: strings(&["b.jpg"]),
            media_file_names: strings(&["a.jpg"]),
            ..Default::default()
        };
        assert_eq!(thumbnail_candidates(&fm, "![](c.jpg)"), vec!["b.jpg"]);
    }

    #[test]
    fn test_media_list_skips_video() {
        let fm = FrontMatter {
            media_file_names: strings(&["ex_h264_clip.mp4", "ex_clip.jpg"]),
            ..Default::default()
        };
        assert_eq!(thumbnail_candidates(&fm, ""), vec!["ex_clip.jpg"]);
    }

    #[test]
    fn test_falls_back_to_body() {
        let fm = FrontMatter {
            media_file_names: strings(&["clip.mp4"]),
            ..Default::default()
        };
        assert_eq!(thumbnail_candidates(&fm, "![](media/c.png)"), vec!["c.png"]);
        assert!(thumbnail_candidates(&fm, "no images").is_empty());
    }
}
