//! Front-matter parsing

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;

use crate::error::JournalError;

/// Render a YAML scalar as a string, ignoring mappings and sequences
fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts any scalar (`title: 2024` is a number to YAML)
fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// Accepts both a single scalar and a list of scalars
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_yaml::Value::Sequence(items)) => {
            items.iter().filter_map(scalar_to_string).collect()
        }
        Some(other) => scalar_to_string(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Front-matter of a post file
///
/// Covers both schema generations: current posts carry `tags`, `author` and
/// `media_file_names`; older ones carry `categories` and sometimes
/// `image_file_names`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "optional_scalar")]
    pub title: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub date: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub author: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub post_id: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub media_file_names: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub image_file_names: Vec<String>,

    /// Fields this version does not know about
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split a post file into front-matter and body
    ///
    /// The file must open with a `---` line and the block must be closed by
    /// another `---` line. Anything else is a malformed post.
    pub fn parse<'a>(path: &Path, content: &'a str) -> Result<(Self, &'a str), JournalError> {
        let malformed = |reason: &str| JournalError::MalformedFrontMatter {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let content = content.trim_start_matches('\u{feff}').trim_start();
        let rest = content
            .strip_prefix("---")
            .ok_or_else(|| malformed("file does not start with `---`"))?;
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .ok_or_else(|| malformed("opening `---` is not on its own line"))?;

        let (yaml_content, body) =
            split_closing_fence(rest).ok_or_else(|| malformed("no closing `---`"))?;

        let fm = if yaml_content.trim().is_empty() {
            FrontMatter::default()
        } else {
            serde_yaml::from_str::<FrontMatter>(yaml_content)
                .map_err(|e| malformed(&e.to_string()))?
        };

        Ok((fm, body.trim_start_matches(['\n', '\r'])))
    }
}

/// Find the line that closes the YAML block; returns (yaml, body)
fn split_closing_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" || trimmed == "..." {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<(FrontMatter, &str), JournalError> {
        FrontMatter::parse(Path::new("post.md"), content)
    }

    #[test]
    fn test_parse_current_schema() {
        let content = r#"---
author: Ann
date: '2024-01-15T10:30:00.000000+00:00'
media_file_names:
- beach.jpg
- clip.mp4
post_id: 2024-01-15T10:30:00.000000+00:00_hello
tags:
- family
- trips
title: Hello
---

This is the content.
"#;

        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.author.as_deref(), Some("Ann"));
        assert_eq!(fm.tags, vec!["family", "trips"]);
        assert_eq!(fm.media_file_names, vec!["beach.jpg", "clip.mp4"]);
        assert!(fm.categories.is_empty());
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_parse_legacy_schema() {
        let content = r#"---
title: Old one
date: 2019-05-01 08:00:00
categories: [old, older]
---
Body
"#;

        let (fm, body) = parse(content).unwrap();
        assert!(fm.tags.is_empty());
        assert_eq!(fm.categories, vec!["old", "older"]);
        assert_eq!(fm.date.as_deref(), Some("2019-05-01 08:00:00"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_parse_scalar_variants() {
        let content = "---\ntitle: 2024\ndate: 2024-01-01\ntags: notes\n---\n";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("2024"));
        assert_eq!(fm.tags, vec!["notes"]);
        assert_eq!(body, "");
    }

    #[test]
    fn test_body_keeps_horizontal_rules() {
        let content = "---\ntitle: t\ndate: 2024-01-01\n---\nabove\n\n---\n\nbelow\n";
        let (_, body) = parse(content).unwrap();
        assert!(body.contains("above"));
        assert!(body.contains("---"));
        assert!(body.contains("below"));
    }

    #[test]
    fn test_missing_front_matter_is_malformed() {
        let err = parse("Just some text\n").unwrap_err();
        assert!(matches!(err, JournalError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_unclosed_front_matter_is_malformed() {
        let err = parse("---\ntitle: x\n").unwrap_err();
        assert!(matches!(err, JournalError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let err = parse("---\ntitle: [unterminated\n---\nbody").unwrap_err();
        assert!(matches!(err, JournalError::MalformedFrontMatter { .. }));
    }
}
