//! Journal configuration (<site>/_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Config file name inside the site directory
pub const CONFIG_FILE: &str = "_config.yml";

/// Main journal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Site title shown in page headers
    pub title: String,

    /// Tags offered as checkboxes on the submission form
    pub tags: Vec<String>,

    /// Bounding box (both sides) for index thumbnails
    pub thumbnail_size: u32,

    /// Transcode motion-photo video to H.264
    pub transcode_video: bool,

    /// ffmpeg executable
    pub ffmpeg: String,

    /// Request body limit for submissions, in megabytes
    pub max_upload_mb: usize,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            title: "Home Journal".to_string(),
            tags: Vec::new(),
            thumbnail_size: 1000,
            transcode_video: true,
            ffmpeg: "ffmpeg".to_string(),
            max_upload_mb: 512,
            highlight: HighlightConfig::default(),
        }
    }
}

impl JournalConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: JournalConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Load `_config.yml` from the site directory, falling back to defaults
    pub fn load_from_site(site_dir: &Path) -> Result<Self> {
        let path = site_dir.join(CONFIG_FILE);
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Default `_config.yml` written by `init`
    pub fn scaffold() -> &'static str {
        r#"# Home Journal configuration

title: Home Journal

# Tags offered on the submission form
tags: []

# Thumbnails fit inside a square of this many pixels
thumbnail_size: 1000

# Motion photos carry an MP4; convert it to H.264 with ffmpeg
transcode_video: true
ffmpeg: ffmpeg

max_upload_mb: 512

highlight:
  theme: base16-ocean.dark
  line_number: false
"#
    }
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
