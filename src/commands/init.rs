//! Initialize a new journal site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{JournalConfig, CONFIG_FILE};
use crate::templates::SITE_ASSETS;

/// Initialize a journal in the given directory
///
/// Writes `_config.yml`, the stylesheet and the page scripts. Files that
/// already exist are left untouched, so running it on a populated site is
/// harmless.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("posts"))
        .with_context(|| format!("Failed to create posts directory in {:?}", target_dir))?;

    write_if_missing(&target_dir.join(CONFIG_FILE), JournalConfig::scaffold())?;
    for (relative, content) in SITE_ASSETS {
        write_if_missing(&target_dir.join(relative), content)?;
    }

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::debug!("Keeping existing {:?}", path);
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}
